use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{debug, info};

use crate::library_reader::LibraryReader;
use crate::library_writer::LibraryWriter;
use crate::{I18nText, LocaleService, LocaleTable, Shape, TcadResult};

/// A shape template library.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ShapeLibrary {
    /// The localized name of the library.
    pub name: I18nText,
    pub read_only: bool,

    /// Internal collection of entries, in file order.
    __entries: Vec<ShapeLibraryEntry>,
}

/// One named template of a library.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ShapeLibraryEntry {
    /// The identifying name; stored in a single-byte encoding and limited to 255 bytes.
    pub name: String,
    /// Width of the template's bounding box, in design units.
    pub width: i32,
    /// Height of the template's bounding box, in design units.
    pub height: i32,
    /// The localized display name.
    pub i18n_name: I18nText,
    /// The root of the template's shape tree.
    pub shape: Shape,

    /// Bytes following the shape tree in the entry body.
    pub(crate) trailing_data: Vec<u8>,
}

// public implementation
impl ShapeLibrary {
    pub fn new() -> Self {
        ShapeLibrary::default()
    }
    /// Loads a `ShapeLibrary` from anything that implements the `BufRead` trait, resolving
    /// localized text against the built-in Windows locale table.
    pub fn load<T>(reader: &mut T) -> TcadResult<ShapeLibrary>
    where
        T: BufRead + ?Sized,
    {
        ShapeLibrary::load_with_locales(reader, LocaleTable::windows())
    }
    /// Loads a `ShapeLibrary` from anything that implements the `BufRead` trait using the
    /// specified locales.
    pub fn load_with_locales<T>(
        reader: &mut T,
        locales: &dyn LocaleService,
    ) -> TcadResult<ShapeLibrary>
    where
        T: BufRead + ?Sized,
    {
        let mut reader = LibraryReader::new(reader, locales);
        reader.read_library()
    }
    /// Loads a `ShapeLibrary` from disk, using a `BufReader`.
    pub fn load_file<P: AsRef<Path>>(path: P) -> TcadResult<ShapeLibrary> {
        ShapeLibrary::load_file_with_locales(path, LocaleTable::windows())
    }
    /// Loads a `ShapeLibrary` from disk, using a `BufReader` and the specified locales.
    pub fn load_file_with_locales<P: AsRef<Path>>(
        path: P,
        locales: &dyn LocaleService,
    ) -> TcadResult<ShapeLibrary> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut buf_reader = BufReader::new(file);
        let library = ShapeLibrary::load_with_locales(&mut buf_reader, locales)?;
        info!(path = %path.display(), entries = library.entries().len(), "loaded shape library");
        Ok(library)
    }
    /// Writes a `ShapeLibrary` to anything that implements the `Write` trait.
    pub fn save<T>(&self, writer: &mut T) -> TcadResult<()>
    where
        T: Write + ?Sized,
    {
        self.save_with_locales(writer, LocaleTable::windows())
    }
    /// Writes a `ShapeLibrary` to anything that implements the `Write` trait, emitting
    /// localized text in the enumeration order of `locales`.
    pub fn save_with_locales<T>(&self, writer: &mut T, locales: &dyn LocaleService) -> TcadResult<()>
    where
        T: Write + ?Sized,
    {
        let mut writer = LibraryWriter::new(writer, locales);
        writer.write_library(self)
    }
    /// Writes a `ShapeLibrary` to disk, using a `BufWriter`.
    ///
    /// An existing file at `path` is first renamed to `path` + `.bak`, replacing any previous
    /// backup.  This is not atomic: if writing fails, the previous contents are only available
    /// from the backup.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> TcadResult<()> {
        self.save_file_with_locales(path, LocaleTable::windows())
    }
    /// Writes a `ShapeLibrary` to disk using the specified locales; see `save_file`.
    pub fn save_file_with_locales<P: AsRef<Path>>(
        &self,
        path: P,
        locales: &dyn LocaleService,
    ) -> TcadResult<()> {
        let path = path.as_ref();
        backup_existing_file(path)?;
        let file = File::create(path)?;
        let mut buf_writer = BufWriter::new(file);
        self.save_with_locales(&mut buf_writer, locales)?;
        buf_writer.flush()?;
        info!(path = %path.display(), entries = self.entries().len(), "saved shape library");
        Ok(())
    }
    /// Returns the contained entries, in file order.
    pub fn entries(&self) -> &[ShapeLibraryEntry] {
        &self.__entries
    }
    /// Returns all entries for modification.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut ShapeLibraryEntry> {
        self.__entries.iter_mut()
    }
    /// Appends an entry to the end of the library.
    pub fn add(&mut self, entry: ShapeLibraryEntry) -> &ShapeLibraryEntry {
        self.__entries.push(entry);
        &self.__entries[self.__entries.len() - 1]
    }
    /// Inserts an entry at `index`.  Panics if `index > len`.
    pub fn insert(&mut self, index: usize, entry: ShapeLibraryEntry) {
        self.__entries.insert(index, entry);
    }
    /// Removes and returns the entry at `index`.  Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> ShapeLibraryEntry {
        self.__entries.remove(index)
    }
}

impl fmt::Display for ShapeLibrary {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.__entries.iter().join("\n\n"))
    }
}

impl ShapeLibraryEntry {
    pub fn new(name: &str, width: i32, height: i32, i18n_name: I18nText, shape: Shape) -> Self {
        ShapeLibraryEntry {
            name: String::from(name),
            width,
            height,
            i18n_name,
            shape,
            trailing_data: vec![],
        }
    }
    /// The number of shapes in the tree, including the root.
    pub fn number_of_descendants(&self) -> usize {
        self.shape.number_of_descendants()
    }
    /// Bytes that followed the shape tree in the entry body when it was read.  They are
    /// written back unchanged.
    pub fn trailing_data(&self) -> &[u8] {
        &self.trailing_data
    }
}

impl fmt::Display for ShapeLibraryEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{:?} ({}x{} {}) {}",
            self.name, self.width, self.height, self.i18n_name, self.shape
        )
    }
}

/// The path an existing library is moved to before it is overwritten.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(".bak");
    PathBuf::from(backup)
}

fn backup_existing_file(path: &Path) -> TcadResult<()> {
    if !path.exists() {
        return Ok(());
    }
    let backup = backup_path(path);
    if backup.exists() {
        fs::remove_file(&backup)?;
    }
    fs::rename(path, &backup)?;
    debug!(from = %path.display(), to = %backup.display(), "moved existing library to backup");
    Ok(())
}
