use std::convert::TryFrom;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::library_reader::{LOCALE_TAG_PREFIX, MAGIC};
use crate::shape::*;
use crate::{
    Color, I18nText, LocaleService, ShapeLibrary, ShapeLibraryEntry, TcadError, TcadResult,
};

/// Encodes text into the fixed single-byte encoding.
pub(crate) fn encode_single_byte(text: &str) -> TcadResult<Vec<u8>> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    if had_errors {
        return Err(TcadError::UnencodableName(String::from(text)));
    }
    Ok(bytes.into_owned())
}

pub(crate) struct LibraryWriter<'a, T: Write> {
    writer: T,
    locales: &'a dyn LocaleService,
}

impl<'a, T: Write> LibraryWriter<'a, T> {
    pub fn new(writer: T, locales: &'a dyn LocaleService) -> Self {
        LibraryWriter { writer, locales }
    }
    pub fn into_inner(self) -> T {
        self.writer
    }
    pub fn write_library(&mut self, library: &ShapeLibrary) -> TcadResult<()> {
        self.writer.write_all(MAGIC)?;
        self.write_bool(library.read_only)?;
        self.write_i18n_text(&library.name)?;
        for entry in library.entries() {
            self.write_entry(entry)?;
        }
        debug!(entries = library.entries().len(), "wrote shape library");
        Ok(())
    }
    pub fn write_entry(&mut self, entry: &ShapeLibraryEntry) -> TcadResult<()> {
        if entry.shape.depth() > MAX_NESTING_DEPTH {
            return Err(TcadError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
                offset: None,
            });
        }
        self.write_pascal8(&encode_single_byte(&entry.name)?)?;

        // the body is length-prefixed, so build it in memory first
        let mut body = LibraryWriter::new(vec![], self.locales);
        body.write_i32(entry.width)?;
        body.write_i32(entry.height)?;
        body.write_i18n_text(&entry.i18n_name)?;
        let descendants = entry.number_of_descendants();
        body.write_i32(i32::try_from(descendants).map_err(|_| TcadError::ValueTooLong {
            length: descendants,
            max: i32::MAX as usize,
        })?)?;
        body.write_shape(&entry.shape)?;
        body.write_bytes(entry.trailing_data())?;

        self.write_pascal32(&body.into_inner())?;
        debug!(entry = %entry.name, descendants, "wrote library entry");
        Ok(())
    }
    pub fn write_shape(&mut self, shape: &Shape) -> TcadResult<()> {
        let common = &shape.common;
        if let Some(children) = shape.children() {
            if children.len() != common.child_shape_refs.len() {
                return Err(TcadError::ChildCountMismatch {
                    refs: common.child_shape_refs.len(),
                    children: children.len(),
                });
            }
        }

        self.write_type_tag(shape.type_name())?;
        self.write_bytes(&common.opaque.before_auto_number)?;
        self.write_i32(common.auto_number)?;
        self.write_i32(common.shape_ref)?;
        self.write_bytes(&common.opaque.before_parent_shape_ref)?;
        self.write_i32(common.parent_shape_ref)?;
        self.write_count(common.child_shape_refs.len())?;
        for &child_ref in &common.child_shape_refs {
            self.write_i32(child_ref)?;
        }
        self.write_bytes(&common.opaque.before_points)?;
        self.write_count(common.points.len())?;
        for point in &common.points {
            self.write_f32(point.x)?;
            self.write_f32(point.y)?;
        }
        self.write_bytes(&common.opaque.before_rotation)?;
        self.write_f32(common.rotation)?;
        self.write_bytes(&common.opaque.before_fill_color)?;
        self.write_color(common.fill_color)?;
        self.write_bytes(&common.opaque.before_shape_name)?;
        self.write_single_byte_string(&common.shape_name)?;
        self.write_bytes(&common.opaque.before_font_name)?;
        self.write_single_byte_string(&common.font_name)?;
        self.write_bytes(&common.opaque.before_font_color)?;
        self.write_color(common.font_color)?;
        self.write_bytes(&common.opaque.before_font_size)?;
        self.write_i32(common.font_size)?;
        self.write_bytes(&common.opaque.before_text_style)?;
        self.writer.write_u8(common.text_style)?;
        self.write_bytes(&common.opaque.before_stroke_color)?;
        self.write_color(common.stroke_color)?;
        self.write_bytes(&common.opaque.before_stroke_type)?;
        self.writer.write_i8(common.stroke_type)?;
        self.write_i32(common.stroke_width)?;
        self.write_i18n_text(&common.tertiary_text)?;
        self.write_bool(common.flip_horizontal)?;
        self.write_bool(common.flip_vertical)?;
        self.write_bytes(&common.opaque.before_comments)?;
        self.write_count(common.comments.len())?;
        for comment in &common.comments {
            self.write_single_byte_string(comment)?;
        }
        self.write_bytes(&common.opaque.before_locked)?;
        self.write_bool(common.locked)?;
        self.write_bytes(&common.opaque.before_rotatable)?;
        self.write_bool(common.rotatable)?;
        self.write_bool(common.resizable)?;
        self.write_bool(common.parent_centered)?;

        match shape.specific {
            ShapeType::Text(ref text) => {
                self.write_bytes(&text.opaque_before_text)?;
                self.write_single_byte_string(&text.text)?;
                self.write_bytes(&text.opaque_before_alignment)?;
                self.writer.write_i8(text.alignment)?;
                self.writer.write_i8(text.wrap)?;
            }
            ShapeType::Line(ref arrow)
            | ShapeType::Polygon(ref arrow)
            | ShapeType::PolyLine(ref arrow)
            | ShapeType::FreeLine(ref arrow) => {
                self.write_i32(arrow.arrow_angle)?;
                self.writer.write_i8(arrow.arrow_length)?;
                self.writer.write_i8(arrow.arrow_offset)?;
                self.writer.write_i8(arrow.arrow_style)?;
            }
            ShapeType::Image(ref image) => self.write_pascal64(&image.bitmap)?,
            ShapeType::Group(ref container) | ShapeType::Combine(ref container) => {
                self.write_bytes(&container.opaque)?;
                for child in &container.children {
                    self.write_shape(child)?;
                }
            }
            ShapeType::EllipticalArc(ref arc) => self.write_bytes(&arc.opaque)?,
            ShapeType::Spiral(ref spiral) => {
                self.write_bytes(&spiral.opaque)?;
                self.write_f32(spiral.distance)?;
            }
            ShapeType::SinusLine(ref sinus) => self.write_i32(sinus.period)?,
            ShapeType::Other(_) => (),
        }
        Ok(())
    }

    //------------------------------------------------------------------ primitives

    fn write_type_tag(&mut self, type_name: &str) -> TcadResult<()> {
        let mut tag = encode_single_byte(type_name)?;
        if tag.len() > TYPE_TAG_LENGTH {
            return Err(TcadError::ValueTooLong {
                length: tag.len(),
                max: TYPE_TAG_LENGTH,
            });
        }
        tag.resize(TYPE_TAG_LENGTH, b' ');
        self.write_bytes(&tag)
    }
    pub fn write_bytes(&mut self, bytes: &[u8]) -> TcadResult<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }
    pub fn write_i32(&mut self, value: i32) -> TcadResult<()> {
        self.writer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }
    pub fn write_f32(&mut self, value: f32) -> TcadResult<()> {
        self.writer.write_f32::<LittleEndian>(value)?;
        Ok(())
    }
    pub fn write_bool(&mut self, value: bool) -> TcadResult<()> {
        self.writer.write_u8(if value { 1 } else { 0 })?;
        Ok(())
    }
    pub fn write_color(&mut self, color: Color) -> TcadResult<()> {
        self.write_bytes(&color.components())
    }
    fn write_count(&mut self, count: usize) -> TcadResult<()> {
        let count = i32::try_from(count).map_err(|_| TcadError::ValueTooLong {
            length: count,
            max: i32::MAX as usize,
        })?;
        self.write_i32(count)
    }
    pub fn write_pascal8(&mut self, bytes: &[u8]) -> TcadResult<()> {
        let length = u8::try_from(bytes.len()).map_err(|_| TcadError::ValueTooLong {
            length: bytes.len(),
            max: u8::MAX as usize,
        })?;
        self.writer.write_u8(length)?;
        self.write_bytes(bytes)
    }
    pub fn write_pascal32(&mut self, bytes: &[u8]) -> TcadResult<()> {
        self.write_count(bytes.len())?;
        self.write_bytes(bytes)
    }
    pub fn write_pascal64(&mut self, bytes: &[u8]) -> TcadResult<()> {
        self.writer.write_i64::<LittleEndian>(bytes.len() as i64)?;
        self.write_bytes(bytes)
    }
    fn write_single_byte_string(&mut self, text: &str) -> TcadResult<()> {
        self.write_pascal32(&encode_single_byte(text)?)
    }
    /// Writes the entries of `text` in the locale service's enumeration order.  Entries for
    /// locales the service does not know are not written.
    pub fn write_i18n_text(&mut self, text: &I18nText) -> TcadResult<()> {
        let locales = self.locales;
        let present = locales
            .all_locales()
            .iter()
            .filter(|l| text.contains(l))
            .collect::<Vec<_>>();
        self.write_count(present.len())?;
        for locale in present {
            let tag = format!("{}{:04}", LOCALE_TAG_PREFIX, locale.id());
            self.write_pascal32(&encode_single_byte(&tag)?)?;
            let encoding = locale
                .encoding()
                .ok_or_else(|| TcadError::UnsupportedCodePage {
                    locale: locale.name().to_string(),
                    code_page: locale.code_page(),
                })?;
            let bytes = encoding
                .encode(text.get(locale))
                .ok_or_else(|| TcadError::UnencodableText(String::from(locale.name())))?;
            self.write_pascal32(&bytes)?;
        }
        Ok(())
    }
}
