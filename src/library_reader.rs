use std::convert::TryFrom;
use std::io::{BufRead, Cursor, Read};

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use crate::shape::*;
use crate::{
    Color, I18nText, LocaleService, Point, ShapeLibrary, ShapeLibraryEntry, TcadError,
    TcadResult,
};

pub(crate) const MAGIC: &[u8; 10] = b"TCADLIBX.k";

/// Text tags are `"Caption"` followed by the decimal locale identifier.
pub(crate) const LOCALE_TAG_PREFIX: &str = "Caption";

/// Decodes text stored in the fixed single-byte encoding.  Every byte value is mapped, so
/// this never fails and re-encoding yields the original bytes.
pub(crate) fn decode_single_byte(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn parse_locale_tag(tag: &[u8]) -> Option<u32> {
    if tag.len() <= LOCALE_TAG_PREFIX.len() {
        return None;
    }
    std::str::from_utf8(&tag[LOCALE_TAG_PREFIX.len()..])
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub(crate) struct LibraryReader<'a, T: BufRead> {
    reader: T,
    locales: &'a dyn LocaleService,
    offset: usize,
}

impl<'a, T: BufRead> LibraryReader<'a, T> {
    pub fn new(reader: T, locales: &'a dyn LocaleService) -> Self {
        LibraryReader::with_offset(reader, locales, 0)
    }
    /// Creates a reader whose reported offsets start at `offset`; used for nested blocks.
    pub fn with_offset(reader: T, locales: &'a dyn LocaleService, offset: usize) -> Self {
        LibraryReader {
            reader,
            locales,
            offset,
        }
    }
    pub fn read_library(&mut self) -> TcadResult<ShapeLibrary> {
        let mut magic = vec![];
        (&mut self.reader)
            .take(MAGIC.len() as u64)
            .read_to_end(&mut magic)?;
        if magic != MAGIC {
            return Err(TcadError::InvalidMagic);
        }
        self.advance_offset(MAGIC.len());

        let mut library = ShapeLibrary::new();
        library.read_only = self.read_bool()?;
        library.name = self.read_i18n_text()?;
        while !self.is_eos()? {
            let entry = self.read_entry()?;
            library.add(entry);
        }
        debug!(entries = library.entries().len(), "read shape library");
        Ok(library)
    }
    pub fn read_entry(&mut self) -> TcadResult<ShapeLibraryEntry> {
        let name = decode_single_byte(&self.read_pascal8()?);
        let body_offset = self.offset + 4;
        let body = self.read_pascal32()?;
        let mut body_reader = LibraryReader::with_offset(Cursor::new(body), self.locales, body_offset);

        let width = body_reader.read_i32()?;
        let height = body_reader.read_i32()?;
        let i18n_name = body_reader.read_i18n_text()?;
        // recomputed from the tree when written
        let _descendant_count = body_reader.read_i32()?;
        let shape = body_reader.read_shape()?;
        let trailing_data = body_reader.read_remaining()?;
        if !trailing_data.is_empty() {
            warn!(
                entry = %name,
                bytes = trailing_data.len(),
                "entry body continues after its shape tree; keeping the bytes verbatim"
            );
        }
        debug!(entry = %name, width, height, "read library entry");

        let mut entry = ShapeLibraryEntry::new(&name, width, height, i18n_name, shape);
        entry.trailing_data = trailing_data;
        Ok(entry)
    }
    pub fn read_shape(&mut self) -> TcadResult<Shape> {
        self.read_shape_at(1)
    }
    /// Reads a shape whose nesting level is `depth`, the root being level 1.
    fn read_shape_at(&mut self, depth: usize) -> TcadResult<Shape> {
        if depth > MAX_NESTING_DEPTH {
            return Err(TcadError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
                offset: Some(self.offset),
            });
        }
        let (type_name, common, child_count) = self.read_shape_common()?;
        let specific = match type_name.as_str() {
            TEXT_TAG => ShapeType::Text(self.read_text_shape()?),
            LINE_TAG => ShapeType::Line(self.read_arrow_shape()?),
            POLYGON_TAG => ShapeType::Polygon(self.read_arrow_shape()?),
            POLY_LINE_TAG => ShapeType::PolyLine(self.read_arrow_shape()?),
            FREE_LINE_TAG => ShapeType::FreeLine(self.read_arrow_shape()?),
            IMAGE_TAG => ShapeType::Image(ImageShape::new(self.read_pascal64()?)),
            GROUP_TAG => ShapeType::Group(self.read_container_shape(child_count, depth)?),
            COMBINE_TAG => ShapeType::Combine(self.read_container_shape(child_count, depth)?),
            ELLIPTICAL_ARC_TAG => ShapeType::EllipticalArc(EllipticalArcShape {
                opaque: self.read_array()?,
            }),
            SPIRAL_TAG => {
                let opaque = self.read_array()?;
                let distance = self.read_f32()?;
                ShapeType::Spiral(SpiralShape { opaque, distance })
            }
            SINUS_LINE_TAG => ShapeType::SinusLine(SinusLineShape {
                period: self.read_i32()?,
            }),
            other => {
                debug!(tag = %other, offset = self.offset, "shape tag has no known trailing fields");
                ShapeType::Other(other.to_string())
            }
        };

        Ok(Shape { common, specific })
    }
    /// Reads the type tag and the fields every shape carries; also returns the child count.
    fn read_shape_common(&mut self) -> TcadResult<(String, ShapeCommon, usize)> {
        let tag_bytes = self.read_array::<TYPE_TAG_LENGTH>()?;
        let type_name = decode_single_byte(&tag_bytes).trim_end().to_string();

        let mut common = ShapeCommon::default();
        common.opaque.before_auto_number = self.read_array()?;
        common.auto_number = self.read_i32()?;
        common.shape_ref = self.read_i32()?;
        common.opaque.before_parent_shape_ref = self.read_array()?;
        common.parent_shape_ref = self.read_i32()?;
        let child_count = self.read_count()?;
        for _ in 0..child_count {
            common.child_shape_refs.push(self.read_i32()?);
        }
        common.opaque.before_points = self.read_array()?;
        let point_count = self.read_count()?;
        for _ in 0..point_count {
            let x = self.read_f32()?;
            let y = self.read_f32()?;
            common.points.push(Point::new(x, y));
        }
        common.opaque.before_rotation = self.read_array()?;
        common.rotation = self.read_f32()?;
        common.opaque.before_fill_color = self.read_array()?;
        common.fill_color = self.read_color()?;
        common.opaque.before_shape_name = self.read_array()?;
        common.shape_name = self.read_single_byte_string()?;
        common.opaque.before_font_name = self.read_array()?;
        common.font_name = self.read_single_byte_string()?;
        common.opaque.before_font_color = self.read_array()?;
        common.font_color = self.read_color()?;
        common.opaque.before_font_size = self.read_array()?;
        common.font_size = self.read_i32()?;
        common.opaque.before_text_style = self.read_array()?;
        common.text_style = self.read_u8()?;
        common.opaque.before_stroke_color = self.read_array()?;
        common.stroke_color = self.read_color()?;
        common.opaque.before_stroke_type = self.read_array()?;
        common.stroke_type = self.read_i8()?;
        common.stroke_width = self.read_i32()?;
        common.tertiary_text = self.read_i18n_text()?;
        common.flip_horizontal = self.read_bool()?;
        common.flip_vertical = self.read_bool()?;
        common.opaque.before_comments = self.read_array()?;
        let comment_count = self.read_count()?;
        for _ in 0..comment_count {
            common.comments.push(self.read_single_byte_string()?);
        }
        common.opaque.before_locked = self.read_array()?;
        common.locked = self.read_bool()?;
        common.opaque.before_rotatable = self.read_array()?;
        common.rotatable = self.read_bool()?;
        common.resizable = self.read_bool()?;
        common.parent_centered = self.read_bool()?;
        Ok((type_name, common, child_count))
    }
    fn read_text_shape(&mut self) -> TcadResult<TextShape> {
        let opaque_before_text = self.read_array()?;
        let text = self.read_single_byte_string()?;
        let opaque_before_alignment = self.read_array()?;
        let alignment = self.read_i8()?;
        let wrap = self.read_i8()?;
        Ok(TextShape {
            opaque_before_text,
            text,
            opaque_before_alignment,
            alignment,
            wrap,
        })
    }
    fn read_arrow_shape(&mut self) -> TcadResult<ArrowShape> {
        let arrow_angle = self.read_i32()?;
        let arrow_length = self.read_i8()?;
        let arrow_offset = self.read_i8()?;
        let arrow_style = self.read_i8()?;
        Ok(ArrowShape {
            arrow_angle,
            arrow_length,
            arrow_offset,
            arrow_style,
        })
    }
    fn read_container_shape(
        &mut self,
        child_count: usize,
        depth: usize,
    ) -> TcadResult<ContainerShape> {
        let opaque = self.read_array()?;
        let mut children = Vec::with_capacity(child_count.min(1024));
        for _ in 0..child_count {
            children.push(self.read_shape_at(depth + 1)?);
        }
        Ok(ContainerShape { opaque, children })
    }

    //------------------------------------------------------------------ primitives

    /// Reads exactly `length` bytes; never allocates more than what is actually present.
    pub fn read_bytes(&mut self, length: usize) -> TcadResult<Vec<u8>> {
        let mut buf = vec![];
        (&mut self.reader)
            .take(length as u64)
            .read_to_end(&mut buf)?;
        if buf.len() < length {
            return Err(TcadError::UnexpectedEndOfInput {
                offset: self.offset,
                expected: length,
                available: buf.len(),
            });
        }
        self.advance_offset(length);
        Ok(buf)
    }
    pub fn read_array<const N: usize>(&mut self) -> TcadResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(&bytes);
        Ok(array)
    }
    fn read_remaining(&mut self) -> TcadResult<Vec<u8>> {
        let mut buf = vec![];
        self.reader.read_to_end(&mut buf)?;
        self.advance_offset(buf.len());
        Ok(buf)
    }
    /// Returns whether the input is exhausted without consuming anything.
    pub fn is_eos(&mut self) -> TcadResult<bool> {
        Ok(self.reader.fill_buf()?.is_empty())
    }
    pub fn read_u8(&mut self) -> TcadResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }
    pub fn read_i8(&mut self) -> TcadResult<i8> {
        Ok(self.read_u8()? as i8)
    }
    pub fn read_i32(&mut self) -> TcadResult<i32> {
        Ok(LittleEndian::read_i32(&self.read_array::<4>()?))
    }
    pub fn read_f32(&mut self) -> TcadResult<f32> {
        Ok(LittleEndian::read_f32(&self.read_array::<4>()?))
    }
    pub fn read_bool(&mut self) -> TcadResult<bool> {
        Ok(self.read_u8()? != 0)
    }
    pub fn read_color(&mut self) -> TcadResult<Color> {
        let [r, g, b] = self.read_array::<3>()?;
        Ok(Color::new(r, g, b))
    }
    /// Reads a 32-bit element count.
    fn read_count(&mut self) -> TcadResult<usize> {
        let offset = self.offset;
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| TcadError::NegativeLength(i64::from(count), offset))
    }
    pub fn read_pascal8(&mut self) -> TcadResult<Vec<u8>> {
        let length = self.read_u8()?;
        self.read_bytes(usize::from(length))
    }
    pub fn read_pascal32(&mut self) -> TcadResult<Vec<u8>> {
        let length = self.read_count()?;
        self.read_bytes(length)
    }
    pub fn read_pascal64(&mut self) -> TcadResult<Vec<u8>> {
        let offset = self.offset;
        let length = LittleEndian::read_i64(&self.read_array::<8>()?);
        let length = usize::try_from(length).map_err(|_| TcadError::NegativeLength(length, offset))?;
        self.read_bytes(length)
    }
    fn read_single_byte_string(&mut self) -> TcadResult<String> {
        Ok(decode_single_byte(&self.read_pascal32()?))
    }
    pub fn read_i18n_text(&mut self) -> TcadResult<I18nText> {
        let mut text = I18nText::new();
        let count = self.read_count()?;
        for _ in 0..count {
            let tag_offset = self.offset;
            let tag = self.read_pascal32()?;
            let id = parse_locale_tag(&tag).ok_or(TcadError::MalformedLocaleTag(tag_offset))?;
            let locale = self
                .locales
                .locale_by_id(id)
                .ok_or(TcadError::UnknownLocale(id, tag_offset))?;
            let text_offset = self.offset;
            let bytes = self.read_pascal32()?;
            let encoding = locale
                .encoding()
                .ok_or_else(|| TcadError::UnsupportedCodePage {
                    locale: locale.name().to_string(),
                    code_page: locale.code_page(),
                })?;
            let value = encoding
                .decode(&bytes)
                .ok_or(TcadError::MalformedString(text_offset))?;
            text.set(locale, value);
        }
        Ok(text)
    }
    fn advance_offset(&mut self, offset: usize) {
        self.offset += offset;
    }
}
