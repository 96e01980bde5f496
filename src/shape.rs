use std::fmt;

use image::DynamicImage;

use crate::{Color, I18nText, Point, TcadResult};

pub(crate) const TEXT_TAG: &str = "TMyText";
pub(crate) const LINE_TAG: &str = "TMyLine";
pub(crate) const POLYGON_TAG: &str = "TMyPolygon";
pub(crate) const POLY_LINE_TAG: &str = "TMyPolyLine";
pub(crate) const FREE_LINE_TAG: &str = "TMyFreeLine";
pub(crate) const IMAGE_TAG: &str = "TMyImage";
pub(crate) const GROUP_TAG: &str = "TMyGroup";
pub(crate) const COMBINE_TAG: &str = "TMyCombine";
pub(crate) const ELLIPTICAL_ARC_TAG: &str = "TMyElliArc";
pub(crate) const SPIRAL_TAG: &str = "TMySpiral";
pub(crate) const SINUS_LINE_TAG: &str = "TMySinusLine";

/// Width of the space-padded type tag that starts every shape record.
pub(crate) const TYPE_TAG_LENGTH: usize = 16;

/// Deepest container nesting accepted when reading or writing; the root shape is level 1.
pub const MAX_NESTING_DEPTH: usize = 128;

const TEXT_STYLE_BOLD: u8 = 1;
const TEXT_STYLE_ITALIC: u8 = 2;
const TEXT_STYLE_UNDERLINE: u8 = 4;
const TEXT_STYLE_STRIKETHROUGH: u8 = 8;

/// One node of a template's geometry tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Shape {
    pub common: ShapeCommon,
    pub specific: ShapeType,
}

/// The fields every shape record carries, whatever its type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ShapeCommon {
    pub auto_number: i32,
    /// Identifies the shape within its entry.
    pub shape_ref: i32,
    /// The `shape_ref` of the parent, or `-1` for the root of an entry.
    pub parent_shape_ref: i32,
    /// The `shape_ref` of each child, in child order.
    pub child_shape_refs: Vec<i32>,
    pub points: Vec<Point>,
    pub rotation: f32,
    pub fill_color: Color,
    pub shape_name: String,
    pub font_name: String,
    pub font_color: Color,
    pub font_size: i32,
    /// Raw style bits; see the `is_bold`/`set_is_bold` family of accessors.
    pub text_style: u8,
    pub stroke_color: Color,
    pub stroke_type: i8,
    pub stroke_width: i32,
    /// A localized text block of unknown purpose.
    pub tertiary_text: I18nText,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub comments: Vec<String>,
    pub locked: bool,
    pub rotatable: bool,
    pub resizable: bool,
    pub parent_centered: bool,
    pub opaque: CommonOpaqueRegions,
}

/// The byte spans of unknown meaning in the common part of a shape record, named after the
/// field they precede.  They are written back exactly as read.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct CommonOpaqueRegions {
    pub before_auto_number: [u8; 4],
    pub before_parent_shape_ref: [u8; 4],
    pub before_points: [u8; 4],
    /// Contains two floats that change with rotation.
    pub before_rotation: [u8; 16],
    pub before_fill_color: [u8; 8],
    pub before_shape_name: [u8; 2],
    pub before_font_name: [u8; 8],
    pub before_font_color: [u8; 1],
    pub before_font_size: [u8; 5],
    pub before_text_style: [u8; 5],
    pub before_stroke_color: [u8; 13],
    pub before_stroke_type: [u8; 2],
    pub before_comments: [u8; 1],
    pub before_locked: [u8; 10],
    pub before_rotatable: [u8; 3],
}

/// The type-specific part of a shape, selected by the record's type tag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ShapeType {
    Text(TextShape),
    Line(ArrowShape),
    Polygon(ArrowShape),
    PolyLine(ArrowShape),
    FreeLine(ArrowShape),
    Image(ImageShape),
    Group(ContainerShape),
    Combine(ContainerShape),
    EllipticalArc(EllipticalArcShape),
    Spiral(SpiralShape),
    SinusLine(SinusLineShape),
    /// A tag without known trailing fields.  Nothing is read or written after the common
    /// fields, so a tag that does carry trailing data will not survive intact.
    Other(String),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TextShape {
    pub opaque_before_text: [u8; 6],
    pub text: String,
    pub opaque_before_alignment: [u8; 1],
    pub alignment: i8,
    pub wrap: i8,
}

/// Trailing fields shared by lines, polygons, poly-lines and free lines.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ArrowShape {
    pub arrow_angle: i32,
    pub arrow_length: i8,
    pub arrow_offset: i8,
    pub arrow_style: i8,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ImageShape {
    /// The embedded bitmap, exactly as stored.
    pub bitmap: Vec<u8>,
}

/// Trailing fields of groups and combined shapes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ContainerShape {
    pub opaque: [u8; 16],
    /// One child per entry of `ShapeCommon::child_shape_refs`, in the same order.
    pub children: Vec<Shape>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct EllipticalArcShape {
    pub opaque: [u8; 2],
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SpiralShape {
    pub opaque: [u8; 4],
    pub distance: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SinusLineShape {
    pub period: i32,
}

//------------------------------------------------------------------------------
//                                                                         Shape
//------------------------------------------------------------------------------
impl Shape {
    /// Creates a root shape with default common fields.
    pub fn new(specific: ShapeType) -> Self {
        Shape {
            common: ShapeCommon::default(),
            specific,
        }
    }
    /// The type tag written for this shape, e.g. `TMyPolygon`.
    pub fn type_name(&self) -> &str {
        self.specific.type_name()
    }
    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }
    /// The child shapes of a group or combined shape.
    pub fn children(&self) -> Option<&[Shape]> {
        match self.specific {
            ShapeType::Group(ref c) | ShapeType::Combine(ref c) => Some(c.children.as_slice()),
            _ => None,
        }
    }
    pub fn children_mut(&mut self) -> Option<&mut Vec<Shape>> {
        match self.specific {
            ShapeType::Group(ref mut c) | ShapeType::Combine(ref mut c) => Some(&mut c.children),
            _ => None,
        }
    }
    /// Appends `child` to a container, recording its reference and pointing it at this shape.
    /// Returns `false` when this shape is not a container.
    pub fn add_child(&mut self, mut child: Shape) -> bool {
        let parent_ref = self.common.shape_ref;
        let child_ref = child.common.shape_ref;
        match self.children_mut() {
            Some(children) => {
                child.common.parent_shape_ref = parent_ref;
                children.push(child);
            }
            None => return false,
        }
        self.common.child_shape_refs.push(child_ref);
        true
    }
    /// This shape plus all shapes below it.
    pub fn number_of_descendants(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(shape) = pending.pop() {
            count += 1;
            pending.extend(shape.children().unwrap_or(&[]));
        }
        count
    }
    /// Number of levels in the tree below and including this shape; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((shape, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(shape.children().unwrap_or(&[]).iter().map(|c| (c, level + 1)));
        }
        deepest
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{} #{} {:?}",
            self.type_name(),
            self.common.shape_ref,
            self.common.shape_name
        )?;
        if let Some(children) = self.children() {
            write!(formatter, " [")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(formatter, ", ")?;
                }
                write!(formatter, "{}", child)?;
            }
            write!(formatter, "]")?;
        }
        Ok(())
    }
}

//------------------------------------------------------------------------------
//                                                                   ShapeCommon
//------------------------------------------------------------------------------
impl ShapeCommon {
    pub fn is_bold(&self) -> bool {
        self.text_style & TEXT_STYLE_BOLD != 0
    }
    pub fn set_is_bold(&mut self, val: bool) {
        self.set_text_style_flag(TEXT_STYLE_BOLD, val);
    }
    pub fn is_italic(&self) -> bool {
        self.text_style & TEXT_STYLE_ITALIC != 0
    }
    pub fn set_is_italic(&mut self, val: bool) {
        self.set_text_style_flag(TEXT_STYLE_ITALIC, val);
    }
    pub fn is_underline(&self) -> bool {
        self.text_style & TEXT_STYLE_UNDERLINE != 0
    }
    pub fn set_is_underline(&mut self, val: bool) {
        self.set_text_style_flag(TEXT_STYLE_UNDERLINE, val);
    }
    pub fn is_strikethrough(&self) -> bool {
        self.text_style & TEXT_STYLE_STRIKETHROUGH != 0
    }
    pub fn set_is_strikethrough(&mut self, val: bool) {
        self.set_text_style_flag(TEXT_STYLE_STRIKETHROUGH, val);
    }
    fn set_text_style_flag(&mut self, flag: u8, val: bool) {
        if val {
            self.text_style |= flag;
        } else {
            self.text_style &= !flag;
        }
    }
}

impl Default for ShapeCommon {
    fn default() -> Self {
        ShapeCommon {
            auto_number: 0,
            shape_ref: 0,
            parent_shape_ref: -1,
            child_shape_refs: vec![],
            points: vec![],
            rotation: 0.0,
            fill_color: Color::white(),
            shape_name: String::new(),
            font_name: String::new(),
            font_color: Color::black(),
            font_size: 0,
            text_style: 0,
            stroke_color: Color::black(),
            stroke_type: 0,
            stroke_width: 1,
            tertiary_text: I18nText::new(),
            flip_horizontal: false,
            flip_vertical: false,
            comments: vec![],
            locked: false,
            rotatable: true,
            resizable: true,
            parent_centered: false,
            opaque: CommonOpaqueRegions::default(),
        }
    }
}

// most frequently observed values in sample libraries
impl Default for CommonOpaqueRegions {
    fn default() -> Self {
        CommonOpaqueRegions {
            before_auto_number: [0; 4],
            before_parent_shape_ref: [0; 4],
            before_points: [0; 4],
            before_rotation: [0; 16],
            before_fill_color: [0; 8],
            before_shape_name: [0x00, 0x01],
            before_font_name: [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00],
            before_font_color: [0x01],
            before_font_size: [0x00, 0xE3, 0xFF, 0xFF, 0xFF],
            before_text_style: [0x00, 0x60, 0x00, 0x00, 0x00],
            before_stroke_color: [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x17, 0x00, 0x00, 0x00, 0x00,
            ],
            before_stroke_type: [0x00, 0x04],
            before_comments: [0x01],
            before_locked: [0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00],
            before_rotatable: [0x00, 0x00, 0x01],
        }
    }
}

//------------------------------------------------------------------------------
//                                                                     ShapeType
//------------------------------------------------------------------------------
impl ShapeType {
    pub fn type_name(&self) -> &str {
        match *self {
            ShapeType::Text(_) => TEXT_TAG,
            ShapeType::Line(_) => LINE_TAG,
            ShapeType::Polygon(_) => POLYGON_TAG,
            ShapeType::PolyLine(_) => POLY_LINE_TAG,
            ShapeType::FreeLine(_) => FREE_LINE_TAG,
            ShapeType::Image(_) => IMAGE_TAG,
            ShapeType::Group(_) => GROUP_TAG,
            ShapeType::Combine(_) => COMBINE_TAG,
            ShapeType::EllipticalArc(_) => ELLIPTICAL_ARC_TAG,
            ShapeType::Spiral(_) => SPIRAL_TAG,
            ShapeType::SinusLine(_) => SINUS_LINE_TAG,
            ShapeType::Other(ref tag) => tag.as_str(),
        }
    }
}

//------------------------------------------------------------------------------
//                                                                     TextShape
//------------------------------------------------------------------------------
impl TextShape {
    pub fn new(text: &str) -> Self {
        TextShape {
            text: String::from(text),
            ..Default::default()
        }
    }
}

impl Default for TextShape {
    fn default() -> Self {
        TextShape {
            opaque_before_text: [0x00, 0x01, 0x01, 0x00, 0x00, 0x00],
            text: String::new(),
            opaque_before_alignment: [0x00],
            alignment: 0,
            wrap: 0,
        }
    }
}

//------------------------------------------------------------------------------
//                                                                    ImageShape
//------------------------------------------------------------------------------
impl ImageShape {
    pub fn new(bitmap: Vec<u8>) -> Self {
        ImageShape { bitmap }
    }
    /// Decodes the embedded bitmap.
    pub fn decode_bitmap(&self) -> TcadResult<DynamicImage> {
        Ok(image::load_from_memory(&self.bitmap)?)
    }
}
