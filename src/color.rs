use std::fmt;

/// An RGB color as stored in a library; there is no alpha channel.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
    pub fn black() -> Color {
        Color::new(0, 0, 0)
    }
    pub fn white() -> Color {
        Color::new(0xFF, 0xFF, 0xFF)
    }
    pub fn components(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
