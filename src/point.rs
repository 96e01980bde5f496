/// Represents a point in the design-unit plane of a shape template.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Point {
    /// The X value of the point.
    pub x: f32,
    /// The Y value of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new `Point` with the specified values.
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }
    /// Returns a point representing the origin of (0, 0).
    pub fn origin() -> Point {
        Point::new(0.0, 0.0)
    }

    pub fn tuple(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
