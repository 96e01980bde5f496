//! This crate provides the ability to read and write `TCADLIBX.k` shape template libraries.
//!
//! A library is a localized name, a read-only flag, and an ordered list of entries.  Each entry
//! is a named template: a bounding box, a localized display name, and a tree of shapes.  Fields
//! of the format whose meaning is unknown are kept as fixed-size byte arrays and written back
//! exactly as they were read, so loading and saving a library does not change it.
//!
//! # Usage
//!
//! Put this in your `Cargo.toml`:
//!
//! ``` toml
//! [dependencies]
//! tcadlib = "0.1.0"
//! ```
//!
//! Or if you want [serde](https://github.com/serde-rs/serde) support, enable the `serialize` feature:
//!
//! ``` toml
//! [dependencies]
//! tcadlib = { version = "0.1.0", features = ["serialize"] }
//! ```
//!
//! # Examples
//!
//! Open a library from disk:
//!
//! ``` rust
//! # fn ex() -> tcadlib::TcadResult<()> {
//! use tcadlib::ShapeLibrary;
//! use tcadlib::shapes::*;
//!
//! let library = ShapeLibrary::load_file("path/to/shapes.lib")?;
//! for entry in library.entries() {
//!     println!("{} ({}x{})", entry.name, entry.width, entry.height);
//!     match entry.shape.specific {
//!         ShapeType::Text(ref text) => {
//!             // do something with the text
//!         },
//!         ShapeType::Group(ref group) => {
//!             // walk `group.children`
//!         },
//!         _ => (),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Saving a library to disk; an existing file is first moved to `shapes.lib.bak`:
//!
//! ``` rust
//! # fn ex() -> tcadlib::TcadResult<()> {
//! use tcadlib::{I18nText, LocaleService, LocaleTable, ShapeLibrary, ShapeLibraryEntry};
//! use tcadlib::shapes::*;
//!
//! let en_us = LocaleTable::windows().locale_by_id(0x0409).unwrap();
//! let mut display_name = I18nText::new();
//! display_name.set(en_us, "Box");
//!
//! let mut library = ShapeLibrary::new();
//! let shape = Shape::new(ShapeType::Polygon(ArrowShape::default()));
//! library.add(ShapeLibraryEntry::new("box", 100, 50, display_name, shape));
//! library.save_file("path/to/shapes.lib")?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::doc_markdown)]

#[cfg(feature = "serialize")]
#[macro_use]
extern crate serde_derive;

mod color;
pub use crate::color::Color;

mod point;
pub use crate::point::Point;

mod locale;
pub use crate::locale::{
    codepage_to_encoding, Locale, LocaleService, LocaleTable, TextEncoding,
    UNICODE_ONLY_CODE_PAGE,
};

mod i18n_text;
pub use crate::i18n_text::{I18nText, LocalizedString};

mod shape;
pub use crate::shape::Shape;
pub mod shapes {
    pub use crate::shape::{
        ArrowShape, CommonOpaqueRegions, ContainerShape, EllipticalArcShape, ImageShape, Shape,
        ShapeCommon, ShapeType, SinusLineShape, SpiralShape, TextShape, MAX_NESTING_DEPTH,
    };
}

mod shape_library;
pub use crate::shape_library::{backup_path, ShapeLibrary, ShapeLibraryEntry};

mod library_reader;
mod library_writer;

mod tcad_error;
pub use crate::tcad_error::TcadError;

mod tcad_result;
pub use crate::tcad_result::TcadResult;

//------------------------------- test imports ---------------------------------

mod misc_tests;
