use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum TcadError {
    IoError(io::Error),
    ImageError(image::ImageError),
    InvalidMagic,
    UnexpectedEndOfInput {
        offset: usize,
        expected: usize,
        available: usize,
    },
    NegativeLength(i64, usize),
    MalformedLocaleTag(usize),
    UnknownLocale(u32, usize),
    MalformedString(usize),
    UnencodableText(String),
    UnencodableName(String),
    UnsupportedCodePage {
        locale: String,
        code_page: u32,
    },
    ValueTooLong {
        length: usize,
        max: usize,
    },
    ChildCountMismatch {
        refs: usize,
        children: usize,
    },
    NestingTooDeep {
        max_depth: usize,
        offset: Option<usize>,
    },
}

impl From<io::Error> for TcadError {
    fn from(ioe: io::Error) -> TcadError {
        TcadError::IoError(ioe)
    }
}

impl From<::image::ImageError> for TcadError {
    fn from(ie: ::image::ImageError) -> TcadError {
        TcadError::ImageError(ie)
    }
}

impl fmt::Display for TcadError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TcadError::IoError(ref e) => write!(formatter, "{}", e),
            TcadError::ImageError(ref e) => write!(formatter, "{}", e),
            TcadError::InvalidMagic => write!(
                formatter,
                "the file does not start with the TCADLIBX.k signature"
            ),
            TcadError::UnexpectedEndOfInput {
                offset,
                expected,
                available,
            } => write!(
                formatter,
                "the input ended early at offset {}: expected {} byte(s) but only {} were available",
                offset, expected, available
            ),
            TcadError::NegativeLength(l, o) => write!(
                formatter,
                "the length prefix {} at offset {} is negative",
                l, o
            ),
            TcadError::MalformedLocaleTag(o) => write!(
                formatter,
                "the localized text tag at offset {} does not end with a locale identifier",
                o
            ),
            TcadError::UnknownLocale(id, o) => write!(
                formatter,
                "the locale identifier {} at offset {} is not known",
                id, o
            ),
            TcadError::MalformedString(o) => write!(
                formatter,
                "the string at offset {} is not valid in its declared encoding",
                o
            ),
            TcadError::UnencodableText(ref locale) => write!(
                formatter,
                "the text cannot be represented in the code page of locale '{}'",
                locale
            ),
            TcadError::UnencodableName(ref text) => write!(
                formatter,
                "'{}' cannot be represented in the single-byte Windows-1252 encoding",
                text
            ),
            TcadError::UnsupportedCodePage {
                ref locale,
                code_page,
            } => write!(
                formatter,
                "locale '{}' uses code page {}, which has no known encoding",
                locale, code_page
            ),
            TcadError::ValueTooLong { length, max } => write!(
                formatter,
                "the value is {} byte(s) long but its length prefix allows at most {}",
                length, max
            ),
            TcadError::ChildCountMismatch { refs, children } => write!(
                formatter,
                "the container lists {} child reference(s) but owns {} child shape(s)",
                refs, children
            ),
            TcadError::NestingTooDeep {
                max_depth,
                offset: Some(offset),
            } => write!(
                formatter,
                "shapes are nested more than {} levels deep at offset {}",
                max_depth, offset
            ),
            TcadError::NestingTooDeep {
                max_depth,
                offset: None,
            } => write!(
                formatter,
                "shapes are nested more than {} levels deep",
                max_depth
            ),
        }
    }
}

impl error::Error for TcadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            TcadError::IoError(ref e) => Some(e),
            TcadError::ImageError(ref e) => Some(e),
            _ => None,
        }
    }
}
