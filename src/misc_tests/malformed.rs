use crate::shapes::*;
use crate::*;

fn load(bytes: &[u8]) -> TcadResult<ShapeLibrary> {
    ShapeLibrary::load(&mut &bytes[..])
}

fn one_line_library() -> Vec<u8> {
    let mut library = ShapeLibrary::new();
    library.add(ShapeLibraryEntry::new(
        "e",
        10,
        20,
        I18nText::new(),
        Shape::new(ShapeType::Line(ArrowShape::default())),
    ));
    let mut buf = vec![];
    library.save(&mut buf).unwrap();
    buf
}

// magic (10) + flag (1) + empty name (4)
const HEADER_LENGTH: usize = 15;
const BODY_LENGTH_OFFSET: usize = HEADER_LENGTH + 2;

fn header_with_name(tag: &[u8], text: &[u8]) -> Vec<u8> {
    let mut data = b"TCADLIBX.k".to_vec();
    data.push(0x00);
    data.extend(&1i32.to_le_bytes());
    data.extend(&(tag.len() as i32).to_le_bytes());
    data.extend(tag);
    data.extend(&(text.len() as i32).to_le_bytes());
    data.extend(text);
    data
}

#[test]
fn empty_input_is_not_a_library() {
    match load(&[]) {
        Err(TcadError::InvalidMagic) => (),
        other => panic!("expected invalid magic, got {:?}", other),
    }
}

#[test]
fn short_magic_is_not_a_library() {
    match load(b"TCAD") {
        Err(TcadError::InvalidMagic) => (),
        other => panic!("expected invalid magic, got {:?}", other),
    }
}

#[test]
fn wrong_magic_is_not_a_library() {
    let mut bytes = one_line_library();
    bytes[9] = b'x';
    match load(&bytes) {
        Err(TcadError::InvalidMagic) => (),
        other => panic!("expected invalid magic, got {:?}", other),
    }
}

#[test]
fn header_alone_is_an_empty_library() {
    let bytes = one_line_library();
    let library = load(&bytes[..HEADER_LENGTH]).unwrap();
    assert!(library.entries().is_empty());
}

#[test]
fn every_truncation_is_reported() {
    let bytes = one_line_library();
    for cut in MAGIC_LENGTH..bytes.len() {
        if cut == HEADER_LENGTH {
            continue;
        }
        match load(&bytes[..cut]) {
            Err(TcadError::UnexpectedEndOfInput { .. }) => (),
            other => panic!("expected a short read at {}, got {:?}", cut, other),
        }
    }
}

const MAGIC_LENGTH: usize = 10;

#[test]
fn truncated_body_reports_where_it_starts() {
    let bytes = one_line_library();
    let body_start = BODY_LENGTH_OFFSET + 4;
    let body_length = bytes.len() - body_start;
    match load(&bytes[..bytes.len() - 3]) {
        Err(TcadError::UnexpectedEndOfInput {
            offset,
            expected,
            available,
        }) => {
            assert_eq!(body_start, offset);
            assert_eq!(body_length, expected);
            assert_eq!(body_length - 3, available);
        }
        other => panic!("expected a short read, got {:?}", other),
    }
}

#[test]
fn short_body_reports_absolute_offset() {
    // shrink the declared body so the last trailing field is missing
    let mut bytes = one_line_library();
    bytes.pop();
    let body_length = (bytes.len() - BODY_LENGTH_OFFSET - 4) as i32;
    bytes[BODY_LENGTH_OFFSET..BODY_LENGTH_OFFSET + 4].copy_from_slice(&body_length.to_le_bytes());
    match load(&bytes) {
        Err(TcadError::UnexpectedEndOfInput {
            offset,
            expected: 1,
            available: 0,
        }) => assert_eq!(bytes.len(), offset),
        other => panic!("expected a short read, got {:?}", other),
    }
}

#[test]
fn negative_count_is_rejected() {
    let mut bytes = one_line_library();
    bytes[MAGIC_LENGTH + 1..HEADER_LENGTH].copy_from_slice(&(-1i32).to_le_bytes());
    match load(&bytes) {
        Err(TcadError::NegativeLength(-1, 11)) => (),
        other => panic!("expected a negative length, got {:?}", other),
    }
}

#[test]
fn unknown_locale_reports_tag_offset() {
    match load(&header_with_name(b"Caption9999", b"x")) {
        Err(TcadError::UnknownLocale(9999, 15)) => (),
        other => panic!("expected an unknown locale, got {:?}", other),
    }
}

#[test]
fn non_numeric_locale_tag_is_rejected() {
    match load(&header_with_name(b"CaptionABCD", b"x")) {
        Err(TcadError::MalformedLocaleTag(15)) => (),
        other => panic!("expected a malformed tag, got {:?}", other),
    }
}

#[test]
fn invalid_code_page_text_is_rejected() {
    // 0xFF never starts a Shift_JIS sequence
    match load(&header_with_name(b"Caption1041", &[0xFF])) {
        Err(TcadError::MalformedString(30)) => (),
        other => panic!("expected a malformed string, got {:?}", other),
    }
}

#[test]
fn odd_length_utf16_text_is_rejected() {
    match load(&header_with_name(b"Caption1081", &[0xFF, 0xFE, 0x41])) {
        Err(TcadError::MalformedString(30)) => (),
        other => panic!("expected a malformed string, got {:?}", other),
    }
}

#[test]
fn big_endian_utf16_text_is_accepted() {
    let bytes = header_with_name(b"Caption1081", &[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]);
    let library = load(&bytes).unwrap();
    let hindi = LocaleTable::windows().locale_by_id(0x0439).unwrap();
    assert_eq!("AB", library.name.get(hindi));
}

#[test]
fn empty_localized_string_is_dropped() {
    let library = load(&header_with_name(b"Caption1033", b"")).unwrap();
    assert!(library.name.is_empty());
}

#[test]
fn unencodable_text_is_not_written() {
    let mut library = ShapeLibrary::new();
    let en_us = LocaleTable::windows().locale_by_id(0x0409).unwrap();
    library.name.set(en_us, "四角");
    match library.save(&mut vec![]) {
        Err(TcadError::UnencodableText(ref locale)) if locale == "en-US" => (),
        other => panic!("expected unencodable text, got {:?}", other),
    }
}

#[test]
fn locale_without_a_usable_code_page_is_not_written() {
    let table = LocaleTable::new(vec![Locale::new_unchecked(0x0409, "en-US", 12345)]);
    let mut library = ShapeLibrary::new();
    library.name.set(&table.all_locales()[0], "Box");
    match library.save_with_locales(&mut vec![], &table) {
        Err(TcadError::UnsupportedCodePage { ref locale, code_page: 12345 }) => {
            assert_eq!("en-US", locale)
        }
        other => panic!("expected an unsupported code page, got {:?}", other),
    }
}

#[test]
fn container_with_mismatched_references_is_not_written() {
    let mut group = Shape::new(ShapeType::Group(ContainerShape::default()));
    group.common.child_shape_refs = vec![4];
    let mut library = ShapeLibrary::new();
    library.add(ShapeLibraryEntry::new("g", 1, 1, I18nText::new(), group));
    match library.save(&mut vec![]) {
        Err(TcadError::ChildCountMismatch {
            refs: 1,
            children: 0,
        }) => (),
        other => panic!("expected a child count mismatch, got {:?}", other),
    }
}

#[test]
fn entry_name_longer_than_255_bytes_is_not_written() {
    let mut library = ShapeLibrary::new();
    library.add(ShapeLibraryEntry::new(
        &"n".repeat(256),
        1,
        1,
        I18nText::new(),
        Shape::new(ShapeType::Line(ArrowShape::default())),
    ));
    match library.save(&mut vec![]) {
        Err(TcadError::ValueTooLong {
            length: 256,
            max: 255,
        }) => (),
        other => panic!("expected a value that is too long, got {:?}", other),
    }
}
