use crate::shapes::*;
use crate::*;

fn locale(id: u32) -> &'static Locale {
    LocaleTable::windows().locale_by_id(id).unwrap()
}

fn save(library: &ShapeLibrary) -> Vec<u8> {
    let mut buf = vec![];
    library.save(&mut buf).unwrap();
    buf
}

fn load(bytes: &[u8]) -> ShapeLibrary {
    ShapeLibrary::load(&mut &bytes[..]).unwrap()
}

fn patterned<const N: usize>(seed: u8) -> [u8; N] {
    let mut bytes = [0u8; N];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = seed.wrapping_add(i as u8).wrapping_mul(7);
    }
    bytes
}

fn shape(shape_ref: i32, specific: ShapeType) -> Shape {
    let mut shape = Shape::new(specific);
    shape.common.shape_ref = shape_ref;
    shape.common.auto_number = shape_ref * 10;
    shape
}

fn unusual_common(shape: &mut Shape) {
    let seed = shape.common.shape_ref as u8;
    let common = &mut shape.common;
    common.points = vec![Point::new(-1.5, 2.25), Point::new(1e6, -0.0)];
    common.rotation = 45.5;
    common.fill_color = Color::new(0x12, 0x34, 0x56);
    common.shape_name = String::from("Café");
    common.font_name = String::from("Arial");
    common.font_color = Color::new(0xFE, 0x00, 0x7F);
    common.font_size = 12;
    common.text_style = 0xFF;
    common.stroke_color = Color::new(1, 2, 3);
    common.stroke_type = -3;
    common.stroke_width = 7;
    common.tertiary_text.set(locale(0x0409), "tertiary");
    common.tertiary_text.set(locale(0x0411), "箱");
    common.tertiary_text.set(locale(0x0439), "बॉक्स");
    common.flip_horizontal = true;
    common.flip_vertical = true;
    common.comments = vec![String::from("first"), String::from("zweite Ä")];
    common.locked = true;
    common.rotatable = false;
    common.resizable = false;
    common.parent_centered = true;
    common.opaque = CommonOpaqueRegions {
        before_auto_number: patterned(seed),
        before_parent_shape_ref: patterned(seed.wrapping_add(1)),
        before_points: patterned(seed.wrapping_add(2)),
        before_rotation: patterned(seed.wrapping_add(3)),
        before_fill_color: patterned(seed.wrapping_add(4)),
        before_shape_name: patterned(seed.wrapping_add(5)),
        before_font_name: patterned(seed.wrapping_add(6)),
        before_font_color: patterned(seed.wrapping_add(7)),
        before_font_size: patterned(seed.wrapping_add(8)),
        before_text_style: patterned(seed.wrapping_add(9)),
        before_stroke_color: patterned(seed.wrapping_add(10)),
        before_stroke_type: patterned(seed.wrapping_add(11)),
        before_comments: patterned(seed.wrapping_add(12)),
        before_locked: patterned(seed.wrapping_add(13)),
        before_rotatable: patterned(seed.wrapping_add(14)),
    };
}

fn every_shape_type() -> Shape {
    let mut text = TextShape::new("Hello ©");
    text.opaque_before_text = patterned(40);
    text.opaque_before_alignment = [0xAB];
    text.alignment = 2;
    text.wrap = 1;

    let arrow = ArrowShape {
        arrow_angle: 30,
        arrow_length: 5,
        arrow_offset: -2,
        arrow_style: 3,
    };

    let mut combine = shape(
        8,
        ShapeType::Combine(ContainerShape {
            opaque: patterned(80),
            children: vec![],
        }),
    );
    combine.add_child(shape(
        9,
        ShapeType::EllipticalArc(EllipticalArcShape { opaque: [0x0D, 0xF0] }),
    ));
    combine.add_child(shape(
        10,
        ShapeType::Spiral(SpiralShape {
            opaque: patterned(100),
            distance: 3.75,
        }),
    ));

    let mut root = shape(
        1,
        ShapeType::Group(ContainerShape {
            opaque: patterned(10),
            children: vec![],
        }),
    );
    let children = vec![
        shape(2, ShapeType::Text(text)),
        shape(3, ShapeType::Line(arrow.clone())),
        shape(4, ShapeType::Polygon(arrow.clone())),
        shape(5, ShapeType::Other(String::from("TMyRectangle"))),
        shape(6, ShapeType::PolyLine(arrow.clone())),
        shape(7, ShapeType::FreeLine(arrow)),
        shape(11, ShapeType::Image(ImageShape::new(vec![0x42, 0x4D, 0x00, 0xFF]))),
        combine,
        shape(12, ShapeType::SinusLine(SinusLineShape { period: -20 })),
    ];
    for child in children {
        assert!(root.add_child(child));
    }
    unusual_common(&mut root);
    if let Some(children) = root.children_mut() {
        for child in children.iter_mut() {
            unusual_common(child);
        }
    }
    root
}

fn library_with(shape: Shape) -> ShapeLibrary {
    let mut library = ShapeLibrary::new();
    library.read_only = true;
    library.name.set(locale(0x0409), "Test");
    library.name.set(locale(0x0407), "Prüfung");
    let mut i18n_name = I18nText::new();
    i18n_name.set(locale(0x0409), "Everything");
    library.add(ShapeLibraryEntry::new("all shapes", 640, -480, i18n_name, shape));
    library
}

#[test]
fn every_shape_type_survives_a_round_trip() {
    let library = library_with(every_shape_type());
    let bytes = save(&library);
    let reloaded = load(&bytes);
    assert_eq!(library, reloaded);
    assert_eq!(bytes, save(&reloaded));
}

#[test]
fn unknown_tag_does_not_disturb_its_siblings() {
    let reloaded = load(&save(&library_with(every_shape_type())));
    let children = reloaded.entries()[0].shape.children().unwrap();
    assert_eq!("TMyRectangle", children[3].type_name());
    assert_eq!(ShapeType::Other(String::from("TMyRectangle")), children[3].specific);
    assert_eq!(6, children[4].common.shape_ref);
    assert_eq!(
        ShapeType::PolyLine(ArrowShape {
            arrow_angle: 30,
            arrow_length: 5,
            arrow_offset: -2,
            arrow_style: 3,
        }),
        children[4].specific
    );
}

#[test]
fn nested_container_children_are_read_in_order() {
    let reloaded = load(&save(&library_with(every_shape_type())));
    let entry = &reloaded.entries()[0];
    assert_eq!(12, entry.number_of_descendants());
    let combine = &entry.shape.children().unwrap()[7];
    assert_eq!("TMyCombine", combine.type_name());
    let names: Vec<&str> = combine
        .children()
        .unwrap()
        .iter()
        .map(Shape::type_name)
        .collect();
    assert_eq!(vec!["TMyElliArc", "TMySpiral"], names);
    assert_eq!(8, combine.children().unwrap()[1].common.parent_shape_ref);
}

// magic (10) + flag (1) + empty name (4) + "\x01e" (2) + body length (4) + width (4)
// + height (4) + empty display name (4)
const DESCENDANT_COUNT_OFFSET: usize = 33;

fn small_library() -> ShapeLibrary {
    let mut root = shape(1, ShapeType::Group(ContainerShape::default()));
    root.add_child(shape(2, ShapeType::Line(ArrowShape::default())));
    root.add_child(shape(3, ShapeType::Line(ArrowShape::default())));
    let mut library = ShapeLibrary::new();
    library.add(ShapeLibraryEntry::new("e", 1, 2, I18nText::new(), root));
    library
}

#[test]
fn descendant_count_is_written_from_the_tree() {
    let bytes = save(&small_library());
    assert_eq!(
        &[3, 0, 0, 0],
        &bytes[DESCENDANT_COUNT_OFFSET..DESCENDANT_COUNT_OFFSET + 4]
    );
}

#[test]
fn stale_descendant_count_is_corrected() {
    let bytes = save(&small_library());
    let mut stale = bytes.clone();
    stale[DESCENDANT_COUNT_OFFSET] = 99;
    let reloaded = load(&stale);
    assert_eq!(small_library(), reloaded);
    assert_eq!(bytes, save(&reloaded));
}

#[test]
fn entry_trailing_bytes_are_kept() {
    let mut library = small_library();
    for entry in library.entries_mut() {
        entry.trailing_data = vec![0xDE, 0xAD, 0xBE, 0xEF];
    }
    let bytes = save(&library);
    let reloaded = load(&bytes);
    assert_eq!(&[0xDE, 0xAD, 0xBE, 0xEF], reloaded.entries()[0].trailing_data());
    assert_eq!(bytes, save(&reloaded));
}

#[test]
fn entries_are_read_in_file_order() {
    let mut library = small_library();
    let mut second = library.entries()[0].clone();
    second.name = String::from("second");
    second.width = 300;
    library.add(second);
    let reloaded = load(&save(&library));
    let names: Vec<&str> = reloaded.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(vec!["e", "second"], names);
    assert_eq!(300, reloaded.entries()[1].width);
}

#[test]
fn custom_locale_service_is_used_both_ways() {
    let locales = LocaleTable::new(vec![Locale::new(7, "x-custom", 1251).unwrap()]);
    let custom = &locales.all_locales()[0];
    let mut library = ShapeLibrary::new();
    library.name.set(custom, "Привет");

    let mut bytes = vec![];
    library.save_with_locales(&mut bytes, &locales).unwrap();
    assert!(bytes.windows(11).any(|w| w == b"Caption0007"));

    let reloaded = ShapeLibrary::load_with_locales(&mut bytes.as_slice(), &locales).unwrap();
    assert_eq!("Привет", reloaded.name.get(custom));

    // the built-in table has no locale 7
    match ShapeLibrary::load(&mut bytes.as_slice()) {
        Err(TcadError::UnknownLocale(7, 15)) => (),
        other => panic!("expected an unknown locale, got {:?}", other),
    }
}
