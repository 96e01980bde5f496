use crate::shapes::*;
use crate::*;

use proptest::collection::vec;
use proptest::prelude::*;

fn locale(id: u32) -> &'static Locale {
    LocaleTable::windows().locale_by_id(id).unwrap()
}

fn round_trip(library: &ShapeLibrary) -> (Vec<u8>, ShapeLibrary) {
    let mut bytes = vec![];
    library.save(&mut bytes).unwrap();
    let reloaded = ShapeLibrary::load(&mut bytes.as_slice()).unwrap();
    (bytes, reloaded)
}

fn arb_point() -> impl Strategy<Value = Point> {
    (-1.0e9f32..1.0e9f32, -1.0e9f32..1.0e9f32).prop_map(|(x, y)| Point::new(x, y))
}

fn arb_color() -> impl Strategy<Value = Color> {
    any::<[u8; 3]>().prop_map(|[r, g, b]| Color::new(r, g, b))
}

fn arb_polygon() -> impl Strategy<Value = Shape> {
    (
        vec(arb_point(), 0..16),
        -360.0f32..360.0f32,
        arb_color(),
        any::<u8>(),
        any::<(bool, bool, bool)>(),
        any::<[u8; 16]>(),
        any::<(i32, i8)>(),
    )
        .prop_map(
            |(points, rotation, fill_color, text_style, flags, opaque, (angle, style))| {
                let mut shape = Shape::new(ShapeType::Polygon(ArrowShape {
                    arrow_angle: angle,
                    arrow_style: style,
                    ..Default::default()
                }));
                shape.common.points = points;
                shape.common.rotation = rotation;
                shape.common.fill_color = fill_color;
                shape.common.text_style = text_style;
                let (flip_horizontal, locked, parent_centered) = flags;
                shape.common.flip_horizontal = flip_horizontal;
                shape.common.locked = locked;
                shape.common.parent_centered = parent_centered;
                shape.common.opaque.before_rotation = opaque;
                shape
            },
        )
}

proptest! {
    #[test]
    fn localized_text_round_trips(ascii in "[ -~]{0,40}", any_text in "\\PC{0,20}") {
        let mut library = ShapeLibrary::new();
        library.name.set(locale(0x0409), ascii);
        library.name.set(locale(0x0439), any_text);
        let (_, reloaded) = round_trip(&library);
        prop_assert_eq!(library, reloaded);
    }

    #[test]
    fn entry_fields_round_trip(
        name in "[ -~]{0,255}",
        width in any::<i32>(),
        height in any::<i32>(),
        shape in arb_polygon(),
    ) {
        let mut library = ShapeLibrary::new();
        library.add(ShapeLibraryEntry::new(&name, width, height, I18nText::new(), shape));
        let (bytes, reloaded) = round_trip(&library);
        prop_assert_eq!(&library, &reloaded);
        let (again, _) = round_trip(&reloaded);
        prop_assert_eq!(bytes, again);
    }
}
