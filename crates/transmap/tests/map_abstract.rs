use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok};
use transmap::{ClassDef, ClassId, MapperFactory, Schema, Type, Value};

struct Shapes {
    schema: Schema,
    source_circle: ClassId,
    source_square: ClassId,
    source_drawing: ClassId,
    shape: ClassId,
    circle: ClassId,
    square: ClassId,
    drawing: ClassId,
    label: ClassId,
}

/// Two parallel hierarchies: `SourceShape` with `SourceCircle` and
/// `SourceSquare`, and the abstract `Shape` with `Circle` and `Square`.
fn shapes() -> Shapes {
    let source_shape = ClassDef::new("SourceShape")
        .abstract_class()
        .field("name", Type::String);
    let source_circle = ClassDef::new("SourceCircle")
        .extends(source_shape.id)
        .field("radius", Type::I32);
    let source_square = ClassDef::new("SourceSquare")
        .extends(source_shape.id)
        .field("side", Type::I32);
    let source_drawing =
        ClassDef::new("SourceDrawing").field("shapes", Type::list(Type::Object(source_shape.id)));

    let shape = ClassDef::new("Shape")
        .abstract_class()
        .field("name", Type::String);
    let circle = ClassDef::new("Circle")
        .extends(shape.id)
        .field("radius", Type::I32);
    let square = ClassDef::new("Square")
        .extends(shape.id)
        .field("side", Type::I32);
    let drawing = ClassDef::new("Drawing").field("shapes", Type::list(Type::Object(shape.id)));

    let label = ClassDef::new("Label").field("name", Type::String);

    let (source_circle_id, source_square_id, source_drawing_id) =
        (source_circle.id, source_square.id, source_drawing.id);
    let (shape_id, circle_id, square_id, drawing_id, label_id) =
        (shape.id, circle.id, square.id, drawing.id, label.id);

    let schema = Schema::builder()
        .class(source_shape)
        .class(source_circle)
        .class(source_square)
        .class(source_drawing)
        .class(shape)
        .class(circle)
        .class(square)
        .class(drawing)
        .class(label)
        .build()
        .unwrap();

    Shapes {
        schema,
        source_circle: source_circle_id,
        source_square: source_square_id,
        source_drawing: source_drawing_id,
        shape: shape_id,
        circle: circle_id,
        square: square_id,
        drawing: drawing_id,
        label: label_id,
    }
}

fn factory(shapes: &Shapes) -> MapperFactory {
    let mut builder = MapperFactory::builder(shapes.schema.clone());
    for (a, b) in [
        (shapes.source_circle, shapes.circle),
        (shapes.source_square, shapes.square),
    ] {
        let map = builder.class_map(a, b).by_default().build().unwrap();
        builder.register_class_map(map);
    }
    builder.build().unwrap()
}

#[test]
fn abstract_destination_resolves_from_registered_class_maps() {
    let shapes = shapes();
    let factory = factory(&shapes);

    let circle = factory.schema().instantiate(shapes.source_circle).unwrap();
    circle.set("name", "wheel").unwrap();
    circle.set("radius", 4).unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(circle), &Type::Object(shapes.shape)))
    .to_object()
    .unwrap();

    assert_eq!(mapped.class_id(), shapes.circle);
    assert_eq!(mapped.get("name").unwrap(), Value::from("wheel"));
    assert_eq!(mapped.get("radius").unwrap(), Value::I32(4));
}

#[test]
fn list_elements_keep_their_concrete_classes() {
    let shapes = shapes();
    let factory = factory(&shapes);
    let schema = factory.schema();

    let circle = schema.instantiate(shapes.source_circle).unwrap();
    circle.set("radius", 2).unwrap();
    let square = schema.instantiate(shapes.source_square).unwrap();
    square.set("side", 3).unwrap();

    let drawing = schema.instantiate(shapes.source_drawing).unwrap();
    drawing
        .set("shapes", vec![Value::from(&circle), Value::from(&square)])
        .unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(drawing), &Type::Object(shapes.drawing)))
    .to_object()
    .unwrap();

    let classes: Vec<ClassId> = mapped
        .get("shapes")
        .unwrap()
        .into_elements()
        .unwrap()
        .into_iter()
        .map(|item| item.to_object().unwrap().class_id())
        .collect();
    assert_eq!(classes, [shapes.circle, shapes.square]);
}

#[test]
fn concrete_type_hint_is_the_fallback() {
    let shapes = shapes();
    let mut builder = MapperFactory::builder(shapes.schema.clone());
    builder.concrete_type(shapes.shape, shapes.square);
    let factory = assert_ok!(builder.build());

    let label = factory.schema().instantiate(shapes.label).unwrap();
    label.set("name", "plain").unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(label), &Type::Object(shapes.shape)))
    .to_object()
    .unwrap();
    assert_eq!(mapped.class_id(), shapes.square);
    assert_eq!(mapped.get("name").unwrap(), Value::from("plain"));
}

#[test]
fn context_registration_overrides_class_maps() {
    let shapes = shapes();
    let factory = factory(&shapes);
    let facade = factory.facade();

    let circle = factory.schema().instantiate(shapes.source_circle).unwrap();
    circle.set("name", "odd").unwrap();

    let mut cx = facade.new_context();
    cx.register_concrete_class(shapes.source_circle, shapes.square);
    assert_eq!(
        assert_ok!(factory.lookup_concrete_class(shapes.source_circle, shapes.shape, &cx)),
        shapes.square
    );

    let mapped = assert_ok!(facade.map_with(
        &Value::Object(circle),
        &Type::Object(shapes.shape),
        &mut cx
    ))
    .to_object()
    .unwrap();
    assert_eq!(mapped.class_id(), shapes.square);
    assert_eq!(mapped.get("name").unwrap(), Value::from("odd"));
}

#[test]
fn unresolvable_abstract_destination_fails() {
    let shapes = shapes();
    let factory = assert_ok!(MapperFactory::builder(shapes.schema.clone()).build());

    let label = factory.schema().instantiate(shapes.label).unwrap();
    let err = assert_err!(factory
        .facade()
        .map(&Value::Object(label), &Type::Object(shapes.shape)));

    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "mapping Label -> Shape failed: cannot resolve a concrete class for abstract `Shape`"
    );
}

struct Overlap {
    schema: Schema,
    source_shape: ClassId,
    source_circle: ClassId,
    shape: ClassId,
    circle: ClassId,
    fancy_circle: ClassId,
    square: ClassId,
}

/// `FancyCircle` refines `Circle`, so class maps can be registered for
/// overlapping pairs.
fn overlap() -> Overlap {
    let source_shape = ClassDef::new("SourceShape").field("name", Type::String);
    let source_circle = ClassDef::new("SourceCircle")
        .extends(source_shape.id)
        .field("radius", Type::I32);

    let shape = ClassDef::new("Shape")
        .abstract_class()
        .field("name", Type::String);
    let circle = ClassDef::new("Circle")
        .extends(shape.id)
        .field("radius", Type::I32);
    let fancy_circle = ClassDef::new("FancyCircle")
        .extends(circle.id)
        .field("glow", Type::BOOL);
    let square = ClassDef::new("Square")
        .extends(shape.id)
        .field("side", Type::I32);

    Overlap {
        source_shape: source_shape.id,
        source_circle: source_circle.id,
        shape: shape.id,
        circle: circle.id,
        fancy_circle: fancy_circle.id,
        square: square.id,
        schema: Schema::builder()
            .class(source_shape)
            .class(source_circle)
            .class(shape)
            .class(circle)
            .class(fancy_circle)
            .class(square)
            .build()
            .unwrap(),
    }
}

fn factory_with(schema: &Schema, pairs: &[(ClassId, ClassId)]) -> MapperFactory {
    let mut builder = MapperFactory::builder(schema.clone());
    for &(a, b) in pairs {
        let map = builder.class_map(a, b).by_default().build().unwrap();
        builder.register_class_map(map);
    }
    assert_ok!(builder.build())
}

fn map_circle_to_shape(factory: &MapperFactory, o: &Overlap) -> ClassId {
    let circle = factory.schema().instantiate(o.source_circle).unwrap();
    circle.set("name", "wheel").unwrap();
    circle.set("radius", 4).unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(circle), &Type::Object(o.shape)))
    .to_object()
    .unwrap();
    assert_eq!(mapped.get("radius").unwrap(), Value::I32(4));
    mapped.class_id()
}

#[test]
fn more_specific_pair_wins_in_either_registration_order() {
    let o = overlap();
    let general = (o.source_shape, o.circle);
    let specific = (o.source_circle, o.fancy_circle);

    for pairs in [[general, specific], [specific, general]] {
        let factory = factory_with(&o.schema, &pairs);
        assert_eq!(map_circle_to_shape(&factory, &o), o.fancy_circle);
    }
}

#[test]
fn first_registered_wins_between_unrelated_pairs() {
    let o = overlap();
    let to_circle = (o.source_circle, o.circle);
    let to_fancy = (o.source_circle, o.fancy_circle);
    let to_square = (o.source_circle, o.square);

    let factory = factory_with(&o.schema, &[to_square, to_circle]);
    let square = factory.schema().instantiate(o.source_circle).unwrap();
    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(square), &Type::Object(o.shape)))
    .to_object()
    .unwrap();
    assert_eq!(mapped.class_id(), o.square);

    let factory = factory_with(&o.schema, &[to_circle, to_square]);
    assert_eq!(map_circle_to_shape(&factory, &o), o.circle);

    // a pair refining the destination only still dominates
    let factory = factory_with(&o.schema, &[to_circle, to_fancy]);
    assert_eq!(map_circle_to_shape(&factory, &o), o.fancy_circle);
}
