use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok};
use transmap::{ClassDef, ClassId, MapperFactory, Schema, Type, Value};

struct Points {
    schema: Schema,
    point: ClassId,
    frozen: ClassId,
}

/// `FrozenPoint` can only be populated through its constructor.
fn points() -> Points {
    let point = ClassDef::new("Point")
        .field("x", Type::I32)
        .field("y", Type::I32)
        .field("label", Type::String);
    let frozen = ClassDef::new("FrozenPoint")
        .read_only("x", Type::I32)
        .read_only("y", Type::I32)
        .read_only("label", Type::String)
        .constructor(["x", "y"]);
    let (point_id, frozen_id) = (point.id, frozen.id);

    Points {
        schema: Schema::builder().class(point).class(frozen).build().unwrap(),
        point: point_id,
        frozen: frozen_id,
    }
}

#[test]
fn read_only_fields_are_set_through_the_constructor() {
    let Points {
        schema,
        point,
        frozen,
    } = points();
    let factory = assert_ok!(MapperFactory::builder(schema).build());

    let source = factory.schema().instantiate(point).unwrap();
    source.set("x", 3).unwrap();
    source.set("y", 4).unwrap();
    source.set("label", "corner").unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(frozen)))
    .to_object()
    .unwrap();

    assert_eq!(mapped.get("x").unwrap(), Value::I32(3));
    assert_eq!(mapped.get("y").unwrap(), Value::I32(4));
    // read-only and not a constructor parameter
    assert_eq!(mapped.get("label").unwrap(), Value::Null);

    let plan = assert_ok!(factory.describe_plan(point, frozen));
    assert!(plan.contains("  x -> x via CopyByReference (constructor)\n"), "{plan}");
    assert!(plan.contains("  y -> y via CopyByReference (constructor)\n"), "{plan}");
    assert!(!plan.contains("label -> label"), "{plan}");
}

#[test]
fn existing_instance_keeps_constructor_fields() {
    let Points {
        schema,
        point,
        frozen,
    } = points();
    let factory = assert_ok!(MapperFactory::builder(schema).build());

    let source = factory.schema().instantiate(point).unwrap();
    source.set("x", 3).unwrap();

    let existing = factory.schema().instantiate(frozen).unwrap();
    existing.set("x", 10).unwrap();

    assert_ok!(factory.facade().map_into(&source, &existing));
    assert_eq!(existing.get("x").unwrap(), Value::I32(10));
}

#[test]
fn class_map_overrides_the_constructor() {
    let Points {
        schema,
        point,
        frozen,
    } = points();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(point, frozen)
        .constructor_b(["x", "label"])
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());

    let source = factory.schema().instantiate(point).unwrap();
    source.set("x", 1).unwrap();
    source.set("y", 2).unwrap();
    source.set("label", "origin").unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(frozen)))
    .to_object()
    .unwrap();

    assert_eq!(mapped.get("x").unwrap(), Value::I32(1));
    assert_eq!(mapped.get("label").unwrap(), Value::from("origin"));
}

#[test]
fn unbound_constructor_parameter_is_a_configuration_error() {
    let Points {
        schema,
        point,
        frozen,
    } = points();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(point, frozen)
        .field("x", "x")
        .build()
        .unwrap();
    builder.register_class_map(map);

    let err = assert_err!(builder.build());
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "invalid mapping configuration for Point <-> FrozenPoint: \
         constructor parameter `y` of `FrozenPoint` is not bound by any field map"
    );
}

#[test]
fn unknown_constructor_parameter_is_rejected() {
    let Points {
        schema,
        point,
        frozen,
    } = points();

    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let err = assert_err!(factory
        .class_map(point, frozen)
        .constructor_b(["z"])
        .build());

    assert!(err.is_configuration());
    assert!(
        err.to_string()
            .contains("constructor of `FrozenPoint` names unknown property `z`"),
        "{err}"
    );
}
