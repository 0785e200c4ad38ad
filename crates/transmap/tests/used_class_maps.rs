use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok};
use transmap::{ClassDef, ClassId, MapperFactory, Schema, Type, Value};

struct Fixture {
    schema: Schema,
    base: ClassId,
    derived: ClassId,
    base_dto: ClassId,
    derived_dto: ClassId,
}

fn fixture() -> Fixture {
    let base = ClassDef::new("Base").field("id", Type::I64);
    let derived = ClassDef::new("Derived")
        .extends(base.id)
        .field("name", Type::String);
    let base_dto = ClassDef::new("BaseDto").field("key", Type::I64);
    let derived_dto = ClassDef::new("DerivedDto")
        .extends(base_dto.id)
        .field("name", Type::String);

    Fixture {
        base: base.id,
        derived: derived.id,
        base_dto: base_dto.id,
        derived_dto: derived_dto.id,
        schema: Schema::builder()
            .class(base)
            .class(derived)
            .class(base_dto)
            .class(derived_dto)
            .build()
            .unwrap(),
    }
}

#[test]
fn parent_class_map_runs_first() {
    let Fixture {
        schema,
        base,
        derived,
        base_dto,
        derived_dto,
    } = fixture();

    let mut builder = MapperFactory::builder(schema);
    let parent = builder
        .class_map(base, base_dto)
        .field("id", "key")
        .build()
        .unwrap();
    let child = builder
        .class_map(derived, derived_dto)
        .uses(base, base_dto)
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(parent).register_class_map(child);
    let factory = assert_ok!(builder.build());

    let source = factory.schema().instantiate(derived).unwrap();
    source.set("id", Value::I64(7)).unwrap();
    source.set("name", "leaf").unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(derived_dto)))
    .to_object()
    .unwrap();

    assert_eq!(mapped.get("key").unwrap(), Value::I64(7));
    assert_eq!(mapped.get("name").unwrap(), Value::from("leaf"));
}

#[test]
fn unrelated_pair_is_rejected() {
    let Fixture {
        schema,
        base,
        derived,
        base_dto,
        derived_dto,
    } = fixture();

    let builder = MapperFactory::builder(schema);
    let err = assert_err!(builder
        .class_map(base, base_dto)
        .uses(derived, derived_dto)
        .build());

    assert!(err.to_string().contains("not a supertype pair"), "{err}");
}
