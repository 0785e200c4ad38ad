use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok};
use transmap::{ClassDef, ClassId, MapperFactory, ObjectRef, Schema, Type, Value};

struct Fixture {
    schema: Schema,
    a: ClassId,
    b: ClassId,
}

fn fixture() -> Fixture {
    let a = ClassDef::new("A")
        .field("id", Type::I32)
        .field("name", Type::String);
    let b = ClassDef::new("B")
        .field("id", Type::I32)
        .field("name", Type::String)
        .field("note", Type::String);
    let (a_id, b_id) = (a.id, b.id);

    Fixture {
        schema: Schema::builder().class(a).class(b).build().unwrap(),
        a: a_id,
        b: b_id,
    }
}

fn instance(schema: &Schema, class: ClassId, fields: &[(&str, Value)]) -> ObjectRef {
    let object = schema.instantiate(class).unwrap();
    for (name, value) in fields {
        object.set(name, value.clone()).unwrap();
    }
    object
}

#[test]
fn same_named_fields_are_copied() {
    let Fixture { schema, a, b } = fixture();
    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let facade = factory.facade();

    let source = instance(
        factory.schema(),
        a,
        &[("id", Value::I32(1)), ("name", Value::from("x"))],
    );

    let mapped = assert_ok!(facade.map(&Value::Object(source), &Type::Object(b)));
    let mapped = mapped.to_object().unwrap();

    assert_eq!(mapped.class_id(), b);
    assert_eq!(mapped.get("id").unwrap(), Value::I32(1));
    assert_eq!(mapped.get("name").unwrap(), Value::from("x"));
    assert_eq!(mapped.get("note").unwrap(), Value::Null);
}

#[test]
fn round_trip_preserves_mapped_fields() {
    let Fixture { schema, a, b } = fixture();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(a, b)
        .field("id", "id")
        .field("name", "name")
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let facade = factory.facade();

    let source = instance(
        factory.schema(),
        a,
        &[("id", Value::I32(7)), ("name", Value::from("seven"))],
    );

    let there = assert_ok!(facade.map(&Value::Object(source.clone()), &Type::Object(b)));
    let back = assert_ok!(facade.map(&there, &Type::Object(a)));
    let back = back.to_object().unwrap();

    assert!(!back.ptr_eq(&source));
    assert_eq!(back.fields(), source.fields());
}

#[test]
fn unregistered_pair_fails_without_auto_mapping() {
    let Fixture { schema, a, b } = fixture();
    let factory = assert_ok!(MapperFactory::builder(schema)
        .use_auto_mapping(false)
        .build());

    let source = instance(factory.schema(), a, &[("id", Value::I32(1))]);

    let err = assert_err!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(b)));
    assert!(err.is_configuration(), "{err}");
    assert!(err.is_mapping(), "{err}");
    assert!(
        err.to_string().contains("auto-mapping is disabled"),
        "{err}"
    );
}

#[test]
fn registered_pair_maps_without_auto_mapping() {
    let Fixture { schema, a, b } = fixture();

    let mut builder = MapperFactory::builder(schema);
    builder.use_auto_mapping(false);
    let map = builder.class_map(a, b).by_default().build().unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());

    let source = instance(factory.schema(), a, &[("name", Value::from("n"))]);
    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(b)));

    assert_eq!(
        mapped.to_object().unwrap().get("name").unwrap(),
        Value::from("n")
    );
}

#[test]
fn null_source_is_a_mapping_error() {
    let Fixture { schema, b, .. } = fixture();
    let factory = assert_ok!(MapperFactory::builder(schema).build());

    let err = assert_err!(factory.facade().map(&Value::Null, &Type::Object(b)));
    assert!(err.is_mapping(), "{err}");
    assert_eq!(err.to_string(), "mapping null -> B failed: source is null");
}

#[test]
fn excluded_field_is_left_alone() {
    let Fixture { schema, a, b } = fixture();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(a, b)
        .exclude("name")
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());

    let source = instance(
        factory.schema(),
        a,
        &[("id", Value::I32(3)), ("name", Value::from("hidden"))],
    );
    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(b)))
    .to_object()
    .unwrap();

    assert_eq!(mapped.get("id").unwrap(), Value::I32(3));
    assert_eq!(mapped.get("name").unwrap(), Value::Null);
}

#[test]
fn one_directional_field_map() {
    let Fixture { schema, a, b } = fixture();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(a, b)
        .field("id", "id")
        .field_a_to_b("name", "note")
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let facade = factory.facade();

    let source = instance(factory.schema(), a, &[("name", Value::from("fwd"))]);
    let mapped = assert_ok!(facade.map(&Value::Object(source), &Type::Object(b)))
        .to_object()
        .unwrap();
    assert_eq!(mapped.get("note").unwrap(), Value::from("fwd"));

    let reverse = instance(factory.schema(), b, &[("note", Value::from("back"))]);
    let back = assert_ok!(facade.map(&Value::Object(reverse), &Type::Object(a)))
        .to_object()
        .unwrap();
    assert_eq!(back.get("name").unwrap(), Value::Null);
}

#[test]
fn nested_paths_flatten() {
    let address = ClassDef::new("Address").field("city", Type::String);
    let person = ClassDef::new("Person")
        .field("name", Type::String)
        .field("address", Type::Object(address.id));
    let flat = ClassDef::new("PersonFlat")
        .field("name", Type::String)
        .field("city", Type::String);
    let (address_id, person_id, flat_id) = (address.id, person.id, flat.id);

    let schema = Schema::builder()
        .class(address)
        .class(person)
        .class(flat)
        .build()
        .unwrap();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(person_id, flat_id)
        .field("address.city", "city")
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let facade = factory.facade();

    let home = instance(factory.schema(), address_id, &[("city", Value::from("Oslo"))]);
    let source = instance(
        factory.schema(),
        person_id,
        &[("name", Value::from("Ada")), ("address", Value::Object(home))],
    );

    let flat = assert_ok!(facade.map(&Value::Object(source), &Type::Object(flat_id)))
        .to_object()
        .unwrap();
    assert_eq!(flat.get("city").unwrap(), Value::from("Oslo"));

    // the reverse direction creates the missing intermediate object
    let back = assert_ok!(facade.map(&Value::Object(flat), &Type::Object(person_id)))
        .to_object()
        .unwrap();
    let address = back.get("address").unwrap().to_object().unwrap();
    assert_eq!(address.class_id(), address_id);
    assert_eq!(address.get("city").unwrap(), Value::from("Oslo"));
}
