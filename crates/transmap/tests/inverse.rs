use pretty_assertions::assert_eq;
use std_util::{assert_ok, assert_same};
use transmap::{ClassDef, ClassId, MapperFactory, Schema, Type, Value};

#[test]
fn children_point_back_at_their_mapped_parent() {
    let child = ClassDef::new("Child").field("name", Type::String);
    let parent = ClassDef::new("Parent")
        .field("name", Type::String)
        .field("children", Type::list(Type::Object(child.id)));

    let parent_dto_id = ClassId::generate();
    let child_dto = ClassDef::new("ChildDto")
        .field("name", Type::String)
        .field("parent", Type::Object(parent_dto_id));
    let parent_dto = ClassDef::with_id(parent_dto_id, "ParentDto")
        .field("name", Type::String)
        .field("children", Type::list(Type::Object(child_dto.id)));
    let (child_id, parent_id) = (child.id, parent.id);

    let schema = Schema::builder()
        .class(child)
        .class(parent)
        .class(child_dto)
        .class(parent_dto)
        .build()
        .unwrap();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(parent_id, parent_dto_id)
        .field_with("children", "children", |f| {
            f.b_inverse("parent");
        })
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let schema = factory.schema();

    let source = schema.instantiate(parent_id).unwrap();
    source.set("name", "root").unwrap();
    let kids: Vec<Value> = ["a", "b"]
        .into_iter()
        .map(|name| {
            let kid = schema.instantiate(child_id).unwrap();
            kid.set("name", name).unwrap();
            Value::Object(kid)
        })
        .collect();
    source.set("children", kids).unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(parent_dto_id)))
    .to_object()
    .unwrap();

    let children = mapped.get("children").unwrap().into_elements().unwrap();
    assert_eq!(children.len(), 2);
    for child in children {
        let back = child.to_object().unwrap().get("parent").unwrap().to_object().unwrap();
        assert_same!(back, mapped);
    }
}

#[test]
fn collection_inverse_gains_the_owner() {
    let address = ClassDef::new("Address").field("city", Type::String);
    let person = ClassDef::new("Person")
        .field("name", Type::String)
        .field("address", Type::Object(address.id));

    let person_dto_id = ClassId::generate();
    let address_dto = ClassDef::new("AddressDto")
        .field("city", Type::String)
        .field("residents", Type::list(Type::Object(person_dto_id)));
    let person_dto = ClassDef::with_id(person_dto_id, "PersonDto")
        .field("name", Type::String)
        .field("address", Type::Object(address_dto.id));
    let (address_id, person_id) = (address.id, person.id);

    let schema = Schema::builder()
        .class(address)
        .class(person)
        .class(address_dto)
        .class(person_dto)
        .build()
        .unwrap();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(person_id, person_dto_id)
        .field_with("address", "address", |f| {
            f.b_inverse("residents");
        })
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let schema = factory.schema();

    let home = schema.instantiate(address_id).unwrap();
    home.set("city", "Oslo").unwrap();
    let people: Vec<Value> = ["ann", "bob"]
        .into_iter()
        .map(|name| {
            let person = schema.instantiate(person_id).unwrap();
            person.set("name", name).unwrap();
            person.set("address", &home).unwrap();
            Value::Object(person)
        })
        .collect();

    // one context: both people share the mapped address
    let mapped = assert_ok!(factory
        .facade()
        .map_as_list(&people, &Type::Object(person_dto_id)));

    let ann = mapped[0].as_object().unwrap();
    let bob = mapped[1].as_object().unwrap();
    let address = ann.get("address").unwrap().to_object().unwrap();
    assert_same!(address, bob.get("address").unwrap().to_object().unwrap());

    let residents = address.get("residents").unwrap().into_elements().unwrap();
    assert_eq!(residents.len(), 2);
    assert_same!(residents[0].as_object().unwrap(), ann);
    assert_same!(residents[1].as_object().unwrap(), bob);
}

#[test]
fn inverse_on_a_scalar_property_is_rejected() {
    let a = ClassDef::new("A").field("name", Type::String);
    let b = ClassDef::new("B").field("name", Type::String);
    let (a_id, b_id) = (a.id, b.id);
    let schema = Schema::builder().class(a).class(b).build().unwrap();

    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let err = factory
        .class_map(a_id, b_id)
        .field_with("name", "name", |f| {
            f.b_inverse("owner");
        })
        .build()
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("it cannot have an inverse property"), "{err}");
}
