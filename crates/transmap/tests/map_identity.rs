use std_util::{assert_err, assert_ok, assert_same};
use transmap::{
    ClassDef, ClassId, Config, CycleMode, MapperFactory, ObjectRef, Schema, Type, Value,
    DEFAULT_MAX_DEPTH,
};

struct Graph {
    schema: Schema,
    parent: ClassId,
    child: ClassId,
    parent_dto: ClassId,
    child_dto: ClassId,
}

/// `Parent.child` and `Child.parent` on both sides, so instances can form a
/// cycle.
fn graph() -> Graph {
    let parent_id = ClassId::generate();
    let parent_dto_id = ClassId::generate();

    let child = ClassDef::new("Child")
        .field("name", Type::String)
        .field("parent", Type::Object(parent_id));
    let child_dto = ClassDef::new("ChildDto")
        .field("name", Type::String)
        .field("parent", Type::Object(parent_dto_id));
    let parent = ClassDef::with_id(parent_id, "Parent")
        .field("name", Type::String)
        .field("child", Type::Object(child.id));
    let parent_dto = ClassDef::with_id(parent_dto_id, "ParentDto")
        .field("name", Type::String)
        .field("child", Type::Object(child_dto.id));
    let (child_id, child_dto_id) = (child.id, child_dto.id);

    let schema = Schema::builder()
        .class(parent)
        .class(child)
        .class(parent_dto)
        .class(child_dto)
        .build()
        .unwrap();

    Graph {
        schema,
        parent: parent_id,
        child: child_id,
        parent_dto: parent_dto_id,
        child_dto: child_dto_id,
    }
}

fn cycle(schema: &Schema, parent: ClassId, child: ClassId) -> ObjectRef {
    let p = schema.instantiate(parent).unwrap();
    let c = schema.instantiate(child).unwrap();
    p.set("name", "p").unwrap();
    c.set("name", "c").unwrap();
    p.set("child", &c).unwrap();
    c.set("parent", &p).unwrap();
    p
}

#[test]
fn cyclic_graph_keeps_its_shape() {
    let Graph {
        schema,
        parent,
        child,
        parent_dto,
        child_dto,
    } = graph();
    let factory = assert_ok!(MapperFactory::builder(schema).build());

    let source = cycle(factory.schema(), parent, child);
    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(parent_dto)))
    .to_object()
    .unwrap();

    let mapped_child = mapped.get("child").unwrap().to_object().unwrap();
    assert_eq!(mapped_child.class_id(), child_dto);
    assert_eq!(mapped_child.get("name").unwrap(), Value::from("c"));

    let back = mapped_child.get("parent").unwrap().to_object().unwrap();
    assert_same!(back, mapped);
}

#[test]
fn one_context_maps_a_source_once() {
    let Graph {
        schema,
        parent,
        child,
        parent_dto,
        ..
    } = graph();
    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let facade = factory.facade();

    let source = Value::Object(cycle(factory.schema(), parent, child));
    let destination = Type::Object(parent_dto);

    let mut cx = facade.new_context();
    let first = assert_ok!(facade.map_with(&source, &destination, &mut cx));
    let second = assert_ok!(facade.map_with(&source, &destination, &mut cx));
    assert_same!(first.as_object().unwrap(), second.as_object().unwrap());

    // separate calls use separate contexts
    let third = assert_ok!(facade.map(&source, &destination));
    assert!(!third.as_object().unwrap().ptr_eq(first.as_object().unwrap()));
}

#[test]
fn shared_reference_maps_to_one_instance() {
    let item = ClassDef::new("Item").field("name", Type::String);
    let item_dto = ClassDef::new("ItemDto").field("name", Type::String);
    let pair = ClassDef::new("Pair")
        .field("left", Type::Object(item.id))
        .field("right", Type::Object(item.id));
    let pair_dto = ClassDef::new("PairDto")
        .field("left", Type::Object(item_dto.id))
        .field("right", Type::Object(item_dto.id));
    let (item_id, pair_id, pair_dto_id) = (item.id, pair.id, pair_dto.id);

    let schema = Schema::builder()
        .class(item)
        .class(item_dto)
        .class(pair)
        .class(pair_dto)
        .build()
        .unwrap();

    let run = |cycle_mode: CycleMode| {
        let factory = MapperFactory::builder(schema.clone())
            .cycle_mode(cycle_mode)
            .build()
            .unwrap();

        let shared = factory.schema().instantiate(item_id).unwrap();
        let source = factory.schema().instantiate(pair_id).unwrap();
        source.set("left", &shared).unwrap();
        source.set("right", &shared).unwrap();

        let mapped = factory
            .facade()
            .map(&Value::Object(source), &Type::Object(pair_dto_id))
            .unwrap()
            .to_object()
            .unwrap();

        let left = mapped.get("left").unwrap().to_object().unwrap();
        let right = mapped.get("right").unwrap().to_object().unwrap();
        left.ptr_eq(&right)
    };

    assert!(run(CycleMode::Identity));
    assert!(!run(CycleMode::NonCyclic));
}

#[test]
fn non_cyclic_mode_hits_the_depth_guard_on_a_cycle() {
    let Graph {
        schema,
        parent,
        child,
        parent_dto,
        ..
    } = graph();
    let factory = assert_ok!(MapperFactory::builder(schema)
        .cycle_mode(CycleMode::NonCyclic)
        .max_depth(8)
        .build());

    let source = cycle(factory.schema(), parent, child);
    let err = assert_err!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(parent_dto)));

    assert!(err.is_mapping(), "{err}");
    assert!(
        err.to_string().contains("maximum mapping depth of 8 exceeded"),
        "{err}"
    );
}

#[test]
fn non_cyclic_mode_fails_cleanly_at_the_default_depth() {
    let Graph {
        schema,
        parent,
        child,
        parent_dto,
        ..
    } = graph();
    let factory = assert_ok!(MapperFactory::builder(schema)
        .config(Config {
            cycle_mode: CycleMode::NonCyclic,
            ..Config::default()
        })
        .build());
    assert_eq!(factory.config().max_depth, DEFAULT_MAX_DEPTH);

    let source = cycle(factory.schema(), parent, child);
    let err = assert_err!(factory
        .facade()
        .map(&Value::Object(source), &Type::Object(parent_dto)));

    assert!(err.is_mapping(), "{err}");
    assert!(
        err.to_string()
            .contains(&format!("maximum mapping depth of {DEFAULT_MAX_DEPTH} exceeded")),
        "{err}"
    );
}

#[test]
fn non_cyclic_mode_maps_trees() {
    let Graph {
        schema,
        parent,
        child,
        parent_dto,
        ..
    } = graph();
    let factory = assert_ok!(MapperFactory::builder(schema)
        .cycle_mode(CycleMode::NonCyclic)
        .build());

    let p = factory.schema().instantiate(parent).unwrap();
    let c = factory.schema().instantiate(child).unwrap();
    c.set("name", "leaf").unwrap();
    p.set("child", &c).unwrap();

    let mapped = assert_ok!(factory
        .facade()
        .map(&Value::Object(p), &Type::Object(parent_dto)))
    .to_object()
    .unwrap();
    let mapped_child = mapped.get("child").unwrap().to_object().unwrap();
    assert_eq!(mapped_child.get("name").unwrap(), Value::from("leaf"));
    assert_eq!(mapped_child.get("parent").unwrap(), Value::Null);
}
