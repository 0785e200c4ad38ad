use pretty_assertions::assert_eq;
use std_util::assert_ok;
use transmap::{ClassDef, ClassId, MapperFactory, ObjectRef, Schema, Type, Value};

struct Fixture {
    factory: MapperFactory,
    parallel: ClassId,
    roster: ClassId,
}

/// `Parallel` keeps names and ages in two lists; `Roster` keeps one list
/// of `Person` objects.
fn fixture() -> Fixture {
    let person = ClassDef::new("Person")
        .field("name", Type::String)
        .field("age", Type::I32);
    let parallel = ClassDef::new("Parallel")
        .field("names", Type::list(Type::String))
        .field("ages", Type::list(Type::I32));
    let roster = ClassDef::new("Roster")
        .field("people", Type::list(Type::Object(person.id)))
        .field("first", Type::String);
    let (parallel_id, roster_id) = (parallel.id, roster.id);

    let schema = Schema::builder()
        .class(person)
        .class(parallel)
        .class(roster)
        .build()
        .unwrap();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(parallel_id, roster_id)
        .field("names{}", "people{name}")
        .field("ages{}", "people{age}")
        .field_a_to_b("names{}", "first")
        .build()
        .unwrap();
    builder.register_class_map(map);

    Fixture {
        factory: builder.build().unwrap(),
        parallel: parallel_id,
        roster: roster_id,
    }
}

fn parallel(f: &Fixture, names: &[&str], ages: &[i32]) -> ObjectRef {
    let object = f.factory.schema().instantiate(f.parallel).unwrap();
    object
        .set("names", names.iter().map(|name| Value::from(*name)).collect::<Vec<_>>())
        .unwrap();
    object
        .set("ages", ages.iter().map(|age| Value::I32(*age)).collect::<Vec<_>>())
        .unwrap();
    object
}

fn people(roster: &ObjectRef) -> Vec<(Value, Value)> {
    roster
        .get("people")
        .unwrap()
        .into_elements()
        .unwrap()
        .into_iter()
        .map(|person| {
            let person = person.to_object().unwrap();
            (person.get("name").unwrap(), person.get("age").unwrap())
        })
        .collect()
}

#[test]
fn parallel_lists_zip_into_objects() {
    let f = fixture();
    let source = parallel(&f, &["ann", "bob"], &[31, 42]);

    let roster = assert_ok!(f
        .factory
        .facade()
        .map(&Value::Object(source), &Type::Object(f.roster)))
    .to_object()
    .unwrap();

    assert_eq!(
        people(&roster),
        [
            (Value::from("ann"), Value::I32(31)),
            (Value::from("bob"), Value::I32(42)),
        ]
    );
}

#[test]
fn shortest_source_bounds_the_iterations() {
    let f = fixture();
    let source = parallel(&f, &["ann", "bob", "cid"], &[31, 42]);

    let roster = assert_ok!(f
        .factory
        .facade()
        .map(&Value::Object(source), &Type::Object(f.roster)))
    .to_object()
    .unwrap();

    assert_eq!(people(&roster).len(), 2);
}

#[test]
fn scalar_destination_takes_the_first_item() {
    let f = fixture();
    let source = parallel(&f, &["ann", "bob"], &[31, 42]);

    let roster = assert_ok!(f
        .factory
        .facade()
        .map(&Value::Object(source), &Type::Object(f.roster)))
    .to_object()
    .unwrap();

    assert_eq!(roster.get("first").unwrap(), Value::from("ann"));
}

#[test]
fn objects_split_back_into_parallel_lists() {
    let f = fixture();
    let source = parallel(&f, &["ann", "bob"], &[31, 42]);
    let facade = f.factory.facade();

    let roster = assert_ok!(facade.map(&Value::Object(source), &Type::Object(f.roster)));
    let back = assert_ok!(facade.map(&roster, &Type::Object(f.parallel)))
        .to_object()
        .unwrap();

    assert_eq!(
        back.get("names").unwrap(),
        Value::List(vec![Value::from("ann"), Value::from("bob")])
    );
    assert_eq!(
        back.get("ages").unwrap(),
        Value::List(vec![Value::I32(31), Value::I32(42)])
    );
}

#[test]
fn null_sources_clear_the_destination() {
    let f = fixture();
    let facade = f.factory.facade();

    let source = f.factory.schema().instantiate(f.parallel).unwrap();
    let existing = f.factory.schema().instantiate(f.roster).unwrap();
    existing.set("people", Vec::<Value>::new()).unwrap();

    assert_ok!(facade.map_into(&source, &existing));
    assert_eq!(existing.get("people").unwrap(), Value::Null);
}

#[test]
fn plan_lists_the_group_once() {
    let f = fixture();
    let plan = assert_ok!(f.factory.describe_plan(f.parallel, f.roster));

    assert!(plan.contains("  each names, ages -> people\n"), "{plan}");
    assert!(plan.contains("  each people -> names, ages\n"), "{plan}");
}
