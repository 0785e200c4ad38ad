use pretty_assertions::assert_eq;
use std_util::assert_ok;
use transmap::{
    ClassDef, ClassId, FnConverter, MapperFactory, Primitive, Schema, Type, Value,
};

struct Fixture {
    schema: Schema,
    source: ClassId,
    target: ClassId,
}

fn fixture() -> Fixture {
    let source = ClassDef::new("Source")
        .field("id", Type::I32)
        .field("count", Type::wrapper(Primitive::I32))
        .field("total", Type::I64)
        .field("amount", Type::I64)
        .field("code", Type::I32);
    let target = ClassDef::new("Target")
        .field("id", Type::I32)
        .field("count", Type::I32)
        .field("total", Type::wrapper(Primitive::I64))
        .field("amount", Type::String)
        .field("code", Type::String);
    let (source_id, target_id) = (source.id, target.id);

    Fixture {
        schema: Schema::builder().class(source).class(target).build().unwrap(),
        source: source_id,
        target: target_id,
    }
}

fn dollars() -> FnConverter {
    FnConverter::new(Type::I64, Type::String, |value| {
        Ok(Value::from(format!("${}", value.to_i64()?)))
    })
}

#[test]
fn plan_lists_the_first_rule_that_applies() {
    let Fixture {
        schema,
        source,
        target,
    } = fixture();

    let factory = assert_ok!(MapperFactory::builder(schema).converter(dollars()).build());
    let plan = assert_ok!(factory.describe_plan(source, target));

    assert_eq!(
        plan,
        "Source -> Target\n\
         \x20 id -> id via CopyByReference\n\
         \x20 count -> count via WrapperToPrimitive\n\
         \x20 total -> total via PrimitiveToWrapper\n\
         \x20 amount -> amount via Converter\n\
         \x20 code -> code via ToString\n\
         Target -> Source\n\
         \x20 id -> id via CopyByReference\n\
         \x20 count -> count via PrimitiveToWrapper\n\
         \x20 total -> total via WrapperToPrimitive\n\
         \x20 amount -> amount via FromString\n\
         \x20 code -> code via FromString\n\
         used converters: 1\n\
         used types: i32, Option<i32>, i64, Option<i64>, String\n"
    );
}

#[test]
fn without_a_converter_numbers_are_formatted() {
    let Fixture {
        schema,
        source,
        target,
    } = fixture();

    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let plan = assert_ok!(factory.describe_plan(source, target));
    assert!(plan.contains("  amount -> amount via ToString\n"), "{plan}");
}

#[test]
fn each_rule_converts_as_listed() {
    let Fixture {
        schema,
        source,
        target,
    } = fixture();

    let factory = assert_ok!(MapperFactory::builder(schema).converter(dollars()).build());
    let facade = factory.facade();

    let object = factory.schema().instantiate(source).unwrap();
    object.set("id", 7).unwrap();
    object.set("count", 3).unwrap();
    object.set("total", 40_i64).unwrap();
    object.set("amount", 125_i64).unwrap();
    object.set("code", 42).unwrap();

    let mapped = assert_ok!(facade.map(&Value::Object(object), &Type::Object(target)))
        .to_object()
        .unwrap();
    assert_eq!(mapped.get("id").unwrap(), Value::I32(7));
    assert_eq!(mapped.get("count").unwrap(), Value::I32(3));
    assert_eq!(mapped.get("total").unwrap(), Value::I64(40));
    assert_eq!(mapped.get("amount").unwrap(), Value::from("$125"));
    assert_eq!(mapped.get("code").unwrap(), Value::from("42"));

    mapped.set("code", "17").unwrap();
    mapped.set("amount", "9").unwrap();
    let back = assert_ok!(facade.map(&Value::Object(mapped), &Type::Object(source)))
        .to_object()
        .unwrap();
    assert_eq!(back.get("code").unwrap(), Value::I32(17));
    assert_eq!(back.get("amount").unwrap(), Value::I64(9));
}

#[test]
fn null_wrapper_leaves_primitive_untouched() {
    let Fixture {
        schema,
        source,
        target,
    } = fixture();

    let factory = assert_ok!(MapperFactory::builder(schema).build());
    let facade = factory.facade();

    let object = factory.schema().instantiate(source).unwrap();
    object.set("count", Value::Null).unwrap();

    let existing = factory.schema().instantiate(target).unwrap();
    existing.set("count", 5).unwrap();

    assert_ok!(facade.map_into(&object, &existing));
    assert_eq!(existing.get("count").unwrap(), Value::I32(5));
}
