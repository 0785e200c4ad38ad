use pretty_assertions::assert_eq;
use std_util::{assert_err, assert_ok, assert_same};
use transmap::{
    err, ClassDef, ClassId, FnConverter, MapperFactory, PassThroughConverter, Schema, Type,
    Value,
};

fn cents() -> FnConverter {
    FnConverter::bidirectional(
        Type::I64,
        Type::String,
        |value| {
            let cents = value.to_i64()?;
            Ok(Value::from(format!("{}.{:02}", cents / 100, cents % 100)))
        },
        |value| {
            let text = value.to_string()?;
            let (units, fraction) = text
                .split_once('.')
                .ok_or_else(|| err!("`{text}` is not an amount"))?;
            let units: i64 = units.parse().map_err(|_| err!("`{text}` is not an amount"))?;
            let fraction: i64 = fraction
                .parse()
                .map_err(|_| err!("`{text}` is not an amount"))?;
            Ok(Value::I64(units * 100 + fraction))
        },
    )
}

struct Prices {
    schema: Schema,
    price: ClassId,
    price_dto: ClassId,
}

fn prices() -> Prices {
    let price = ClassDef::new("Price")
        .field("amount", Type::I64)
        .field("tax", Type::I64);
    let price_dto = ClassDef::new("PriceDto")
        .field("amount", Type::String)
        .field("tax", Type::String);
    let (price_id, price_dto_id) = (price.id, price_dto.id);

    Prices {
        schema: Schema::builder().class(price).class(price_dto).build().unwrap(),
        price: price_id,
        price_dto: price_dto_id,
    }
}

#[test]
fn field_map_names_its_converter() {
    let Prices {
        schema,
        price,
        price_dto,
    } = prices();

    let mut builder = MapperFactory::builder(schema);
    builder.converter_with_id("cents", cents());
    let map = builder
        .class_map(price, price_dto)
        .field_with("amount", "amount", |f| {
            f.converter("cents");
        })
        .by_default()
        .build()
        .unwrap();
    builder.register_class_map(map);
    let factory = assert_ok!(builder.build());
    let facade = factory.facade();

    let source = factory.schema().instantiate(price).unwrap();
    source.set("amount", 1_205_i64).unwrap();
    source.set("tax", 99_i64).unwrap();

    let dto = assert_ok!(facade.map(&Value::Object(source), &Type::Object(price_dto)))
        .to_object()
        .unwrap();
    assert_eq!(dto.get("amount").unwrap(), Value::from("12.05"));
    // id-only converters are never picked by type
    assert_eq!(dto.get("tax").unwrap(), Value::from("99"));

    dto.set("amount", "3.50").unwrap();
    dto.set("tax", "7").unwrap();
    let back = assert_ok!(facade.map(&Value::Object(dto), &Type::Object(price)))
        .to_object()
        .unwrap();
    assert_eq!(back.get("amount").unwrap(), Value::I64(350));
    assert_eq!(back.get("tax").unwrap(), Value::I64(7));

    let plan = assert_ok!(factory.describe_plan(price, price_dto));
    assert!(plan.contains("  amount -> amount via Converter\n"), "{plan}");
    assert!(plan.contains("  tax -> tax via ToString\n"), "{plan}");
}

#[test]
fn unknown_converter_id_fails_at_registration() {
    let Prices {
        schema,
        price,
        price_dto,
    } = prices();

    let mut builder = MapperFactory::builder(schema);
    let map = builder
        .class_map(price, price_dto)
        .field_with("amount", "amount", |f| {
            f.converter("missing");
        })
        .build()
        .unwrap();
    builder.register_class_map(map);

    let err = assert_err!(builder.build());
    assert!(err.is_configuration());
    assert!(
        err.to_string()
            .contains("no converter is registered with id `missing`"),
        "{err}"
    );
}

#[test]
fn converter_failure_fails_the_call() {
    let Prices {
        schema,
        price,
        price_dto,
    } = prices();

    let mut builder = MapperFactory::builder(schema);
    builder.converter(cents());
    let factory = assert_ok!(builder.build());

    let dto = factory.schema().instantiate(price_dto).unwrap();
    dto.set("amount", "twelve").unwrap();

    let err = assert_err!(factory
        .facade()
        .map(&Value::Object(dto), &Type::Object(price)));
    assert!(err.is_mapping());
    assert!(err.to_string().contains("`twelve` is not an amount"), "{err}");
}

#[test]
fn pass_through_shares_instances() {
    let money = ClassDef::new("Money").field("cents", Type::I64);
    let money_id = money.id;
    let order = ClassDef::new("Order").field("total", Type::Object(money_id));
    let order_dto = ClassDef::new("OrderDto").field("total", Type::Object(money_id));
    let (order_id, order_dto_id) = (order.id, order_dto.id);

    let schema = Schema::builder()
        .class(money)
        .class(order)
        .class(order_dto)
        .build()
        .unwrap();

    let copying = assert_ok!(MapperFactory::builder(schema.clone()).build());
    let sharing = assert_ok!(MapperFactory::builder(schema)
        .converter(PassThroughConverter::new([Type::Object(money_id)]))
        .build());

    for (factory, shared) in [(copying, false), (sharing, true)] {
        let total = factory.schema().instantiate(money_id).unwrap();
        total.set("cents", 500_i64).unwrap();
        let source = factory.schema().instantiate(order_id).unwrap();
        source.set("total", &total).unwrap();

        let mapped = assert_ok!(factory
            .facade()
            .map(&Value::Object(source), &Type::Object(order_dto_id)))
        .to_object()
        .unwrap();
        let mapped_total = mapped.get("total").unwrap().to_object().unwrap();

        assert_eq!(mapped_total.get("cents").unwrap(), Value::I64(500));
        if shared {
            assert_same!(mapped_total, total);
        } else {
            assert!(!mapped_total.ptr_eq(&total));
        }
    }
}

#[test]
fn facade_converts_single_values() {
    let Prices { schema, .. } = prices();

    let mut builder = MapperFactory::builder(schema);
    builder.converter_with_id("cents", cents());
    builder.converter(FnConverter::new(Type::I32, Type::String, |value| {
        Ok(Value::from(format!("#{}", value.to_i32()?)))
    }));
    let factory = assert_ok!(builder.build());
    let facade = factory.facade();

    let text = assert_ok!(facade.convert(&Value::I64(250), &Type::String, Some("cents")));
    assert_eq!(text, Value::from("2.50"));

    let back = assert_ok!(facade.convert(&Value::from("2.50"), &Type::I64, Some("cents")));
    assert_eq!(back, Value::I64(250));

    let tagged = assert_ok!(facade.convert(&Value::I32(4), &Type::String, None));
    assert_eq!(tagged, Value::from("#4"));

    assert_eq!(
        assert_ok!(facade.convert(&Value::Null, &Type::String, None)),
        Value::Null
    );

    let err = assert_err!(facade.convert(&Value::I32(4), &Type::String, Some("nope")));
    assert!(err.to_string().contains("no converter is registered with id `nope`"));

    let err = assert_err!(facade.convert(&Value::I64(4), &Type::String, None));
    assert!(
        err.to_string().contains("no converter converts `i64` to `String`"),
        "{err}"
    );
}
