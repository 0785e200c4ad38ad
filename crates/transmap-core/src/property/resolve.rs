use super::{
    parse::{self, Literal, PathStep},
    Access, Property, Segment,
};
use crate::{bail, schema::ClassId, Error, Result, Schema, Type, Value};
use std::fmt;

/// Turns property expressions into [`Property`] paths.
///
/// The engine never inspects values to discover their properties; every
/// property it reads or writes comes from a resolver.
pub trait PropertyResolver: Send + Sync + fmt::Debug {
    /// Resolves `expression` against a value of type `owner`.
    fn resolve(&self, schema: &Schema, owner: &Type, expression: &str) -> Result<Property>;

    /// The properties of `class` that take part in mapping by name.
    fn properties(&self, schema: &Schema, class: ClassId) -> Result<Vec<Property>>;
}

/// Resolves properties from the class descriptors of a [`Schema`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaPropertyResolver;

impl PropertyResolver for SchemaPropertyResolver {
    fn resolve(&self, schema: &Schema, owner: &Type, expression: &str) -> Result<Property> {
        let parsed = parse::parse(expression)?;
        let mut property = resolve_steps(schema, owner, &parsed.steps)?;

        if let Some(inner) = parsed.element {
            let element = resolve_element(self, schema, property.container_type(), &inner)?;
            property.ty = element.ty.clone();
            property.element = Some(Box::new(element));
        }

        property.expression = expression.trim().to_string();
        Ok(property)
    }

    fn properties(&self, schema: &Schema, class: ClassId) -> Result<Vec<Property>> {
        let class = schema.expect_class(class)?;
        let owner = Type::Object(class.id);

        Ok(class
            .fields
            .iter()
            .map(|field| Property {
                expression: field.name.clone(),
                name: field.name.clone(),
                ty: field.ty.clone(),
                owner: owner.clone(),
                segments: vec![Segment {
                    name: field.name.clone(),
                    owner: owner.clone(),
                    ty: field.ty.clone(),
                    access: Access::Field(field.index),
                    readable: field.readable,
                    writable: field.writable,
                }],
                element: None,
            })
            .collect())
    }
}

fn resolve_steps(schema: &Schema, owner: &Type, steps: &[PathStep]) -> Result<Property> {
    let mut segments = Vec::with_capacity(steps.len());
    let mut current = owner.clone();

    for step in steps {
        let segment = match step {
            PathStep::Field(name) => field_segment(schema, &current, name)?,
            PathStep::Subscript(literal) => subscript_segment(schema, &current, literal)?,
        };
        current = segment.ty.clone();
        segments.push(segment);
    }

    let name = segments
        .last()
        .map(|segment| segment.name.clone())
        .unwrap_or_default();

    let mut property = Property {
        expression: String::new(),
        name,
        ty: current,
        owner: owner.clone(),
        segments,
        element: None,
    };
    property.expression = property.container_expression();
    Ok(property)
}

fn field_segment(schema: &Schema, owner: &Type, name: &str) -> Result<Segment> {
    let Some(id) = owner.as_class() else {
        bail!(
            "`{}` has no properties; cannot resolve `{name}`",
            schema.type_name(owner)
        );
    };

    let class = schema.expect_class(id)?;
    let Some(field) = class.field(name) else {
        bail!("class `{}` has no property `{name}`", class.name);
    };

    Ok(Segment {
        name: name.to_string(),
        owner: owner.clone(),
        ty: field.ty.clone(),
        access: Access::Field(field.index),
        readable: field.readable,
        writable: field.writable,
    })
}

fn subscript_segment(schema: &Schema, owner: &Type, literal: &Literal) -> Result<Segment> {
    let (access, ty) = match (owner, literal) {
        (Type::List(item) | Type::Array(item), Literal::Integer(index)) => {
            let Ok(index) = usize::try_from(*index) else {
                bail!("negative index `{index}`");
            };
            (Access::Index(index), (**item).clone())
        }
        (Type::Map(key, value), literal) => (Access::Key(key_value(key, literal)?), (**value).clone()),
        (Type::List(_) | Type::Array(_), Literal::Text(key)) => {
            bail!("`{}` is indexed by position, not by `{key:?}`", schema.type_name(owner))
        }
        _ => bail!("`{}` cannot be indexed", schema.type_name(owner)),
    };

    let name = match literal {
        Literal::Integer(n) => format!("[{n}]"),
        Literal::Text(text) => format!("[{text:?}]"),
    };

    Ok(Segment {
        name,
        owner: owner.clone(),
        ty,
        access,
        readable: true,
        writable: true,
    })
}

/// Converts a subscript literal to a key of the map's key type.
fn key_value(key_ty: &Type, literal: &Literal) -> Result<Value> {
    match (key_ty, literal) {
        (Type::String | Type::Any, Literal::Text(text)) => Ok(Value::String(text.clone())),
        (Type::Any, Literal::Integer(n)) => Ok(Value::I64(*n)),
        (ty, literal) => {
            let Some(primitive) = ty.as_primitive() else {
                bail!("map keys of this type cannot be written as literals");
            };
            let text = match literal {
                Literal::Integer(n) => n.to_string(),
                Literal::Text(text) => text.clone(),
            };
            primitive.parse(&text)
        }
    }
}

fn resolve_element(
    resolver: &SchemaPropertyResolver,
    schema: &Schema,
    container: &Type,
    inner: &str,
) -> Result<Property> {
    match container {
        Type::List(item) | Type::Set(item) | Type::Array(item) => {
            if inner.is_empty() {
                Ok(Property::identity((**item).clone()))
            } else {
                resolver.resolve(schema, item, inner)
            }
        }
        Type::Map(key, value) => {
            if inner.is_empty() {
                bail!("element selector on a map must name `key` or `value`");
            }

            let parsed = parse::parse(inner)?;
            let (access, ty) = match parsed.steps.first() {
                Some(PathStep::Field(name)) if name == "key" => (Access::EntryKey, &**key),
                Some(PathStep::Field(name)) if name == "value" => (Access::EntryValue, &**value),
                _ => bail!("element selector on a map must start with `key` or `value`, found `{inner}`"),
            };

            let entry = Segment {
                name: if access == Access::EntryKey { "key" } else { "value" }.to_string(),
                owner: container.clone(),
                ty: ty.clone(),
                access,
                readable: true,
                writable: true,
            };

            let mut property = resolve_steps(schema, ty, &parsed.steps[1..])?;
            property.segments.insert(0, entry);
            property.owner = container.clone();
            if property.segments.len() == 1 {
                property.name = property.segments[0].name.clone();
            }

            if let Some(nested) = parsed.element {
                let element = resolve_element(resolver, schema, property.container_type(), &nested)?;
                property.ty = element.ty.clone();
                property.element = Some(Box::new(element));
            }

            property.expression = inner.to_string();
            Ok(property)
        }
        other => Err(Error::from_args(format_args!(
            "`{}` is not a collection, array or map; `{{{inner}}}` cannot select its elements",
            schema.type_name(other)
        ))),
    }
}
