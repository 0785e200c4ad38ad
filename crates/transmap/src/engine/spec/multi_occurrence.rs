use crate::{
    engine::{Case, Compiler, Conversion, EntryClass, Multi, Shape, Specification},
    Result,
};
use transmap_core::{bail, Schema, Type};

/// Converts between lists, sets, arrays and maps, element by element.
///
/// A map converts to or from a sequence whose elements are instances of a
/// class with `key` and `value` properties. If any element conversion is
/// skipped, the whole conversion is.
#[derive(Debug)]
pub(super) struct MultiOccurrence;

impl Specification for MultiOccurrence {
    fn name(&self) -> &'static str {
        "MultiOccurrence"
    }

    fn applies(&self, case: &Case<'_>, compiler: &Compiler<'_>) -> bool {
        let schema = compiler.schema();
        match (case.source, case.destination) {
            (Type::Map(..), Type::Map(..)) => true,
            (Type::Map(..), destination) => destination
                .element_type()
                .is_some_and(|element| entry_class(schema, element).is_some()),
            (source, Type::Map(..)) => source
                .element_type()
                .is_some_and(|element| entry_class(schema, element).is_some()),
            (source, destination) => {
                source.element_type().is_some() && destination.element_type().is_some()
            }
        }
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let multi = match (case.source, case.destination) {
            (Type::Map(source_key, source_value), Type::Map(key, value)) => {
                let key = compiler.element(&case.nested(source_key, key))?;
                let value = compiler.element(&case.nested(source_value, value))?;
                if key.is_skip() || value.is_skip() {
                    return Ok(Conversion::Skip);
                }

                Multi::Map {
                    merge: value.is_object(),
                    key,
                    value,
                }
            }
            (Type::Map(source_key, source_value), destination) => {
                let (entry, key_ty, value_ty) = expect_entry(compiler.schema(), destination)?;
                let key = compiler.element(&case.nested(source_key, &key_ty))?;
                let value = compiler.element(&case.nested(source_value, &value_ty))?;
                if key.is_skip() || value.is_skip() {
                    return Ok(Conversion::Skip);
                }

                Multi::MapToSeq {
                    shape: expect_shape(destination)?,
                    entry,
                    key,
                    value,
                }
            }
            (source, Type::Map(key, value)) => {
                let (entry, key_ty, value_ty) = expect_entry(compiler.schema(), source)?;
                let key = compiler.element(&case.nested(&key_ty, key))?;
                let value = compiler.element(&case.nested(&value_ty, value))?;
                if key.is_skip() || value.is_skip() {
                    return Ok(Conversion::Skip);
                }

                Multi::SeqToMap { entry, key, value }
            }
            (source, destination) => {
                let (Some(from), Some(to)) = (source.element_type(), destination.element_type())
                else {
                    bail!("expected lists, sets or arrays on both sides");
                };

                let element = compiler.element(&case.nested(from, to))?;
                if element.is_skip() {
                    return Ok(Conversion::Skip);
                }

                Multi::Seq {
                    shape: expect_shape(destination)?,
                    merge: element.is_object(),
                    element,
                }
            }
        };

        Ok(Conversion::Multi(Box::new(multi)))
    }
}

/// Recognizes a class usable as a map entry: an object type whose class has
/// both a `key` and a `value` property.
fn entry_class(schema: &Schema, ty: &Type) -> Option<(EntryClass, Type, Type)> {
    let class = schema.class(ty.as_class()?)?;
    let key = class.field("key")?;
    let value = class.field("value")?;

    Some((
        EntryClass {
            class: class.id,
            key: key.index,
            value: value.index,
        },
        key.ty.clone(),
        value.ty.clone(),
    ))
}

fn expect_entry(schema: &Schema, sequence: &Type) -> Result<(EntryClass, Type, Type)> {
    match sequence.element_type().and_then(|element| entry_class(schema, element)) {
        Some(entry) => Ok(entry),
        None => bail!(
            "`{}` does not hold entries with `key` and `value` properties",
            schema.type_name(sequence)
        ),
    }
}

fn expect_shape(ty: &Type) -> Result<Shape> {
    match Shape::of(ty) {
        Some(shape) => Ok(shape),
        None => bail!("`{ty:?}` is not multi-occurrence"),
    }
}
