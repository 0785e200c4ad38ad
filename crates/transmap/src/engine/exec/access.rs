use super::{Exec, Frames, Item};
use crate::{engine::Origin, Result};
use transmap_core::{
    bail,
    property::{Access, Segment},
    Property, Type, Value, ValueMap, ValueSet,
};

/// Reads a path starting at a frame.
pub(super) fn read_at(root: &Value, items: &[Item], origin: Origin, segments: &[Segment]) -> Value {
    match origin {
        Origin::Root => read(root, segments),
        Origin::Item(index) => {
            let Some(item) = items.get(index) else {
                return Value::Null;
            };

            match segments.split_first() {
                Some((first, rest)) if first.access == Access::EntryKey => read(&item.key, rest),
                Some((first, rest)) if first.access == Access::EntryValue => read(&item.value, rest),
                _ => read(&item.value, segments),
            }
        }
    }
}

/// Walks `segments` from `value`. A null or missing intermediate value
/// reads as null.
pub(super) fn read(value: &Value, segments: &[Segment]) -> Value {
    let Some((segment, rest)) = segments.split_first() else {
        return value.clone();
    };

    let next = match (&segment.access, value) {
        (Access::Field(index), Value::Object(object)) => object.get_slot(*index).unwrap_or_default(),
        (Access::Index(index), Value::List(items) | Value::Array(items)) => {
            items.get(*index).cloned().unwrap_or_default()
        }
        (Access::Key(key), Value::Map(map)) => map.get(key).cloned().unwrap_or_default(),
        _ => return Value::Null,
    };

    read(&next, rest)
}

/// Splits each container into the items a group iterates.
pub(super) fn items_of(container: Value) -> Vec<Item> {
    match container {
        Value::Map(map) => map
            .into_iter()
            .map(|(key, value)| Item { key, value })
            .collect(),
        other => other
            .into_elements()
            .unwrap_or_default()
            .into_iter()
            .map(|value| Item {
                key: Value::Null,
                value,
            })
            .collect(),
    }
}

impl Frames {
    /// The value a destination path starts at, and the segments left to
    /// walk from it.
    fn target<'s, 'p>(
        &'s mut self,
        origin: Origin,
        segments: &'p [Segment],
    ) -> Result<(&'s mut Value, &'p [Segment])> {
        match origin {
            Origin::Root => Ok((&mut self.destination, segments)),
            Origin::Item(index) => {
                let Some(item) = self.destination_items.get_mut(index) else {
                    bail!("no destination item in slot {index}");
                };

                match segments.split_first() {
                    Some((first, rest)) if first.access == Access::EntryKey => Ok((&mut item.key, rest)),
                    Some((first, rest)) if first.access == Access::EntryValue => {
                        Ok((&mut item.value, rest))
                    }
                    _ => Ok((&mut item.value, segments)),
                }
            }
        }
    }
}

impl Exec<'_> {
    pub(super) fn write_at(
        &mut self,
        frames: &mut Frames,
        origin: Origin,
        property: &Property,
        value: Value,
    ) -> Result<()> {
        let (target, segments) = frames.target(origin, &property.segments)?;
        self.write(target, segments, value)
    }

    /// Assigns `value` at the end of `segments`, creating null
    /// intermediate objects and containers on the way.
    ///
    /// Object fields are read, updated and stored back without holding the
    /// object's lock across the nested write.
    pub(super) fn write(&mut self, target: &mut Value, segments: &[Segment], value: Value) -> Result<()> {
        let Some((segment, rest)) = segments.split_first() else {
            *target = value;
            return Ok(());
        };

        if target.is_null() {
            *target = self.empty(&segment.owner)?;
        }

        match (&segment.access, target) {
            (Access::Field(index), Value::Object(object)) => {
                if *index >= object.slot_count() {
                    bail!(
                        "`{}` has no field in slot {index} for `{}`",
                        object.class_name(),
                        segment.name
                    );
                }

                if rest.is_empty() {
                    object.set_slot(*index, value);
                    return Ok(());
                }

                let mut child = object.slot(*index);
                self.write(&mut child, rest, value)?;
                object.set_slot(*index, child);
                Ok(())
            }
            (Access::Index(index), Value::List(items) | Value::Array(items)) => {
                while items.len() <= *index {
                    items.push(segment.ty.default_value());
                }
                self.write(&mut items[*index], rest, value)
            }
            (Access::Key(key), Value::Map(map)) => self.write(map.entry(key.clone()), rest, value),
            (_, target) => bail!(
                "cannot write `{}` into a {} value",
                segment.name,
                target.kind_name()
            ),
        }
    }

    /// A fresh value to navigate into.
    fn empty(&mut self, ty: &Type) -> Result<Value> {
        Ok(match ty {
            Type::Object(class) => {
                let concrete = self.shared().resolve_concrete(None, *class, self.cx)?;
                Value::Object(self.instantiate(concrete, &Value::Null)?)
            }
            Type::List(_) => Value::List(vec![]),
            Type::Set(_) => Value::Set(ValueSet::new()),
            Type::Array(_) => Value::Array(vec![]),
            Type::Map(..) => Value::Map(ValueMap::new()),
            _ => bail!(
                "cannot create an intermediate `{}` value",
                self.schema().type_name(ty)
            ),
        })
    }
}
