mod access;

mod convert;

mod equals;

mod group;

mod object;

use super::{FieldStep, Origin};
use crate::{factory::Shared, Config, MapperFacade, MappingContext, Result};
use transmap_core::{Property, Schema, Type, Value, ValueSet};

/// Interprets compiled plans against live values.
///
/// One `Exec` serves one top-level call; nested objects are mapped by
/// re-entering the same `Exec`, so the mapping context is threaded through
/// the whole call tree.
pub(crate) struct Exec<'a> {
    facade: &'a MapperFacade,
    cx: &'a mut MappingContext,
}

/// The values a plan's steps read from and write to.
///
/// `Origin::Root` resolves to the object being mapped. `Origin::Item(i)`
/// resolves to the current item of the i-th container iterated by an
/// enclosing group.
#[derive(Debug)]
struct Frames {
    source: Value,
    destination: Value,
    source_items: Vec<Item>,
    destination_items: Vec<Item>,
}

/// One item of a container being iterated. `key` is only set for map
/// entries.
#[derive(Debug, Default, Clone)]
struct Item {
    key: Value,
    value: Value,
}

impl<'a> Exec<'a> {
    pub(crate) fn new(facade: &'a MapperFacade, cx: &'a mut MappingContext) -> Exec<'a> {
        Exec { facade, cx }
    }

    fn shared(&self) -> &'a Shared {
        self.facade.shared()
    }

    fn schema(&self) -> &'a Schema {
        &self.shared().schema
    }

    fn config(&self) -> &'a Config {
        &self.shared().config
    }

    /// Runs one field step.
    fn field(&mut self, step: &FieldStep, frames: &mut Frames) -> Result<()> {
        let value = frames.read_source(step.source_origin, &step.source);

        if value.is_null() {
            let map_nulls = step.map_nulls.unwrap_or(self.config().map_nulls);
            if map_nulls && step.destination.ty.is_nullable() {
                self.write_at(frames, step.destination_origin, &step.destination, Value::Null)?;
            }
            return Ok(());
        }

        let existing = if step.conversion.uses_existing() && step.destination.is_readable() {
            Some(frames.read_destination(step.destination_origin, &step.destination))
                .filter(|value| !value.is_null())
        } else {
            None
        };

        let Some(value) = self.convert(&step.conversion, value, existing)? else {
            return Ok(());
        };

        if value.is_null() && !step.destination.ty.is_nullable() {
            return Ok(());
        }

        if let Some(inverse) = &step.inverse {
            let owner = frames.owner(step.destination_origin, &step.destination);
            self.link_inverse(&value, inverse, &owner)?;
        }

        self.write_at(frames, step.destination_origin, &step.destination, value)
    }

    /// Points every object in `value` back at `owner` through `inverse`.
    ///
    /// A collection-typed inverse gains `owner` as an element; any other
    /// inverse is overwritten.
    fn link_inverse(&mut self, value: &Value, inverse: &Property, owner: &Value) -> Result<()> {
        if owner.is_null() {
            return Ok(());
        }

        let children: Vec<Value> = match value {
            Value::Object(_) => vec![value.clone()],
            other => other
                .elements()
                .map(|items| items.iter().filter(|item| item.as_object().is_some()).cloned().collect())
                .or_else(|| other.as_map().map(|map| map.values().filter(|v| v.as_object().is_some()).cloned().collect()))
                .unwrap_or_default(),
        };

        for mut child in children {
            let linked = if inverse.ty.is_collection() {
                let current = access::read(&child, &inverse.segments);
                append(current, &inverse.ty, owner.clone())
            } else {
                owner.clone()
            };

            self.write(&mut child, &inverse.segments, linked)?;
        }

        Ok(())
    }
}

/// Adds `item` to a list or set unless it is already present.
fn append(container: Value, ty: &Type, item: Value) -> Value {
    match container {
        Value::List(mut items) => {
            if !items.contains(&item) {
                items.push(item);
            }
            Value::List(items)
        }
        Value::Set(mut items) => {
            items.insert(item);
            Value::Set(items)
        }
        _ => match ty {
            Type::Set(_) => Value::Set(ValueSet::from_iter([item])),
            _ => Value::List(vec![item]),
        },
    }
}

impl Frames {
    fn new(source: Value, destination: Value) -> Frames {
        Frames {
            source,
            destination,
            source_items: vec![],
            destination_items: vec![],
        }
    }

    fn read_source(&self, origin: Origin, property: &Property) -> Value {
        access::read_at(&self.source, &self.source_items, origin, &property.segments)
    }

    fn read_destination(&self, origin: Origin, property: &Property) -> Value {
        access::read_at(
            &self.destination,
            &self.destination_items,
            origin,
            &property.segments,
        )
    }

    /// The value holding the last segment of a destination property.
    fn owner(&self, origin: Origin, property: &Property) -> Value {
        let parent = property.segments.len().saturating_sub(1);
        access::read_at(
            &self.destination,
            &self.destination_items,
            origin,
            &property.segments[..parent],
        )
    }
}
