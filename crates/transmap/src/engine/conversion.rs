use crate::converter::Converter;
use std::sync::Arc;
use transmap_core::{
    schema::{ClassId, EnumId},
    ty::Primitive,
    Type, Value, ValueSet,
};

/// How a non-null source value becomes a destination value.
///
/// Chosen once per field pairing by the specification chain and interpreted
/// on every mapping call.
#[derive(Debug, Clone)]
pub(crate) enum Conversion {
    /// Store the value unchanged.
    Copy,

    /// Widen or narrow a primitive. `nullable` is set when the destination
    /// is a wrapper.
    Primitive { to: Primitive, nullable: bool },

    Converter {
        converter: Arc<dyn Converter>,
        to: Type,
    },

    /// Delegate to the registered class map of the pair.
    Mapper { to: ClassId },

    /// Map the object to `to`, synthesizing a class map if needed.
    Object { to: ClassId },

    /// Select the destination constant by name. `table[i]` is the
    /// destination index of source constant `i`; `None` leaves the
    /// destination untouched.
    EnumToEnum {
        table: Arc<[Option<usize>]>,
        to: EnumId,
    },

    StringToEnum { to: EnumId },

    EnumToString,

    Multi(Box<Multi>),

    ToString,

    FromString { to: Type },

    /// Place a single value in a one-element container.
    Wrap { shape: Shape, element: Box<Conversion> },

    /// Take the first element of a container.
    Unwrap { element: Box<Conversion> },

    /// Leave the destination untouched.
    Skip,

    /// Pick a conversion from the run-time type of the value.
    Dynamic { to: Type },
}

/// Conversions between multi-occurrence values.
#[derive(Debug, Clone)]
pub(crate) enum Multi {
    /// List, set or array to list, set or array.
    Seq {
        shape: Shape,
        element: Conversion,

        /// Reuse matching elements of the existing destination
        merge: bool,
    },

    Map {
        key: Conversion,
        value: Conversion,
        merge: bool,
    },

    /// Map entries to instances of an entry class.
    MapToSeq {
        shape: Shape,
        entry: EntryClass,
        key: Conversion,
        value: Conversion,
    },

    /// Instances of an entry class to map entries.
    SeqToMap {
        entry: EntryClass,
        key: Conversion,
        value: Conversion,
    },
}

/// A class with `key` and `value` properties standing in for a map entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryClass {
    pub(crate) class: ClassId,
    pub(crate) key: usize,
    pub(crate) value: usize,
}

/// Kind of container a multi-occurrence destination is built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    List,
    Set,
    Array,
    Map,
}

impl Conversion {
    /// Returns `true` if the conversion maps objects, and so benefits from
    /// the existing destination value.
    pub(crate) fn is_object(&self) -> bool {
        matches!(self, Conversion::Mapper { .. } | Conversion::Object { .. })
    }

    /// Returns `true` if the conversion reads the existing destination
    /// value.
    pub(crate) fn uses_existing(&self) -> bool {
        match self {
            Conversion::Mapper { .. } | Conversion::Object { .. } => true,
            Conversion::Multi(multi) => matches!(
                **multi,
                Multi::Seq { merge: true, .. } | Multi::Map { merge: true, .. }
            ),
            _ => false,
        }
    }

    pub(crate) fn is_skip(&self) -> bool {
        matches!(self, Conversion::Skip)
    }
}

impl Shape {
    pub(crate) fn of(ty: &Type) -> Option<Shape> {
        match ty {
            Type::List(_) => Some(Shape::List),
            Type::Set(_) => Some(Shape::Set),
            Type::Array(_) => Some(Shape::Array),
            Type::Map(..) => Some(Shape::Map),
            _ => None,
        }
    }

    /// Builds a sequence container. Sets keep the first of equal elements.
    pub(crate) fn build(self, items: Vec<Value>) -> Value {
        match self {
            Shape::List => Value::List(items),
            Shape::Set => Value::Set(items.into_iter().collect::<ValueSet>()),
            Shape::Array => Value::Array(items),
            Shape::Map => Value::Map(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (Value::I64(i as i64), item))
                    .collect(),
            ),
        }
    }
}
