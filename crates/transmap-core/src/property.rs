mod parse;

mod resolve;
pub use resolve::{PropertyResolver, SchemaPropertyResolver};

use crate::{Type, Value};
use std::fmt;

/// A navigable path from an owning value to a field, element or entry.
///
/// A property is a sequence of [`Segment`]s walked from the owner. When the
/// expression ends in an element selector (`orders{total}`), the segments
/// lead to the multi-occurrence container and `element` describes what is
/// read from each of its items.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The expression the property was resolved from, e.g. `address.city`.
    pub expression: String,

    /// Name of the last segment
    pub name: String,

    /// Type of the value the property denotes. For element properties this
    /// is the type read from each item.
    pub ty: Type,

    /// Type the first segment is read from
    pub owner: Type,

    /// Steps from the owner to the value (or to the container)
    pub segments: Vec<Segment>,

    /// Property of each item of the container, relative to the item.
    pub element: Option<Box<Property>>,
}

/// One step of a property path.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,

    /// Type the segment is read from
    pub owner: Type,

    /// Type the segment yields
    pub ty: Type,

    pub access: Access,

    pub readable: bool,

    pub writable: bool,
}

/// How a segment reaches its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Object field stored at this slot index.
    Field(usize),

    /// Element of a list or array at this position.
    Index(usize),

    /// Value of a map entry with this key.
    Key(Value),

    /// Key of the map entry being iterated.
    EntryKey,

    /// Value of the map entry being iterated.
    EntryValue,
}

impl Property {
    /// The property denoting its owner itself, with no segments.
    pub fn identity(ty: Type) -> Property {
        Property {
            expression: String::new(),
            name: String::new(),
            ty: ty.clone(),
            owner: ty,
            segments: vec![],
            element: None,
        }
    }

    /// Returns `true` if every segment of the property can be read.
    pub fn is_readable(&self) -> bool {
        self.segments.iter().all(|segment| segment.readable)
            && self.element.as_ref().map_or(true, |e| e.is_readable())
    }

    /// Returns `true` if the property can be the target of an assignment.
    ///
    /// Only the last segment must be writable; intermediate objects that
    /// are already present are navigated, not assigned.
    pub fn is_writable(&self) -> bool {
        let container = self.segments.last().map_or(false, |segment| segment.writable);
        match &self.element {
            Some(element) => container && (element.is_identity() || element.is_writable()),
            None => container,
        }
    }

    /// Returns `true` if the property navigates through intermediate
    /// values, which must be null-guarded on read.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// Returns `true` for `container{...}` properties.
    pub fn is_element(&self) -> bool {
        self.element.is_some()
    }

    pub fn is_identity(&self) -> bool {
        self.segments.is_empty() && self.element.is_none()
    }

    /// The type the segments lead to: the container for element
    /// properties, otherwise [`Property::ty`].
    pub fn container_type(&self) -> &Type {
        self.segments.last().map_or(&self.owner, |segment| &segment.ty)
    }

    /// The property without its element selector.
    pub fn container(&self) -> Property {
        Property {
            expression: self.container_expression(),
            name: self.name.clone(),
            ty: self.container_type().clone(),
            owner: self.owner.clone(),
            segments: self.segments.clone(),
            element: None,
        }
    }

    /// The segments rendered back as an expression, without the element
    /// selector.
    pub fn container_expression(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match &segment.access {
                Access::Index(_) | Access::Key(_) => {}
                _ if out.is_empty() => {}
                _ => out.push('.'),
            }
            out.push_str(&segment.name);
        }
        out
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expression.is_empty() {
            f.write_str("<self>")
        } else {
            f.write_str(&self.expression)
        }
    }
}
