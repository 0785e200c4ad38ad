//! Class and enum descriptors: the type information the mapping engine
//! consults instead of run-time reflection.

mod builder;
pub use builder::Builder;

mod class;
pub use class::{Class, ClassDef, ClassId, Field, FieldDef, FromStringFn, ToStringFn};

mod enum_type;
pub use enum_type::{EnumId, EnumType, EnumVariant};

mod verify;

use crate::{err, ObjectRef, Result, Type, Value};
use indexmap::IndexMap;
use std::{cmp::Ordering, sync::Arc};

/// The set of classes and enums known to a mapper factory.
///
/// A schema is immutable once built and is shared read-only by every
/// mapping.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub classes: IndexMap<ClassId, Arc<Class>>,
    pub enums: IndexMap<EnumId, Arc<EnumType>>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn class(&self, id: ClassId) -> Option<&Arc<Class>> {
        self.classes.get(&id)
    }

    /// Get a class by ID, failing with an error naming the ID.
    pub fn expect_class(&self, id: ClassId) -> Result<&Arc<Class>> {
        self.classes
            .get(&id)
            .ok_or_else(|| err!("class {id:?} is not part of the schema"))
    }

    pub fn class_by_name(&self, name: &str) -> Option<&Arc<Class>> {
        self.classes.values().find(|class| class.name == name)
    }

    pub fn enum_type(&self, id: EnumId) -> Option<&Arc<EnumType>> {
        self.enums.get(&id)
    }

    pub fn expect_enum(&self, id: EnumId) -> Result<&Arc<EnumType>> {
        self.enums
            .get(&id)
            .ok_or_else(|| err!("enum {id:?} is not part of the schema"))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.values()
    }

    /// Returns `true` if `sub` is `sup` or one of its descendants.
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        sub == sup
            || self
                .class(sub)
                .map(|class| class.ancestors.contains(&sup))
                .unwrap_or(false)
    }

    /// Returns `true` if a value of type `from` can be stored, unchanged, in
    /// a property of type `to`.
    pub fn is_assignable(&self, to: &Type, from: &Type) -> bool {
        match (to, from) {
            (Type::Any, _) => true,
            (to, from) if to == from => true,
            (Type::Object(to), Type::Object(from)) => self.is_subclass(*from, *to),
            (to, from) if to.is_multi_occurrence() && to.raw() == from.raw() => to
                .type_arguments()
                .into_iter()
                .zip(from.type_arguments())
                .all(|(to, from)| self.is_assignable(to, from)),
            _ => false,
        }
    }

    /// Orders types from most to least specific.
    ///
    /// `a` sorts before `b` when `a` is strictly assignable to `b` (a more
    /// specific class, or a more specific type argument). Unrelated types
    /// compare `Equal`, so a stable sort keeps their original order.
    pub fn compare_specificity(&self, a: &Type, b: &Type) -> Ordering {
        if a == b {
            Ordering::Equal
        } else if self.is_assignable(b, a) {
            Ordering::Less
        } else if self.is_assignable(a, b) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// A readable rendering of a type, using declared class and enum names.
    pub fn type_name(&self, ty: &Type) -> String {
        match ty {
            Type::Primitive(p) => p.name().to_string(),
            Type::Wrapper(p) => format!("Option<{}>", p.name()),
            Type::String => "String".to_string(),
            Type::Enum(id) => self
                .enum_type(*id)
                .map(|def| def.name.clone())
                .unwrap_or_else(|| format!("{id:?}")),
            Type::Object(id) => self.class_name(*id),
            Type::List(item) => format!("List<{}>", self.type_name(item)),
            Type::Set(item) => format!("Set<{}>", self.type_name(item)),
            Type::Array(item) => format!("[{}]", self.type_name(item)),
            Type::Map(key, value) => {
                format!("Map<{}, {}>", self.type_name(key), self.type_name(value))
            }
            Type::Any => "Any".to_string(),
        }
    }

    pub fn class_name(&self, id: ClassId) -> String {
        self.class(id)
            .map(|class| class.name.clone())
            .unwrap_or_else(|| format!("{id:?}"))
    }

    /// Creates an instance of `id` with default field values.
    pub fn instantiate(&self, id: ClassId) -> Result<ObjectRef> {
        let class = self.expect_class(id)?;
        if class.is_abstract {
            return Err(err!("cannot instantiate abstract class `{}`", class.name));
        }
        Ok(ObjectRef::new(class.clone()))
    }

    /// Infers the type of a value.
    ///
    /// Collections take their element type from their first non-null
    /// element; empty collections and `null` infer as `Any`.
    pub fn type_of(&self, value: &Value) -> Type {
        fn first(schema: &Schema, items: &[Value]) -> Type {
            items
                .iter()
                .find(|item| !item.is_null())
                .map(|item| schema.type_of(item))
                .unwrap_or(Type::Any)
        }

        match value {
            Value::Null => Type::Any,
            Value::Bool(_) => Type::BOOL,
            Value::Char(_) => Type::CHAR,
            Value::I8(_) => Type::I8,
            Value::I16(_) => Type::I16,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::F32(_) => Type::F32,
            Value::F64(_) => Type::F64,
            Value::String(_) => Type::String,
            Value::Enum(value) => Type::Enum(value.ty),
            Value::Object(object) => Type::Object(object.class_id()),
            Value::List(items) => Type::list(first(self, items)),
            Value::Array(items) => Type::array(first(self, items)),
            Value::Set(set) => Type::set(first(self, set.as_slice())),
            Value::Map(map) => {
                let key = map
                    .keys()
                    .find(|key| !key.is_null())
                    .map(|key| self.type_of(key))
                    .unwrap_or(Type::Any);
                let value = map
                    .values()
                    .find(|value| !value.is_null())
                    .map(|value| self.type_of(value))
                    .unwrap_or(Type::Any);
                Type::map(key, value)
            }
        }
    }
}
