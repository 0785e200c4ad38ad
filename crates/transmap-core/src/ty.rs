mod primitive;
pub use primitive::Primitive;

use crate::schema::{ClassId, EnumId};

/// Describes the type of a property or value.
///
/// Two types are equal iff their raw type and all of their type arguments
/// are equal. Types are cheap to clone and never change once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A non-nullable primitive.
    Primitive(Primitive),

    /// A nullable, boxed primitive.
    Wrapper(Primitive),

    /// Text
    String,

    /// A value of a declared enumeration
    Enum(EnumId),

    /// An instance of a declared class (or of one of its subclasses)
    Object(ClassId),

    /// An ordered, growable sequence
    List(Box<Type>),

    /// An insertion-ordered, deduplicated collection
    Set(Box<Type>),

    /// A fixed-length sequence
    Array(Box<Type>),

    /// An insertion-ordered association of keys to values
    Map(Box<Type>, Box<Type>),

    /// Any value at all.
    Any,
}

/// The type constructor of a [`Type`], with its type arguments erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawType {
    Primitive(Primitive),
    Wrapper(Primitive),
    String,
    Enum(EnumId),
    Object(ClassId),
    List,
    Set,
    Array,
    Map,
    Any,
}

impl Type {
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const CHAR: Type = Type::Primitive(Primitive::Char);
    pub const I8: Type = Type::Primitive(Primitive::I8);
    pub const I16: Type = Type::Primitive(Primitive::I16);
    pub const I32: Type = Type::Primitive(Primitive::I32);
    pub const I64: Type = Type::Primitive(Primitive::I64);
    pub const F32: Type = Type::Primitive(Primitive::F32);
    pub const F64: Type = Type::Primitive(Primitive::F64);

    pub fn list(item: impl Into<Type>) -> Type {
        Type::List(Box::new(item.into()))
    }

    pub fn set(item: impl Into<Type>) -> Type {
        Type::Set(Box::new(item.into()))
    }

    pub fn array(item: impl Into<Type>) -> Type {
        Type::Array(Box::new(item.into()))
    }

    pub fn map(key: impl Into<Type>, value: impl Into<Type>) -> Type {
        Type::Map(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn wrapper(primitive: Primitive) -> Type {
        Type::Wrapper(primitive)
    }

    pub fn raw(&self) -> RawType {
        match self {
            Type::Primitive(p) => RawType::Primitive(*p),
            Type::Wrapper(p) => RawType::Wrapper(*p),
            Type::String => RawType::String,
            Type::Enum(id) => RawType::Enum(*id),
            Type::Object(id) => RawType::Object(*id),
            Type::List(_) => RawType::List,
            Type::Set(_) => RawType::Set,
            Type::Array(_) => RawType::Array,
            Type::Map(..) => RawType::Map,
            Type::Any => RawType::Any,
        }
    }

    /// Returns the type arguments, in declaration order.
    pub fn type_arguments(&self) -> Vec<&Type> {
        match self {
            Type::List(item) | Type::Set(item) | Type::Array(item) => vec![&**item],
            Type::Map(key, value) => vec![&**key, &**value],
            _ => vec![],
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self, Type::Wrapper(_))
    }

    pub fn is_primitive_or_wrapper(&self) -> bool {
        matches!(self, Type::Primitive(_) | Type::Wrapper(_))
    }

    /// Returns the primitive carried by a primitive or wrapper type.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Type::Primitive(p) | Type::Wrapper(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Type::Enum(_))
    }

    pub fn as_enum(&self) -> Option<EnumId> {
        match self {
            Type::Enum(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Type::Object(_))
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            Type::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// `List` or `Set`.
    pub fn is_collection(&self) -> bool {
        matches!(self, Type::List(_) | Type::Set(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Type::Map(..))
    }

    /// Collections, arrays and maps: anything holding more than one value.
    pub fn is_multi_occurrence(&self) -> bool {
        matches!(
            self,
            Type::List(_) | Type::Set(_) | Type::Array(_) | Type::Map(..)
        )
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Immutable values are safe to share between source and destination.
    pub fn is_immutable(&self) -> bool {
        matches!(
            self,
            Type::Primitive(_) | Type::Wrapper(_) | Type::String | Type::Enum(_)
        )
    }

    /// Returns `true` if a property of this type can hold `null`.
    pub fn is_nullable(&self) -> bool {
        !self.is_primitive()
    }

    /// The element type of a list, set or array.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(item) | Type::Set(item) | Type::Array(item) => Some(item),
            _ => None,
        }
    }

    /// The value a freshly instantiated object holds for a field of this
    /// type.
    pub fn default_value(&self) -> crate::Value {
        match self {
            Type::Primitive(p) => p.default_value(),
            _ => crate::Value::Null,
        }
    }
}

impl From<Primitive> for Type {
    fn from(value: Primitive) -> Self {
        Type::Primitive(value)
    }
}

impl From<ClassId> for Type {
    fn from(value: ClassId) -> Self {
        Type::Object(value)
    }
}

impl From<EnumId> for Type {
    fn from(value: EnumId) -> Self {
        Type::Enum(value)
    }
}

impl From<&Type> for Type {
    fn from(value: &Type) -> Self {
        value.clone()
    }
}
