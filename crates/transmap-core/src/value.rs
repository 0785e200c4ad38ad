mod object;
pub use object::{Object, ObjectRef};

mod value_enum;
pub use value_enum::ValueEnum;

mod value_map;
pub use value_map::ValueMap;

mod value_set;
pub use value_set::ValueSet;

use crate::{Error, Result};

/// A dynamically typed value.
///
/// Scalars and collections are plain values: cloning a `List` copies the
/// list. Objects are the only values with identity; cloning an `Object`
/// clones the handle, not the instance.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// A single character
    Char(char),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 32-bit float
    F32(f32),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Value of an enumerated type
    Enum(ValueEnum),

    /// An ordered, growable sequence
    List(Vec<Value>),

    /// An insertion-ordered collection without duplicates
    Set(ValueSet),

    /// A fixed-length sequence
    Array(Vec<Value>),

    /// An insertion-ordered association of keys to values
    Map(ValueMap),

    /// A handle to an object instance
    Object(ObjectRef),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the shape of this value, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Char(_) => "Char",
            Self::I8(_) => "I8",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::F32(_) => "F32",
            Self::F64(_) => "F64",
            Self::String(_) => "String",
            Self::Enum(_) => "Enum",
            Self::List(_) => "List",
            Self::Set(_) => "Set",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
            Self::Object(_) => "Object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_object(&self) -> &ObjectRef {
        match self {
            Self::Object(object) => object,
            _ => panic!("expected object; actual={self:#?}"),
        }
    }

    pub fn as_enum(&self) -> Option<&ValueEnum> {
        match self {
            Self::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_multi_occurrence(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::Array(_) | Self::Map(_)
        )
    }

    /// The elements of a list, set or array.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Array(items) => Some(items),
            Self::Set(set) => Some(set.as_slice()),
            _ => None,
        }
    }

    /// Consumes a list, set or array, returning its elements.
    pub fn into_elements(self) -> Option<Vec<Value>> {
        match self {
            Self::List(items) | Self::Array(items) => Some(items),
            Self::Set(set) => Some(set.into_vec()),
            _ => None,
        }
    }

    /// Number of elements of a multi-occurrence value.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Map(map) => Some(map.len()),
            other => other.elements().map(<[Value]>::len),
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            other => Err(Error::type_conversion(other, "bool")),
        }
    }

    pub fn to_char(self) -> Result<char> {
        match self {
            Self::Char(v) => Ok(v),
            other => Err(Error::type_conversion(other, "char")),
        }
    }

    pub fn to_i8(self) -> Result<i8> {
        match self {
            Self::I8(v) => Ok(v),
            other => Err(Error::type_conversion(other, "i8")),
        }
    }

    pub fn to_i16(self) -> Result<i16> {
        match self {
            Self::I16(v) => Ok(v),
            other => Err(Error::type_conversion(other, "i16")),
        }
    }

    pub fn to_i32(self) -> Result<i32> {
        match self {
            Self::I32(v) => Ok(v),
            other => Err(Error::type_conversion(other, "i32")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            other => Err(Error::type_conversion(other, "i64")),
        }
    }

    pub fn to_f32(self) -> Result<f32> {
        match self {
            Self::F32(v) => Ok(v),
            other => Err(Error::type_conversion(other, "f32")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Self::F64(v) => Ok(v),
            other => Err(Error::type_conversion(other, "f64")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(Error::type_conversion(other, "String")),
        }
    }

    pub fn to_object(self) -> Result<ObjectRef> {
        match self {
            Self::Object(v) => Ok(v),
            other => Err(Error::type_conversion(other, "Object")),
        }
    }

    pub fn to_enum(self) -> Result<ValueEnum> {
        match self {
            Self::Enum(v) => Ok(v),
            other => Err(Error::type_conversion(other, "Enum")),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

macro_rules! impl_from_scalar {
    ( $( $t:ty => $variant:ident ),+ $(,)? ) => {
        $(
            impl From<$t> for Value {
                fn from(src: $t) -> Self {
                    Self::$variant(src)
                }
            }
        )+
    };
}

impl_from_scalar!(
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    ValueEnum => Enum,
    ValueSet => Set,
    ValueMap => Map,
    ObjectRef => Object,
);

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&ObjectRef> for Value {
    fn from(src: &ObjectRef) -> Self {
        Self::Object(src.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
