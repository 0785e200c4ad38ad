use crate::{Error, Result, Value};
use std::fmt;

/// A primitive scalar type.
///
/// Primitives appear in a [`Type`](crate::Type) either directly (never null,
/// defaulting to zero/`false`) or wrapped (nullable, boxed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Char => "char",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    /// The value a freshly created object holds for a field of this
    /// primitive type.
    pub fn default_value(self) -> Value {
        match self {
            Primitive::Bool => Value::Bool(false),
            Primitive::Char => Value::Char('\0'),
            Primitive::I8 => Value::I8(0),
            Primitive::I16 => Value::I16(0),
            Primitive::I32 => Value::I32(0),
            Primitive::I64 => Value::I64(0),
            Primitive::F32 => Value::F32(0.0),
            Primitive::F64 => Value::F64(0.0),
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Bool | Primitive::Char)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64
        )
    }

    /// Returns the primitive a value carries, if it is a primitive value.
    pub fn of(value: &Value) -> Option<Primitive> {
        Some(match value {
            Value::Bool(_) => Primitive::Bool,
            Value::Char(_) => Primitive::Char,
            Value::I8(_) => Primitive::I8,
            Value::I16(_) => Primitive::I16,
            Value::I32(_) => Primitive::I32,
            Value::I64(_) => Primitive::I64,
            Value::F32(_) => Primitive::F32,
            Value::F64(_) => Primitive::F64,
            _ => return None,
        })
    }

    /// Returns `true` if values of `from` can be narrowed or widened into
    /// `self`.
    ///
    /// Numbers convert among themselves, `char` converts to and from the
    /// integral types, and `bool` only converts to `bool`.
    pub fn accepts(self, from: Primitive) -> bool {
        match (from, self) {
            (a, b) if a == b => true,
            (Primitive::Bool, _) | (_, Primitive::Bool) => false,
            (Primitive::Char, to) => to.is_integral(),
            (from, Primitive::Char) => from.is_integral(),
            _ => true,
        }
    }

    /// Converts a primitive value into this primitive, truncating the way a
    /// numeric `as` cast does.
    pub fn cast(self, value: &Value) -> Result<Value> {
        if let (Value::Bool(v), Primitive::Bool) = (value, self) {
            return Ok(Value::Bool(*v));
        }

        if let Value::F32(_) | Value::F64(_) = value {
            let v = match value {
                Value::F32(v) => *v as f64,
                Value::F64(v) => *v,
                _ => unreachable!(),
            };
            return Ok(match self {
                Primitive::I8 => Value::I8(v as i8),
                Primitive::I16 => Value::I16(v as i16),
                Primitive::I32 => Value::I32(v as i32),
                Primitive::I64 => Value::I64(v as i64),
                Primitive::F32 => Value::F32(v as f32),
                Primitive::F64 => Value::F64(v),
                _ => return Err(Error::type_conversion(value.clone(), self.name())),
            });
        }

        let v: i64 = match value {
            Value::Char(v) => *v as i64,
            Value::I8(v) => *v as i64,
            Value::I16(v) => *v as i64,
            Value::I32(v) => *v as i64,
            Value::I64(v) => *v,
            _ => return Err(Error::type_conversion(value.clone(), self.name())),
        };

        Ok(match self {
            Primitive::I8 => Value::I8(v as i8),
            Primitive::I16 => Value::I16(v as i16),
            Primitive::I32 => Value::I32(v as i32),
            Primitive::I64 => Value::I64(v),
            Primitive::F32 => Value::F32(v as f32),
            Primitive::F64 => Value::F64(v as f64),
            Primitive::Char => match u32::try_from(v).ok().and_then(char::from_u32) {
                Some(c) => Value::Char(c),
                None => return Err(Error::type_conversion(value.clone(), "char")),
            },
            Primitive::Bool => return Err(Error::type_conversion(value.clone(), "bool")),
        })
    }

    /// Parses the textual form of this primitive.
    pub fn parse(self, input: &str) -> Result<Value> {
        let input = input.trim();
        Ok(match self {
            Primitive::Bool => match input {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(Error::type_conversion(Value::from(input), "bool")),
            },
            Primitive::Char => {
                let mut chars = input.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => return Err(Error::type_conversion(Value::from(input), "char")),
                }
            }
            Primitive::I8 => Value::I8(input.parse()?),
            Primitive::I16 => Value::I16(input.parse()?),
            Primitive::I32 => Value::I32(input.parse()?),
            Primitive::I64 => Value::I64(input.parse()?),
            Primitive::F32 => Value::F32(input.parse()?),
            Primitive::F64 => Value::F64(input.parse()?),
        })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
