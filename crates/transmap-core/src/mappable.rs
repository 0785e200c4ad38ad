use crate::{
    schema::{self, ClassDef, ClassId, EnumId, EnumType},
    Error, Result, Schema, Type, Value, ValueMap, ValueSet,
};
use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::Hash,
};

/// A Rust type that can be converted to and from a [`Value`].
///
/// Implemented for scalars, `String`, `Option`, the standard collections
/// and, through `#[derive(Bean)]` / `#[derive(BeanEnum)]`, for user structs
/// and enums.
pub trait Mappable: Sized {
    /// The type descriptor of values produced by [`Mappable::into_value`].
    fn ty() -> Type;

    /// Declares the classes and enums this type refers to.
    fn register(builder: &mut schema::Builder) {
        let _ = builder;
    }

    fn into_value(self, schema: &Schema) -> Result<Value>;

    fn load(value: Value) -> Result<Self>;
}

/// A struct declared with `#[derive(Bean)]`.
pub trait Bean: Mappable {
    fn class_id() -> ClassId;

    fn class_def() -> ClassDef;
}

/// An enum declared with `#[derive(BeanEnum)]`.
pub trait BeanEnum: Mappable {
    fn enum_id() -> EnumId;

    fn enum_type() -> EnumType;
}

macro_rules! impl_mappable_scalar {
    ( $( $t:ty => $ty:expr, $to:ident; )+ ) => {
        $(
            impl Mappable for $t {
                fn ty() -> Type {
                    $ty
                }

                fn into_value(self, _schema: &Schema) -> Result<Value> {
                    Ok(Value::from(self))
                }

                fn load(value: Value) -> Result<Self> {
                    value.$to()
                }
            }
        )+
    };
}

impl_mappable_scalar! {
    bool => Type::BOOL, to_bool;
    char => Type::CHAR, to_char;
    i8 => Type::I8, to_i8;
    i16 => Type::I16, to_i16;
    i32 => Type::I32, to_i32;
    i64 => Type::I64, to_i64;
    f32 => Type::F32, to_f32;
    f64 => Type::F64, to_f64;
    String => Type::String, to_string;
}

impl Mappable for Value {
    fn ty() -> Type {
        Type::Any
    }

    fn into_value(self, _schema: &Schema) -> Result<Value> {
        Ok(self)
    }

    fn load(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// `Option` of a primitive is the nullable wrapper type; `Option` of
/// anything else is the same type, since every other type admits `null`.
impl<T: Mappable> Mappable for Option<T> {
    fn ty() -> Type {
        match T::ty() {
            Type::Primitive(primitive) => Type::Wrapper(primitive),
            ty => ty,
        }
    }

    fn register(builder: &mut schema::Builder) {
        T::register(builder);
    }

    fn into_value(self, schema: &Schema) -> Result<Value> {
        match self {
            Some(value) => value.into_value(schema),
            None => Ok(Value::Null),
        }
    }

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }
}

fn load_elements<T: Mappable>(value: Value, to: &str) -> Result<Vec<T>> {
    match value {
        Value::List(_) | Value::Set(_) | Value::Array(_) => value
            .into_elements()
            .unwrap_or_default()
            .into_iter()
            .map(T::load)
            .collect(),
        other => Err(Error::type_conversion(other, to)),
    }
}

fn load_entries<K: Mappable, V: Mappable>(value: Value) -> Result<Vec<(K, V)>> {
    match value {
        Value::Map(map) => map
            .into_iter()
            .map(|(key, value)| Ok((K::load(key)?, V::load(value)?)))
            .collect(),
        other => Err(Error::type_conversion(other, "Map")),
    }
}

impl<T: Mappable> Mappable for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }

    fn register(builder: &mut schema::Builder) {
        T::register(builder);
    }

    fn into_value(self, schema: &Schema) -> Result<Value> {
        let items = self
            .into_iter()
            .map(|item| item.into_value(schema))
            .collect::<Result<_>>()?;
        Ok(Value::List(items))
    }

    fn load(value: Value) -> Result<Self> {
        load_elements(value, "List")
    }
}

impl<T: Mappable> Mappable for Box<[T]> {
    fn ty() -> Type {
        Type::array(T::ty())
    }

    fn register(builder: &mut schema::Builder) {
        T::register(builder);
    }

    fn into_value(self, schema: &Schema) -> Result<Value> {
        let items = self
            .into_vec()
            .into_iter()
            .map(|item| item.into_value(schema))
            .collect::<Result<_>>()?;
        Ok(Value::Array(items))
    }

    fn load(value: Value) -> Result<Self> {
        load_elements(value, "Array").map(Vec::into_boxed_slice)
    }
}

macro_rules! impl_mappable_set {
    ( $( $set:ident < T: $($bound:ident),+ > ),+ ) => {
        $(
            impl<T: Mappable $(+ $bound)+> Mappable for $set<T> {
                fn ty() -> Type {
                    Type::set(T::ty())
                }

                fn register(builder: &mut schema::Builder) {
                    T::register(builder);
                }

                fn into_value(self, schema: &Schema) -> Result<Value> {
                    let items = self
                        .into_iter()
                        .map(|item| item.into_value(schema))
                        .collect::<Result<ValueSet>>()?;
                    Ok(Value::Set(items))
                }

                fn load(value: Value) -> Result<Self> {
                    Ok(load_elements(value, "Set")?.into_iter().collect())
                }
            }
        )+
    };
}

impl_mappable_set!(BTreeSet<T: Ord>, HashSet<T: Eq, Hash>);

macro_rules! impl_mappable_map {
    ( $( $map:ident < K: $($bound:ident),+ > ),+ ) => {
        $(
            impl<K: Mappable $(+ $bound)+, V: Mappable> Mappable for $map<K, V> {
                fn ty() -> Type {
                    Type::map(K::ty(), V::ty())
                }

                fn register(builder: &mut schema::Builder) {
                    K::register(builder);
                    V::register(builder);
                }

                fn into_value(self, schema: &Schema) -> Result<Value> {
                    let entries = self
                        .into_iter()
                        .map(|(key, value)| Ok((key.into_value(schema)?, value.into_value(schema)?)))
                        .collect::<Result<ValueMap>>()?;
                    Ok(Value::Map(entries))
                }

                fn load(value: Value) -> Result<Self> {
                    Ok(load_entries(value)?.into_iter().collect())
                }
            }
        )+
    };
}

impl_mappable_map!(BTreeMap<K: Ord>, HashMap<K: Eq, Hash>, IndexMap<K: Eq, Hash>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_of_primitive_is_a_wrapper() {
        assert_eq!(<Option<i32>>::ty(), Type::Wrapper(crate::Primitive::I32));
        assert_eq!(<Option<String>>::ty(), Type::String);
    }

    #[test]
    fn vec_round_trip() {
        let schema = Schema::default();
        let value = vec![1i32, 2, 3].into_value(&schema).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::I32(1), Value::I32(2), Value::I32(3)])
        );
        assert_eq!(<Vec<i32>>::load(value).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn load_rejects_wrong_shape() {
        let err = <Vec<i32>>::load(Value::I32(1)).unwrap_err();
        assert!(err.is_type_conversion());
    }
}
