mod error;
pub use error::{Error, IntoError};

mod mappable;
pub use mappable::{Bean, BeanEnum, Mappable};

pub mod property;
pub use property::Property;

pub mod schema;
pub use schema::Schema;

pub mod ty;
pub use ty::{Primitive, RawType, Type};

pub mod value;
pub use value::{ObjectRef, Value, ValueEnum, ValueMap, ValueSet};

/// A Result type alias that uses transmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
