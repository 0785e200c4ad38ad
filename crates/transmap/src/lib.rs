//! Object-to-object mapping driven by declarative class maps.
//!
//! A [`MapperFactory`] holds the class maps between pairs of classes of a
//! [`Schema`] and compiles each pair, once, into a plan of field steps. A
//! [`MapperFacade`] runs those plans:
//!
//! ```ignore
//! let factory = MapperFactory::builder(schema).build()?;
//! let dto = factory.facade().map(&order, &Type::Object(order_dto))?;
//! ```

extern crate self as transmap;

mod config;
pub use config::{Config, CycleMode, DEFAULT_MAX_DEPTH};

mod context;
pub use context::MappingContext;

pub mod converter;
pub use converter::{Converter, ConverterRegistry, FnConverter, PassThroughConverter};

mod customizer;
pub use customizer::Customizer;

mod engine;

mod facade;
pub use facade::MapperFacade;

pub mod factory;
pub use factory::{MapperFactory, MapperState};

pub mod metadata;
pub use metadata::{ClassMap, ClassMapBuilder, Direction, FieldMap, FieldMapBuilder, MapperKey};

mod object_factory;
pub use object_factory::ObjectFactory;

pub use transmap_core::{
    bail, err,
    property::{self, Property, PropertyResolver, SchemaPropertyResolver},
    schema::{self, ClassDef, ClassId, EnumId, EnumType, Schema},
    Bean, BeanEnum, Error, Mappable, ObjectRef, Primitive, Type, Value, ValueEnum, ValueMap,
    ValueSet,
};

pub use transmap_macros::{Bean, BeanEnum};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod codegen_support {
    pub use crate::{Error, Result};
    pub use std::{option::Option, sync::OnceLock, vec::Vec};
    pub use transmap_core::{
        schema::{self, ClassDef, ClassId, EnumId, EnumType},
        Bean, BeanEnum, Mappable, ObjectRef, Schema, Type, Value, ValueEnum,
    };
}
