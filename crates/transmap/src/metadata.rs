//! Declarative mapping metadata: which property of one class pairs with
//! which property of another.

mod class_map;
pub use class_map::ClassMap;

mod class_map_builder;
pub use class_map_builder::{ClassMapBuilder, FieldMapBuilder};

mod field_map;
pub use field_map::{Direction, FieldMap};

mod mapper_key;
pub use mapper_key::MapperKey;

pub(crate) use class_map_builder::default_field_maps;
