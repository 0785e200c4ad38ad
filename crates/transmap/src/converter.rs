mod fn_converter;
pub use fn_converter::FnConverter;

mod pass_through;
pub use pass_through::PassThroughConverter;

mod registry;
pub use registry::ConverterRegistry;

use crate::{MapperFacade, MappingContext, Result};
use std::fmt;
use transmap_core::{Type, Value};

/// Converts values of one type into another, bypassing field mapping.
///
/// Converters take precedence over every built-in rule except plain copies
/// and primitive conversions. A converter bound to a field map by id takes
/// precedence over those too.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Returns `true` if this converter handles `source -> destination`.
    fn can_convert(&self, source: &Type, destination: &Type) -> bool;

    /// Converts a non-null `value` into a value of type `destination`.
    fn convert(
        &self,
        value: Value,
        destination: &Type,
        facade: &MapperFacade,
        cx: &mut MappingContext,
    ) -> Result<Value>;
}
