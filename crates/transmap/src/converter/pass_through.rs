use super::Converter;
use crate::{MapperFacade, MappingContext, Result};
use transmap_core::{Type, Value};

/// Copies values of the listed types by reference instead of mapping them.
///
/// Useful for classes that are immutable in practice, so a mapped graph may
/// share them with its source.
#[derive(Debug, Clone)]
pub struct PassThroughConverter {
    types: Vec<Type>,
}

impl PassThroughConverter {
    pub fn new(types: impl IntoIterator<Item = Type>) -> PassThroughConverter {
        PassThroughConverter {
            types: types.into_iter().collect(),
        }
    }
}

impl Converter for PassThroughConverter {
    fn can_convert(&self, source: &Type, destination: &Type) -> bool {
        source == destination && self.types.contains(source)
    }

    fn convert(
        &self,
        value: Value,
        _destination: &Type,
        _facade: &MapperFacade,
        _cx: &mut MappingContext,
    ) -> Result<Value> {
        Ok(value)
    }
}
