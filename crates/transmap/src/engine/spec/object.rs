use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};
use transmap_core::Type;

/// Maps a nested object with the class map of its pair, in place when the
/// destination already holds an instance.
#[derive(Debug)]
pub(super) struct ObjectToObject;

impl Specification for ObjectToObject {
    fn name(&self) -> &'static str {
        "ObjectToObject"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.is_object() && case.destination.is_object()
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        match case.destination {
            Type::Object(to) => Ok(Conversion::Object { to: *to }),
            _ => transmap_core::bail!("object mappings need an object destination"),
        }
    }
}
