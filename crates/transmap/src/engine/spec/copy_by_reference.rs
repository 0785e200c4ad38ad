use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};

/// Stores the source value as is: the destination accepts anything, or both
/// sides have the same immutable type.
#[derive(Debug)]
pub(super) struct CopyByReference;

impl Specification for CopyByReference {
    fn name(&self) -> &'static str {
        "CopyByReference"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.converter.is_none()
            && (case.destination.is_any()
                || (case.source == case.destination && case.source.is_immutable()))
    }

    fn emit(&self, _case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::Copy)
    }
}
