use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};

/// Sources of unknown type are converted by the rule matching their
/// run-time type.
#[derive(Debug)]
pub(super) struct Dynamic;

impl Specification for Dynamic {
    fn name(&self) -> &'static str {
        "Dynamic"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.is_any()
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::Dynamic {
            to: case.destination.clone(),
        })
    }
}
