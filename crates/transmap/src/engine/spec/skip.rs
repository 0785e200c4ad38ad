use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};

/// A primitive paired with an object nothing converts: the pairing is
/// dropped instead of failing.
#[derive(Debug)]
pub(super) struct PrimitiveObjectMismatch;

impl Specification for PrimitiveObjectMismatch {
    fn name(&self) -> &'static str {
        "PrimitiveObjectMismatch"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        (case.source.is_primitive_or_wrapper() && case.destination.is_object())
            || (case.source.is_object() && case.destination.is_primitive_or_wrapper())
    }

    fn emit(&self, _case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::Skip)
    }
}
