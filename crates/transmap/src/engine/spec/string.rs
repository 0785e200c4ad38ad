use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};
use transmap_core::Type;

/// Parses text into a primitive, or into a class declaring a `from_string`
/// hook.
#[derive(Debug)]
pub(super) struct FromString;

/// Formats any single value as text.
#[derive(Debug)]
pub(super) struct AnyToString;

impl Specification for FromString {
    fn name(&self) -> &'static str {
        "FromString"
    }

    fn applies(&self, case: &Case<'_>, compiler: &Compiler<'_>) -> bool {
        if !case.source.is_string() {
            return false;
        }

        match case.destination {
            Type::Primitive(_) | Type::Wrapper(_) => true,
            Type::Object(id) => compiler
                .schema()
                .class(*id)
                .is_some_and(|class| class.from_string.is_some()),
            _ => false,
        }
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::FromString {
            to: case.destination.clone(),
        })
    }
}

impl Specification for AnyToString {
    fn name(&self) -> &'static str {
        "ToString"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.destination.is_string()
            && !case.source.is_multi_occurrence()
            && !case.source.is_any()
    }

    fn emit(&self, _case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::ToString)
    }
}
