use crate::{
    engine::{Case, Compiler, Conversion, Shape, Specification},
    Result,
};
use transmap_core::bail;

/// A single value stored as the only element of a list, set or array.
#[derive(Debug)]
pub(super) struct WrapSingleton;

/// The first element of a list, set or array stored as a single value.
#[derive(Debug)]
pub(super) struct UnwrapSingleton;

impl Specification for WrapSingleton {
    fn name(&self) -> &'static str {
        "WrapSingleton"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        !case.source.is_multi_occurrence()
            && !case.source.is_any()
            && case.destination.element_type().is_some()
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let (Some(element), Some(shape)) = (
            case.destination.element_type(),
            Shape::of(case.destination),
        ) else {
            bail!("expected a list, set or array destination");
        };

        let element = compiler.element(&case.nested(case.source, element))?;
        if element.is_skip() {
            return Ok(Conversion::Skip);
        }

        Ok(Conversion::Wrap {
            shape,
            element: Box::new(element),
        })
    }
}

impl Specification for UnwrapSingleton {
    fn name(&self) -> &'static str {
        "UnwrapSingleton"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.element_type().is_some() && !case.destination.is_multi_occurrence()
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let Some(element) = case.source.element_type() else {
            bail!("expected a list, set or array source");
        };

        let element = compiler.element(&case.nested(element, case.destination))?;
        if element.is_skip() {
            return Ok(Conversion::Skip);
        }

        Ok(Conversion::Unwrap {
            element: Box::new(element),
        })
    }
}
