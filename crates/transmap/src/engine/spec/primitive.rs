use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};
use transmap_core::{ty::Primitive, Type};

/// Unboxes a wrapper into a primitive. A null wrapper is never written.
#[derive(Debug)]
pub(super) struct WrapperToPrimitive;

/// Widens, narrows or boxes primitives and wrappers.
#[derive(Debug)]
pub(super) struct PrimitiveToWrapper;

impl Specification for WrapperToPrimitive {
    fn name(&self) -> &'static str {
        "WrapperToPrimitive"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        match (case.source, case.destination) {
            (Type::Wrapper(from), Type::Primitive(to)) => {
                case.converter.is_none() && to.accepts(*from)
            }
            _ => false,
        }
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        emit(case.destination)
    }
}

impl Specification for PrimitiveToWrapper {
    fn name(&self) -> &'static str {
        "PrimitiveToWrapper"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        match (case.source.as_primitive(), case.destination.as_primitive()) {
            (Some(from), Some(to)) => case.converter.is_none() && to.accepts(from),
            _ => false,
        }
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        emit(case.destination)
    }
}

fn emit(destination: &Type) -> Result<Conversion> {
    let to: Primitive = match destination.as_primitive() {
        Some(to) => to,
        None => transmap_core::bail!("`{destination:?}` is not a primitive"),
    };

    Ok(Conversion::Primitive {
        to,
        nullable: destination.is_wrapper(),
    })
}
