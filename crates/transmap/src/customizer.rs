use crate::{MapperFacade, MappingContext, Result};
use std::fmt;
use transmap_core::ObjectRef;

/// Hand-written adjustments applied after a class map's generated steps.
///
/// `a` and `b` are always the instances of the class map's `a` and `b`
/// types, whichever direction is being mapped.
pub trait Customizer: Send + Sync + fmt::Debug {
    fn customize_a_to_b(
        &self,
        a: &ObjectRef,
        b: &ObjectRef,
        facade: &MapperFacade,
        cx: &mut MappingContext,
    ) -> Result<()> {
        let _ = (a, b, facade, cx);
        Ok(())
    }

    fn customize_b_to_a(
        &self,
        b: &ObjectRef,
        a: &ObjectRef,
        facade: &MapperFacade,
        cx: &mut MappingContext,
    ) -> Result<()> {
        let _ = (b, a, facade, cx);
        Ok(())
    }
}
