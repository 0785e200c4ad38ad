use crate::{MapperFacade, MappingContext, Result};
use std::{fmt, sync::Arc};
use transmap_core::{schema::Class, ObjectRef, Value};

/// Creates destination instances of a class, in place of the default
/// constructor.
pub trait ObjectFactory: Send + Sync + fmt::Debug {
    /// `source` is the value being mapped into the new instance.
    fn create(
        &self,
        class: &Arc<Class>,
        source: &Value,
        facade: &MapperFacade,
        cx: &mut MappingContext,
    ) -> Result<ObjectRef>;
}
