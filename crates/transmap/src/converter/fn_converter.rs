use super::Converter;
use crate::{MapperFacade, MappingContext, Result};
use std::{fmt, sync::Arc};
use transmap_core::{Type, Value};

type ConvertFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A converter backed by closures.
///
/// Converts `from -> to` with `forward`, and `to -> from` with `backward`
/// when one is given.
#[derive(Clone)]
pub struct FnConverter {
    from: Type,
    to: Type,
    forward: ConvertFn,
    backward: Option<ConvertFn>,
}

impl FnConverter {
    pub fn new(
        from: impl Into<Type>,
        to: impl Into<Type>,
        forward: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> FnConverter {
        FnConverter {
            from: from.into(),
            to: to.into(),
            forward: Arc::new(forward),
            backward: None,
        }
    }

    pub fn bidirectional(
        from: impl Into<Type>,
        to: impl Into<Type>,
        forward: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
        backward: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> FnConverter {
        FnConverter {
            backward: Some(Arc::new(backward)),
            ..FnConverter::new(from, to, forward)
        }
    }
}

impl Converter for FnConverter {
    fn can_convert(&self, source: &Type, destination: &Type) -> bool {
        (*source == self.from && *destination == self.to)
            || (self.backward.is_some() && *source == self.to && *destination == self.from)
    }

    fn convert(
        &self,
        value: Value,
        destination: &Type,
        _facade: &MapperFacade,
        _cx: &mut MappingContext,
    ) -> Result<Value> {
        match &self.backward {
            Some(backward) if *destination == self.from && *destination != self.to => {
                backward(value)
            }
            _ => (self.forward)(value),
        }
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("bidirectional", &self.backward.is_some())
            .finish()
    }
}
