use crate::{engine::Exec, factory::Shared, MappingContext, Result};
use std::sync::Arc;
use transmap_core::{
    err, Error, Mappable, ObjectRef, Schema, Type, Value, ValueSet,
};

/// Runs mappings with the class maps and converters of a
/// [`MapperFactory`](crate::MapperFactory).
///
/// Each top-level call uses its own [`MappingContext`], so a facade can be
/// shared freely between threads. The `_with` variants thread a caller-owned
/// context through the call instead, which keeps object identity across
/// several calls.
#[derive(Debug, Clone)]
pub struct MapperFacade {
    shared: Arc<Shared>,
}

impl MapperFacade {
    pub(crate) fn new(shared: Arc<Shared>) -> MapperFacade {
        MapperFacade { shared }
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    /// A context configured like the ones top-level calls use.
    pub fn new_context(&self) -> MappingContext {
        MappingContext::new(self.shared.config.cycle_mode, self.shared.config.max_depth)
    }

    /// Maps `source` to a new value of type `destination`.
    pub fn map(&self, source: &Value, destination: &Type) -> Result<Value> {
        self.with_context(|cx| self.map_with(source, destination, cx))
    }

    pub fn map_with(
        &self,
        source: &Value,
        destination: &Type,
        cx: &mut MappingContext,
    ) -> Result<Value> {
        let schema = &self.shared.schema;

        if source.is_null() {
            return Err(err!("source is null")
                .context(Error::mapping("null", schema.type_name(destination))));
        }

        let mut exec = Exec::new(self, cx);

        match (source, destination) {
            (Value::Object(object), Type::Object(class)) => {
                Ok(Value::Object(exec.map_object(object, *class, None)?))
            }
            _ => {
                let converted = match exec.resolve_dynamic(source, destination)? {
                    Some(conversion) => exec.convert(&conversion, source.clone(), None)?,
                    None => None,
                };

                converted.ok_or_else(|| {
                    err!("no rule converts this value").context(Error::mapping(
                        schema.type_name(&schema.type_of(source)),
                        schema.type_name(destination),
                    ))
                })
            }
        }
    }

    /// Maps `source` into the existing `destination` instance.
    pub fn map_into(&self, source: &ObjectRef, destination: &ObjectRef) -> Result<()> {
        self.with_context(|cx| self.map_into_with(source, destination, cx))
    }

    pub fn map_into_with(
        &self,
        source: &ObjectRef,
        destination: &ObjectRef,
        cx: &mut MappingContext,
    ) -> Result<()> {
        Exec::new(self, cx).map_object(source, destination.class_id(), Some(destination))?;
        Ok(())
    }

    /// Maps every element of `sources`, in order, sharing one context. Null
    /// elements map to null.
    pub fn map_as_list(&self, sources: &[Value], element: &Type) -> Result<Vec<Value>> {
        self.with_context(|cx| self.map_elements(sources, element, cx))
    }

    /// Like [`MapperFacade::map_as_list`], dropping duplicate results.
    pub fn map_as_set(&self, sources: &[Value], element: &Type) -> Result<ValueSet> {
        Ok(self.map_as_list(sources, element)?.into_iter().collect())
    }

    pub fn map_as_array(&self, sources: &[Value], element: &Type) -> Result<Box<[Value]>> {
        Ok(self.map_as_list(sources, element)?.into_boxed_slice())
    }

    /// Converts `source` with a registered converter: the one registered
    /// under `converter`, or else the first accepting the value's type.
    pub fn convert(&self, source: &Value, destination: &Type, converter: Option<&str>) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }

        let schema = &self.shared.schema;
        let converters = &self.shared.converters;

        let found = match converter {
            Some(id) => converters
                .get(id)
                .ok_or_else(|| err!("no converter is registered with id `{id}`"))?,
            None => {
                let source_ty = schema.type_of(source);
                converters.find(&source_ty, destination).ok_or_else(|| {
                    err!(
                        "no converter converts `{}` to `{}`",
                        schema.type_name(&source_ty),
                        schema.type_name(destination)
                    )
                })?
            }
        };

        self.with_context(|cx| found.convert(source.clone(), destination, self, cx))
    }

    /// Maps a typed value through its [`Mappable`] representation.
    pub fn map_typed<A: Mappable, B: Mappable>(&self, source: A) -> Result<B> {
        let value = source.into_value(&self.shared.schema)?;
        B::load(self.map(&value, &B::ty())?)
    }

    fn map_elements(
        &self,
        sources: &[Value],
        element: &Type,
        cx: &mut MappingContext,
    ) -> Result<Vec<Value>> {
        sources
            .iter()
            .map(|source| match source {
                Value::Null => Ok(Value::Null),
                source => self.map_with(source, element, cx),
            })
            .collect()
    }

    fn with_context<T>(&self, f: impl FnOnce(&mut MappingContext) -> Result<T>) -> Result<T> {
        let mut cx = self.shared.pool.acquire(&self.shared.config);
        let result = f(&mut cx);
        self.shared.pool.release(cx);
        result
    }
}
