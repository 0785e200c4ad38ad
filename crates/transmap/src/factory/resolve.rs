use super::{registry::most_specific, MapperState, Shared, Slot};
use crate::{
    engine::{compile_class_map, CompiledMapper, Describe},
    metadata::{default_field_maps, ClassMap, MapperKey},
    MappingContext, Result,
};
use std::sync::Arc;
use tracing::debug;
use transmap_core::{err, schema::ClassId, Error};

impl Shared {
    /// The compiled mapper for a class pair, in either orientation.
    ///
    /// Built at most once: concurrent first callers serialize on the pair's
    /// slot, later callers read the published mapper without locking.
    pub(crate) fn unit(&self, a: ClassId, b: ClassId) -> Result<Arc<CompiledMapper>> {
        if !self.config.use_auto_mapping && self.registry.read().declared(a, b).is_none() {
            let parent = self
                .registry
                .read()
                .most_specific_parent(&self.schema, a, b);

            return match parent {
                Some(parent) => self.unit(parent.a, parent.b),
                None => Err(Error::configuration(
                    self.schema.class_name(a),
                    self.schema.class_name(b),
                    "no class map is registered and auto-mapping is disabled",
                )),
            };
        }

        let slot = self.slot(a, b);

        if let Some(unit) = slot.ready() {
            return Ok(unit.clone());
        }

        let _guard = slot.lock();

        if let Some(unit) = slot.ready() {
            return Ok(unit.clone());
        }

        match self.compile(&slot, a, b) {
            Ok(unit) => Ok(slot.publish(Arc::new(unit))),
            Err(err) => {
                slot.reset();
                Err(err)
            }
        }
    }

    fn compile(&self, slot: &Slot, a: ClassId, b: ClassId) -> Result<CompiledMapper> {
        let map = self.bind(a, b)?;
        slot.advance(MapperState::ClassMapBound);

        let unit = compile_class_map(self, &map)?;
        slot.advance(MapperState::PlanCompiled);

        if self.config.dump_plans {
            let plan = Describe {
                schema: &self.schema,
                unit: &unit,
            };
            debug!(%plan, "compiled plan");
        }

        Ok(unit)
    }

    /// The class map of a pair, as declared, synthesizing one by property
    /// name if none is registered.
    pub(crate) fn bind(&self, a: ClassId, b: ClassId) -> Result<Arc<ClassMap>> {
        if let Some(map) = self.registry.read().declared(a, b) {
            return Ok(map);
        }

        let map = self.synthesize(a, b)?;

        let mut registry = self.registry.write();
        if let Some(map) = registry.declared(a, b) {
            return Ok(map);
        }
        registry.insert(map)
    }

    fn synthesize(&self, a: ClassId, b: ClassId) -> Result<ClassMap> {
        let a_name = self.schema.class_name(a);
        let b_name = self.schema.class_name(b);

        let used: Vec<MapperKey> = self
            .registry
            .read()
            .most_specific_parent(&self.schema, a, b)
            .into_iter()
            .collect();

        let field_maps = default_field_maps(&self.schema, &*self.resolver, a, b, &[], &used)
            .map_err(|err| {
                err.context(Error::configuration(
                    &a_name,
                    &b_name,
                    "cannot derive default field maps",
                ))
            })?;

        debug!(
            a = %a_name,
            b = %b_name,
            fields = field_maps.len(),
            uses = used.len(),
            "synthesized default class map"
        );

        Ok(ClassMap {
            a,
            b,
            a_name,
            b_name,
            field_maps,
            customizer: None,
            used,
            constructor_a: None,
            constructor_b: None,
            identity: vec![],
            configured_by_user: false,
        })
    }

    /// The class to instantiate for a `requested` destination.
    ///
    /// In order of preference: a class registered on the context for the
    /// source class, `requested` itself when it is concrete, the destination
    /// of the most specific user class map from a supertype of the source
    /// to a subtype of `requested`, and the factory's concrete-type hint.
    pub(crate) fn resolve_concrete(
        &self,
        source: Option<ClassId>,
        requested: ClassId,
        cx: &MappingContext,
    ) -> Result<ClassId> {
        let schema = &self.schema;
        let is_concrete =
            |id: ClassId| schema.class(id).is_some_and(|class| !class.is_abstract);

        if let Some(concrete) = source.and_then(|source| cx.concrete_class(source)) {
            if schema.is_subclass(concrete, requested) && is_concrete(concrete) {
                return Ok(concrete);
            }
        }

        let class = schema.expect_class(requested)?;
        if !class.is_abstract {
            return Ok(requested);
        }

        if let Some(source) = source {
            let registry = self.registry.read();
            let best = most_specific(
                schema,
                registry.oriented_pairs().filter(|candidate| {
                    schema.is_subclass(source, candidate.a)
                        && schema.is_subclass(candidate.b, requested)
                        && is_concrete(candidate.b)
                }),
            );

            if let Some(best) = best {
                return Ok(best.b);
            }
        }

        if let Some(concrete) = self.concrete_types.get(&requested) {
            return Ok(*concrete);
        }

        Err(err!(
            "cannot resolve a concrete class for abstract `{}`",
            class.name
        ))
    }
}
