mod builder;
pub use builder::Builder;

mod registry;
pub(crate) use registry::ClassMapRegistry;

mod resolve;

mod slot;
pub use slot::MapperState;
use slot::Slot;

use crate::{
    context::ContextPool,
    converter::ConverterRegistry,
    engine::{Chain, Describe},
    metadata::{ClassMap, ClassMapBuilder, MapperKey},
    object_factory::ObjectFactory,
    Config, MapperFacade, MappingContext, Result,
};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use transmap_core::{schema::ClassId, property::PropertyResolver, Error, Schema};

/// State shared by a factory and every facade it hands out.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,

    pub(crate) config: Config,

    pub(crate) converters: ConverterRegistry,

    pub(crate) object_factories: HashMap<ClassId, Arc<dyn ObjectFactory>>,

    /// Concrete class to instantiate for an abstract destination class
    pub(crate) concrete_types: HashMap<ClassId, ClassId>,

    pub(crate) resolver: Arc<dyn PropertyResolver>,

    pub(crate) registry: RwLock<ClassMapRegistry>,

    /// Compiled mappers, keyed by unordered class pair
    slots: RwLock<HashMap<MapperKey, Arc<Slot>>>,

    pub(crate) pool: ContextPool,

    pub(crate) chain: Chain,
}

/// Owns the class maps of a set of classes and compiles them into mappers.
///
/// Class maps are registered through the [`Builder`] or, before a pair is
/// first used, with [`MapperFactory::register_class_map`]. Pairs without a
/// class map are mapped by property name when
/// [`Config::use_auto_mapping`] is set.
///
/// Cloning a factory is cheap; clones share registered class maps and
/// compiled mappers.
#[derive(Debug, Clone)]
pub struct MapperFactory {
    shared: Arc<Shared>,
}

impl MapperFactory {
    pub fn builder(schema: Schema) -> Builder {
        Builder::new(schema)
    }

    pub fn facade(&self) -> MapperFacade {
        MapperFacade::new(self.shared.clone())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Starts a class map for `a <-> b`.
    pub fn class_map(&self, a: ClassId, b: ClassId) -> ClassMapBuilder {
        ClassMapBuilder::new(
            self.shared.schema.clone(),
            self.shared.resolver.clone(),
            a,
            b,
        )
    }

    /// Registers a class map and compiles it immediately, so a broken field
    /// mapping fails here rather than on first use.
    ///
    /// Fails if the pair already has a user class map, or was already used
    /// for mapping.
    pub fn register_class_map(&self, map: ClassMap) -> Result<()> {
        self.shared.register(map)
    }

    /// The class map for `a -> b`, if one was registered or synthesized.
    pub fn lookup(&self, a: ClassId, b: ClassId) -> Option<Arc<ClassMap>> {
        self.shared.registry.read().lookup(a, b)
    }

    /// The class map for `a -> b`, synthesizing one by property name when
    /// none is registered.
    pub fn lookup_or_default(&self, a: ClassId, b: ClassId) -> Result<Arc<ClassMap>> {
        let map = self.shared.bind(a, b)?;
        Ok(if map.a == a {
            map
        } else {
            Arc::new(map.flip())
        })
    }

    /// The class to instantiate when a `source` object is mapped to
    /// `requested`, which may be abstract.
    pub fn lookup_concrete_class(
        &self,
        source: ClassId,
        requested: ClassId,
        cx: &MappingContext,
    ) -> Result<ClassId> {
        self.shared.resolve_concrete(Some(source), requested, cx)
    }

    pub fn state(&self, a: ClassId, b: ClassId) -> MapperState {
        self.shared.state(a, b)
    }

    /// Lists the compiled steps of both directions of a pair, compiling it
    /// first if needed.
    pub fn describe_plan(&self, a: ClassId, b: ClassId) -> Result<String> {
        let unit = self.shared.unit(a, b)?;
        Ok(Describe {
            schema: &self.shared.schema,
            unit: &unit,
        }
        .to_string())
    }
}

impl Shared {
    fn slot(&self, a: ClassId, b: ClassId) -> Arc<Slot> {
        let key = MapperKey::new(a, b).unordered();

        if let Some(slot) = self.slots.read().get(&key) {
            return slot.clone();
        }

        self.slots.write().entry(key).or_default().clone()
    }

    pub(crate) fn state(&self, a: ClassId, b: ClassId) -> MapperState {
        self.slots
            .read()
            .get(&MapperKey::new(a, b).unordered())
            .map(|slot| slot.state())
            .unwrap_or(MapperState::Unresolved)
    }

    fn register(&self, map: ClassMap) -> Result<()> {
        let (a, b) = (map.a, map.b);

        if self.state(a, b) != MapperState::Unresolved {
            return Err(Error::configuration(
                &map.a_name,
                &map.b_name,
                "the pair was already used for mapping; register class maps before first use",
            ));
        }

        let map = self.registry.write().insert(map)?;
        debug!(
            a = %map.a_name,
            b = %map.b_name,
            fields = map.field_maps.len(),
            "registered class map"
        );

        if let Err(err) = self.unit(a, b) {
            self.registry.write().remove(a, b);
            return Err(err);
        }

        Ok(())
    }
}
