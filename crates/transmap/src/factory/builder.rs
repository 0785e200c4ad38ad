use super::{ClassMapRegistry, MapperFactory, Shared};
use crate::{
    context::ContextPool,
    converter::{Converter, ConverterRegistry},
    engine::Chain,
    metadata::{ClassMap, ClassMapBuilder},
    object_factory::ObjectFactory,
    Config, CycleMode, Result,
};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use transmap_core::{
    property::{PropertyResolver, SchemaPropertyResolver},
    schema::ClassId,
    Schema,
};

/// Idle mapping contexts kept for reuse by top-level calls.
const CONTEXT_POOL_CAPACITY: usize = 16;

/// Configures a [`MapperFactory`].
#[derive(Debug)]
pub struct Builder {
    schema: Arc<Schema>,
    config: Config,
    converters: ConverterRegistry,
    object_factories: HashMap<ClassId, Arc<dyn ObjectFactory>>,
    concrete_types: HashMap<ClassId, ClassId>,
    resolver: Arc<dyn PropertyResolver>,
    class_maps: Vec<ClassMap>,
}

impl Builder {
    pub(super) fn new(schema: Schema) -> Builder {
        Builder {
            schema: Arc::new(schema),
            config: Config::default(),
            converters: ConverterRegistry::new(),
            object_factories: HashMap::new(),
            concrete_types: HashMap::new(),
            resolver: Arc::new(SchemaPropertyResolver),
            class_maps: vec![],
        }
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn map_nulls(&mut self, map_nulls: bool) -> &mut Self {
        self.config.map_nulls = map_nulls;
        self
    }

    pub fn use_auto_mapping(&mut self, use_auto_mapping: bool) -> &mut Self {
        self.config.use_auto_mapping = use_auto_mapping;
        self
    }

    pub fn cycle_mode(&mut self, cycle_mode: CycleMode) -> &mut Self {
        self.config.cycle_mode = cycle_mode;
        self
    }

    pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn dump_plans(&mut self, dump_plans: bool) -> &mut Self {
        self.config.dump_plans = dump_plans;
        self
    }

    /// Registers a converter consulted for every type pair it accepts.
    pub fn converter(&mut self, converter: impl Converter + 'static) -> &mut Self {
        self.converters.register(converter);
        self
    }

    /// Registers a converter that only field maps naming `id` use.
    pub fn converter_with_id(
        &mut self,
        id: impl Into<String>,
        converter: impl Converter + 'static,
    ) -> &mut Self {
        self.converters.register_with_id(id, converter);
        self
    }

    /// Creates instances of `class` with `factory` instead of default
    /// field values.
    pub fn object_factory(
        &mut self,
        class: ClassId,
        factory: impl ObjectFactory + 'static,
    ) -> &mut Self {
        self.object_factories.insert(class, Arc::new(factory));
        self
    }

    /// Instantiates `concrete` when an abstract `class` is requested and no
    /// class map decides otherwise.
    pub fn concrete_type(&mut self, class: ClassId, concrete: ClassId) -> &mut Self {
        self.concrete_types.insert(class, concrete);
        self
    }

    /// Replaces the resolver turning property expressions into paths.
    ///
    /// Class maps started with [`Builder::class_map`] use the resolver set
    /// at the time they are started.
    pub fn property_resolver(&mut self, resolver: impl PropertyResolver + 'static) -> &mut Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Starts a class map for `a <-> b`; hand the result to
    /// [`Builder::register_class_map`].
    pub fn class_map(&self, a: ClassId, b: ClassId) -> ClassMapBuilder {
        ClassMapBuilder::new(self.schema.clone(), self.resolver.clone(), a, b)
    }

    pub fn register_class_map(&mut self, map: ClassMap) -> &mut Self {
        self.class_maps.push(map);
        self
    }

    /// Builds the factory, compiling every registered class map.
    pub fn build(&mut self) -> Result<MapperFactory> {
        let class_maps = std::mem::take(&mut self.class_maps);

        let shared = Arc::new(Shared {
            schema: self.schema.clone(),
            config: self.config.clone(),
            converters: self.converters.clone(),
            object_factories: self.object_factories.clone(),
            concrete_types: self.concrete_types.clone(),
            resolver: self.resolver.clone(),
            registry: RwLock::new(ClassMapRegistry::default()),
            slots: RwLock::new(HashMap::new()),
            pool: ContextPool::new(CONTEXT_POOL_CAPACITY),
            chain: Chain::default(),
        });

        let mut pairs = Vec::with_capacity(class_maps.len());
        for map in class_maps {
            pairs.push((map.a, map.b));
            shared.registry.write().insert(map)?;
        }

        // All class maps are registered before the first one compiles.
        for (a, b) in pairs {
            shared.unit(a, b)?;
        }

        debug!(
            classes = shared.schema.classes.len(),
            class_maps = shared.registry.read().explicit_pairs().count(),
            converters = shared.converters.len(),
            "built mapper factory"
        );

        Ok(MapperFactory { shared })
    }
}
