use super::Converter;
use indexmap::IndexMap;
use std::sync::Arc;
use transmap_core::Type;

/// Registered converters.
///
/// Lookup by type pair returns the first registered converter that accepts
/// the pair. Converters registered with an id are also reachable by id.
#[derive(Debug, Default, Clone)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn Converter>>,
    by_id: IndexMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> ConverterRegistry {
        ConverterRegistry::default()
    }

    pub fn register(&mut self, converter: impl Converter + 'static) {
        self.converters.push(Arc::new(converter));
    }

    /// Registers a converter that is only used when a field map names it.
    pub fn register_with_id(&mut self, id: impl Into<String>, converter: impl Converter + 'static) {
        self.by_id.insert(id.into(), Arc::new(converter));
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Converter>> {
        self.by_id.get(id)
    }

    pub fn find(&self, source: &Type, destination: &Type) -> Option<&Arc<dyn Converter>> {
        self.converters
            .iter()
            .find(|converter| converter.can_convert(source, destination))
    }

    pub fn len(&self) -> usize {
        self.converters.len() + self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
