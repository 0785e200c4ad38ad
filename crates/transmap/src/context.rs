mod pool;
pub(crate) use pool::ContextPool;

use crate::{CycleMode, Result};
use std::collections::{HashMap, HashSet};
use transmap_core::{bail, schema::ClassId, ObjectRef, Value};

/// Per-call mapping state.
///
/// A context records every object mapped so far, so that a source object
/// referenced twice maps to one destination instance and cyclic graphs
/// terminate. A context belongs to a single top-level call; it must not be
/// shared between concurrent calls.
#[derive(Debug)]
pub struct MappingContext {
    /// Destination instances keyed by source instance and requested
    /// destination class
    mapped: HashMap<(ObjectRef, ClassId), ObjectRef>,

    /// Destination class to use for sources of a given class
    concrete: HashMap<ClassId, ClassId>,

    /// Pairs of instances currently being compared for merge
    comparing: HashSet<(usize, usize)>,

    /// Free-form values for converters and customizers
    properties: HashMap<String, Value>,

    cycle_mode: CycleMode,

    depth: usize,

    max_depth: usize,
}

impl MappingContext {
    pub fn new(cycle_mode: CycleMode, max_depth: usize) -> MappingContext {
        MappingContext {
            mapped: HashMap::new(),
            concrete: HashMap::new(),
            comparing: HashSet::new(),
            properties: HashMap::new(),
            cycle_mode,
            depth: 0,
            max_depth,
        }
    }

    pub fn cycle_mode(&self) -> CycleMode {
        self.cycle_mode
    }

    /// Returns the destination already produced for `source` as
    /// `destination`, if any.
    pub fn mapped_object(&self, source: &ObjectRef, destination: ClassId) -> Option<&ObjectRef> {
        self.mapped.get(&(source.clone(), destination))
    }

    /// Records `mapped` as the destination of `source`.
    ///
    /// Ignored in [`CycleMode::NonCyclic`].
    pub fn cache_mapped_object(
        &mut self,
        source: &ObjectRef,
        destination: ClassId,
        mapped: &ObjectRef,
    ) {
        if self.cycle_mode == CycleMode::Identity {
            self.mapped
                .insert((source.clone(), destination), mapped.clone());
        }
    }

    /// Requests instances of `destination` whenever a source of class
    /// `source` is mapped to a supertype of `destination`.
    pub fn register_concrete_class(&mut self, source: ClassId, destination: ClassId) {
        self.concrete.insert(source, destination);
    }

    pub fn concrete_class(&self, source: ClassId) -> Option<ClassId> {
        self.concrete.get(&source).copied()
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Clears all state so the context can serve another top-level call.
    pub fn reset(&mut self) {
        self.mapped.clear();
        self.concrete.clear();
        self.comparing.clear();
        self.properties.clear();
        self.depth = 0;
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            bail!("maximum mapping depth of {} exceeded", self.max_depth);
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Marks a pair of instances as being compared. Returns `false` if the
    /// pair is already under comparison further up the stack.
    pub(crate) fn begin_compare(&mut self, source: &ObjectRef, destination: &ObjectRef) -> bool {
        self.comparing.insert((source.addr(), destination.addr()))
    }

    pub(crate) fn end_compare(&mut self, source: &ObjectRef, destination: &ObjectRef) {
        self.comparing.remove(&(source.addr(), destination.addr()));
    }

    pub(crate) fn configure(&mut self, cycle_mode: CycleMode, max_depth: usize) {
        self.cycle_mode = cycle_mode;
        self.max_depth = max_depth;
    }
}
