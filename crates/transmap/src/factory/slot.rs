use crate::engine::CompiledMapper;
use parking_lot::{Mutex, MutexGuard};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc, OnceLock,
};

/// Where a class pair is on its way to a usable compiled mapper.
///
/// A pair moves forward one state at a time and never moves back once
/// `Ready`. A failed compilation returns it to `Unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum MapperState {
    /// No class map is bound to the pair yet.
    Unresolved = 0,

    /// A class map, registered or synthesized, was selected.
    ClassMapBound = 1,

    /// Both directions are compiled.
    PlanCompiled = 2,

    /// The compiled mapper is published and shared by all calls.
    Ready = 3,
}

/// Lazily compiled mapper of one unordered class pair.
///
/// Readers check `unit` without locking; the first caller to find it empty
/// takes `lock`, checks again, and builds it.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    lock: Mutex<()>,
    state: AtomicU8,
    unit: OnceLock<Arc<CompiledMapper>>,
}

impl Slot {
    pub(crate) fn state(&self) -> MapperState {
        match self.state.load(Ordering::Acquire) {
            0 => MapperState::Unresolved,
            1 => MapperState::ClassMapBound,
            2 => MapperState::PlanCompiled,
            _ => MapperState::Ready,
        }
    }

    pub(crate) fn ready(&self) -> Option<&Arc<CompiledMapper>> {
        self.unit.get()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    pub(crate) fn advance(&self, state: MapperState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Publishes the compiled mapper.
    pub(crate) fn publish(&self, unit: Arc<CompiledMapper>) -> Arc<CompiledMapper> {
        let unit = self.unit.get_or_init(|| unit).clone();
        self.advance(MapperState::Ready);
        unit
    }

    /// Returns an unpublished slot to `Unresolved`.
    pub(crate) fn reset(&self) {
        if self.unit.get().is_none() {
            self.advance(MapperState::Unresolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_before_publish() {
        let slot = Slot::default();
        assert_eq!(slot.state(), MapperState::Unresolved);

        slot.advance(MapperState::ClassMapBound);
        slot.advance(MapperState::PlanCompiled);
        assert_eq!(slot.state(), MapperState::PlanCompiled);

        slot.reset();
        assert_eq!(slot.state(), MapperState::Unresolved);
        assert!(slot.ready().is_none());
    }

    #[test]
    fn states_are_ordered() {
        assert!(MapperState::Unresolved < MapperState::ClassMapBound);
        assert!(MapperState::PlanCompiled < MapperState::Ready);
    }
}
