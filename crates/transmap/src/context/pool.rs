use super::MappingContext;
use crate::Config;
use parking_lot::Mutex;

/// Reusable contexts for top-level mapping calls.
///
/// A context is reset before it goes back into the pool, so callers always
/// receive a clean one.
#[derive(Debug)]
pub(crate) struct ContextPool {
    idle: Mutex<Vec<MappingContext>>,
    capacity: usize,
}

impl ContextPool {
    pub(crate) fn new(capacity: usize) -> ContextPool {
        ContextPool {
            idle: Mutex::new(Vec::new()),
            capacity,
        }
    }

    pub(crate) fn acquire(&self, config: &Config) -> MappingContext {
        match self.idle.lock().pop() {
            Some(mut cx) => {
                cx.configure(config.cycle_mode, config.max_depth);
                cx
            }
            None => MappingContext::new(config.cycle_mode, config.max_depth),
        }
    }

    pub(crate) fn release(&self, mut cx: MappingContext) {
        cx.reset();

        let mut idle = self.idle.lock();
        if idle.len() < self.capacity {
            idle.push(cx);
        }
    }
}
