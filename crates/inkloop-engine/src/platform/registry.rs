use std::collections::HashMap;

use super::{DrawLoopHandle, TickFn, ViewId};

/// Draw loops registered with a platform, keyed by view.
#[derive(Default)]
pub(crate) struct LoopRegistry {
    loops: HashMap<ViewId, (DrawLoopHandle, TickFn)>,
    next_handle: u64,
}

impl LoopRegistry {
    /// Registers (or replaces) the loop for `view_id` and returns a fresh handle.
    pub(crate) fn register(&mut self, view_id: ViewId, on_tick: TickFn) -> Option<DrawLoopHandle> {
        self.next_handle = self.next_handle.checked_add(1)?;
        let handle = DrawLoopHandle::new(self.next_handle)?;
        if self.loops.insert(view_id, (handle, on_tick)).is_some() {
            log::debug!("{view_id}: draw loop replaced");
        }
        Some(handle)
    }

    pub(crate) fn unregister(&mut self, view_id: ViewId) -> bool {
        self.loops.remove(&view_id).is_some()
    }

    pub(crate) fn contains(&self, view_id: ViewId) -> bool {
        self.loops.contains_key(&view_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.loops.len()
    }

    /// Clones the callbacks so they can run without holding the registry lock.
    pub(crate) fn callbacks(&self) -> Vec<TickFn> {
        self.loops.values().map(|(_, tick)| tick.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn handles_are_non_zero_and_unique() {
        let mut reg = LoopRegistry::default();
        let a = reg.register(ViewId(1), Arc::new(|_| {})).unwrap();
        let b = reg.register(ViewId(2), Arc::new(|_| {})).unwrap();
        assert_ne!(a, b);
        assert!(a.get() > 0);
        assert_eq!(reg.len(), 2);

        assert!(reg.unregister(ViewId(1)));
        assert!(!reg.unregister(ViewId(1)));
        assert!(!reg.contains(ViewId(1)));
    }
}
