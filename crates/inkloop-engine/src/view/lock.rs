use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::time::TimingInfo;

/// Non-blocking mutual exclusion for one pipeline stage.
///
/// Acquisition never waits. The returned guard is `'static` and `Send` so it
/// can travel inside dispatched work; the stage stays held until the guard is
/// dropped, whether the work ran, failed, panicked or was discarded unrun.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageLock {
    held: Arc<AtomicBool>,
}

impl StageLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_lock(&self) -> Option<StageGuard> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| StageGuard {
                held: Arc::clone(&self.held),
            })
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub(crate) struct StageGuard {
    held: Arc<AtomicBool>,
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

/// Times one stage run. The sample is recorded when the timer drops, so a
/// failing or unwinding stage still counts.
pub(crate) struct StageTimer<'a> {
    timing: &'a Mutex<TimingInfo>,
}

impl<'a> StageTimer<'a> {
    pub(crate) fn start(timing: &'a Mutex<TimingInfo>) -> Self {
        timing.lock().begin_timing();
        Self { timing }
    }
}

impl Drop for StageTimer<'_> {
    fn drop(&mut self) {
        self.timing.lock().stop_timing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_guard_drops() {
        let lock = StageLock::new();
        let guard = lock.try_lock().unwrap();
        assert!(lock.is_locked());
        assert!(lock.try_lock().is_none());

        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.try_lock().is_some());
    }

    #[test]
    fn guard_released_when_carrying_closure_is_dropped() {
        let lock = StageLock::new();
        let guard = lock.try_lock().unwrap();
        let work: Box<dyn FnOnce() + Send> = Box::new(move || drop(guard));
        assert!(lock.is_locked());
        drop(work);
        assert!(!lock.is_locked());
    }

    #[test]
    fn guard_released_on_unwind() {
        let lock = StageLock::new();
        let guard = lock.try_lock().unwrap();
        let result = std::panic::catch_unwind(move || {
            let _guard = guard;
            panic!("draw failed");
        });
        assert!(result.is_err());
        assert!(!lock.is_locked());
    }

    #[test]
    fn timer_records_a_sample_on_unwind() {
        let timing = Mutex::new(TimingInfo::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _timer = StageTimer::start(&timing);
            panic!("stage failed");
        }));
        assert!(result.is_err());
        let timing = timing.lock();
        assert_eq!(timing.sample_count(), 1);
        assert!(!timing.is_measuring());
    }
}
