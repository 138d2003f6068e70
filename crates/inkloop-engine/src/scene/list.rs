use std::sync::Arc;

use crate::scene::DrawCmd;

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `reset()` keeps capacity, so a reused list stops allocating once warmed
///
/// The list tracks how many `Save`s are open. `Restore` without a matching
/// `Save` is dropped at record time so playback never underflows.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
    save_depth: usize,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the save depth. Keeps allocated capacity for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.items.clear();
        self.save_depth = 0;
    }

    /// Returns items in recording order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of `Save`s not yet matched by a `Restore`.
    #[inline]
    pub fn save_depth(&self) -> usize {
        self.save_depth
    }

    /// Appends a command, keeping the save depth balanced.
    pub fn push(&mut self, cmd: DrawCmd) {
        match cmd {
            DrawCmd::Save => self.save_depth += 1,
            DrawCmd::Restore => {
                if self.save_depth == 0 {
                    return;
                }
                self.save_depth -= 1;
            }
            _ => {}
        }
        self.items.push(cmd);
    }

    /// Closes every open `Save` and freezes the commands, leaving the list
    /// empty with its capacity kept.
    pub(crate) fn take_balanced(&mut self) -> Arc<[DrawCmd]> {
        while self.save_depth > 0 {
            self.push(DrawCmd::Restore);
        }
        let frozen: Arc<[DrawCmd]> = Arc::from(self.items.as_slice());
        self.reset();
        frozen
    }
}
