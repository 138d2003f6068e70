use super::types::TouchPoint;

/// Pending touch state for a single view.
///
/// `update` replaces the pending batch; `take` hands it to exactly one frame.
/// A frame that is skipped never calls `take`, so its touches carry over to
/// the next frame that runs the drawing callback.
#[derive(Debug, Default)]
pub struct TouchBuffer {
    pending: Vec<TouchPoint>,
}

impl TouchBuffer {
    pub fn update(&mut self, points: Vec<TouchPoint>) {
        self.pending = points;
    }

    /// Removes and returns the pending batch.
    pub fn take(&mut self) -> Vec<TouchPoint> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[TouchPoint] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TouchKind;

    #[test]
    fn update_replaces_and_take_consumes() {
        let mut buf = TouchBuffer::default();
        buf.update(vec![TouchPoint::new(1, 0.0, 0.0, TouchKind::Start)]);
        buf.update(vec![TouchPoint::new(1, 5.0, 5.0, TouchKind::Active)]);

        let taken = buf.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].x, 5.0);
        assert!(buf.pending().is_empty());
    }
}
