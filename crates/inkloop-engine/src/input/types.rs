/// Phase of a touch point within its gesture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchKind {
    Start,
    Active,
    End,
    Cancelled,
}

/// One touch sample in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchPoint {
    /// Stable identity of the finger/pointer for the duration of a gesture.
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Normalized pressure; 1.0 when the platform does not report it.
    pub force: f32,
    pub kind: TouchKind,
    /// Platform timestamp in milliseconds.
    pub timestamp: f64,
}

impl TouchPoint {
    #[inline]
    pub fn new(id: u64, x: f32, y: f32, kind: TouchKind) -> Self {
        Self { id, x, y, force: 1.0, kind, timestamp: 0.0 }
    }

    #[inline]
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// True while the finger is still down.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.kind, TouchKind::Start | TouchKind::Active)
    }
}
