use crate::LineSegment;

/// Every segment drawn since the last reset, oldest first.
///
/// Grows without bound until cleared; replaying it in full is how a new
/// connection catches up.
#[derive(Debug, Default, Clone)]
pub struct DrawLog {
    segments: Vec<LineSegment>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn append(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn all(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
