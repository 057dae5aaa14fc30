/// Session score. Only `TouchTracker` adds to it, and only while the session
/// accepts input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAccumulator {
    value: u64,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, n: u64) {
        self.value += n;
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
