//! Node id generation.
//!
//! Ids are derived from creation time and are strictly increasing within a
//! session, so two nodes created in the same millisecond still get distinct ids.

use chrono::Utc;

/// Source of fresh, never reused node ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Millisecond-timestamp ids, bumped past the previous id when the clock has
/// not advanced.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: i64,
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

/// Deterministic ids counting up from a start value. Used for replayable
/// sessions and tests.
#[derive(Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}
