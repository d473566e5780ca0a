use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Collection window in UTC. `end` is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[must_use]
    pub fn length(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}
