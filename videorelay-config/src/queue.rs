//! Pending-event queue configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Queue sizing for a relay.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of events waiting for dispatch. `None` keeps the queue
    /// unbounded; once the limit is reached, posts fail with `QueueFull`.
    #[serde(default)]
    #[validate(range(min = 1, max = 1048576))]
    pub capacity: Option<usize>,
}
