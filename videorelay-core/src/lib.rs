//! # videorelay-core
//!
//! Ordered relay for video-call session events.
//!
//! Producers (transport threads, tasks, test drivers) post typed [`Event`]s
//! onto an [`EventRelay`]; one dispatcher task hands them to a single
//! [`RelayDelegate`] in the exact order the posts completed, one callback at
//! a time.
//!
//! ### Key Submodules:
//! - `events`: the closed event set, its payload snapshots and wire-tag decoding
//! - `relay`: the queue, the dispatcher task and the `Open -> Closing -> Closed` lifecycle
//! - `delegate`: the callback trait and the variant-to-callback mapping

pub mod delegate;
pub mod error;
pub mod events;
pub mod relay;

pub mod prelude {
    pub use crate::delegate::RelayDelegate;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::relay::*;
}

pub use delegate::RelayDelegate;
pub use error::{DelegateError, RelayError};
pub use events::{CameraCapabilities, Event, VideoProfile, WireMessage};
pub use relay::{EventRelay, RelayOptions, RelayState};
