//! ## videorelay-core::events
//! **Typed video-session events relayed to a delegate**
//!
//! Every event owns its payload; the relay moves it from producer to
//! delegate without touching it.

pub mod codes;
mod video;
pub mod wire;

use std::fmt;

pub use video::{CameraCapabilities, VideoProfile};
pub use wire::{tags, WireError, WireMessage};

/// One unit of work for the relay.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The peer asks to change the video profile of the call.
    SessionModifyRequest { profile: VideoProfile },
    /// The peer answered a session modify request we sent.
    SessionModifyResponse {
        status: i32,
        requested: VideoProfile,
        response: VideoProfile,
    },
    /// Camera or media stream state change, see [`codes::session_event`].
    CallSessionEvent { event: i32 },
    PeerDimensionsChanged { width: i32, height: i32 },
    /// Total bytes used by the video call so far.
    CallDataUsageChanged { data_usage: i64 },
    CameraCapabilitiesChanged { capabilities: CameraCapabilities },
    VideoQualityChanged { quality: i32 },
}

impl Event {
    /// Stable snake_case name, used for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionModifyRequest { .. } => "session_modify_request",
            Event::SessionModifyResponse { .. } => "session_modify_response",
            Event::CallSessionEvent { .. } => "call_session_event",
            Event::PeerDimensionsChanged { .. } => "peer_dimensions_changed",
            Event::CallDataUsageChanged { .. } => "call_data_usage_changed",
            Event::CameraCapabilitiesChanged { .. } => "camera_capabilities_changed",
            Event::VideoQualityChanged { .. } => "video_quality_changed",
        }
    }

    /// Wire tag a transport uses for this variant.
    pub fn tag(&self) -> u32 {
        match self {
            Event::SessionModifyRequest { .. } => tags::SESSION_MODIFY_REQUEST,
            Event::SessionModifyResponse { .. } => tags::SESSION_MODIFY_RESPONSE,
            Event::CallSessionEvent { .. } => tags::CALL_SESSION_EVENT,
            Event::PeerDimensionsChanged { .. } => tags::PEER_DIMENSIONS_CHANGED,
            Event::CallDataUsageChanged { .. } => tags::CALL_DATA_USAGE_CHANGED,
            Event::CameraCapabilitiesChanged { .. } => tags::CAMERA_CAPABILITIES_CHANGED,
            Event::VideoQualityChanged { .. } => tags::VIDEO_QUALITY_CHANGED,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SessionModifyRequest { profile } => {
                write!(f, "{}({})", self.kind(), profile)
            }
            Event::SessionModifyResponse {
                status,
                requested,
                response,
            } => {
                write!(f, "{}(", self.kind())?;
                match codes::session_modify_status::name(*status) {
                    Some(name) => f.write_str(name)?,
                    None => write!(f, "{}", status)?,
                }
                write!(f, ", requested={}, response={})", requested, response)
            }
            Event::CallSessionEvent { event } => match codes::session_event::name(*event) {
                Some(name) => write!(f, "{}({})", self.kind(), name),
                None => write!(f, "{}({})", self.kind(), event),
            },
            Event::PeerDimensionsChanged { width, height } => {
                write!(f, "{}({}x{})", self.kind(), width, height)
            }
            Event::CallDataUsageChanged { data_usage } => {
                write!(f, "{}({} bytes)", self.kind(), data_usage)
            }
            Event::CameraCapabilitiesChanged { capabilities } => {
                write!(f, "{}({})", self.kind(), capabilities)
            }
            Event::VideoQualityChanged { quality } => {
                match VideoProfile::quality_name(*quality) {
                    Some(name) => write!(f, "{}({})", self.kind(), name),
                    None => write!(f, "{}({})", self.kind(), quality),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_code_names_when_known() {
        let known = Event::CallSessionEvent {
            event: codes::session_event::CAMERA_READY,
        };
        assert_eq!(known.to_string(), "call_session_event(camera_ready)");

        let unknown = Event::CallSessionEvent { event: 99 };
        assert_eq!(unknown.to_string(), "call_session_event(99)");

        let dims = Event::PeerDimensionsChanged {
            width: 640,
            height: 480,
        };
        assert_eq!(dims.to_string(), "peer_dimensions_changed(640x480)");
    }

    #[test]
    fn tags_are_distinct() {
        let profile = VideoProfile::with_state(VideoProfile::STATE_BIDIRECTIONAL);
        let all = [
            Event::SessionModifyRequest { profile },
            Event::SessionModifyResponse {
                status: codes::session_modify_status::SUCCESS,
                requested: profile,
                response: profile,
            },
            Event::CallSessionEvent { event: 1 },
            Event::PeerDimensionsChanged {
                width: 1,
                height: 1,
            },
            Event::CallDataUsageChanged { data_usage: 1 },
            Event::CameraCapabilitiesChanged {
                capabilities: CameraCapabilities::new(1, 1),
            },
            Event::VideoQualityChanged { quality: 1 },
        ];
        let mut seen: Vec<u32> = all.iter().map(Event::tag).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<u32>>());
    }
}
