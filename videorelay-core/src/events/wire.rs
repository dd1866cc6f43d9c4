//! Tagged wire messages as a transport hands them over.
//!
//! A transport decodes its own framing into a numeric tag plus a loosely typed
//! argument map. Turning that into an [`Event`] is the only place an unknown
//! tag can show up; past this point the variant set is closed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CameraCapabilities, Event, VideoProfile};

/// Numeric tags, one per [`Event`] variant.
pub mod tags {
    pub const SESSION_MODIFY_REQUEST: u32 = 0;
    pub const SESSION_MODIFY_RESPONSE: u32 = 1;
    pub const CALL_SESSION_EVENT: u32 = 2;
    pub const PEER_DIMENSIONS_CHANGED: u32 = 3;
    pub const CALL_DATA_USAGE_CHANGED: u32 = 4;
    pub const CAMERA_CAPABILITIES_CHANGED: u32 = 5;
    pub const VIDEO_QUALITY_CHANGED: u32 = 6;
}

/// A message before it has been matched to a variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub tag: u32,
    #[serde(default)]
    pub args: serde_yaml::Value,
}

impl WireMessage {
    pub fn new(tag: u32, args: serde_yaml::Value) -> Self {
        Self { tag, args }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unknown tag {0}")]
    UnknownTag(u32),
    #[error("tag {tag}: {reason}")]
    Malformed { tag: u32, reason: String },
}

#[derive(Deserialize)]
struct SessionModifyRequestArgs {
    profile: VideoProfile,
}

#[derive(Deserialize)]
struct SessionModifyResponseArgs {
    status: i32,
    requested: VideoProfile,
    response: VideoProfile,
}

#[derive(Deserialize)]
struct CallSessionEventArgs {
    event: i32,
}

#[derive(Deserialize)]
struct PeerDimensionsArgs {
    width: i32,
    height: i32,
}

#[derive(Deserialize)]
struct DataUsageArgs {
    data_usage: i64,
}

#[derive(Deserialize)]
struct CameraCapabilitiesArgs {
    capabilities: CameraCapabilities,
}

#[derive(Deserialize)]
struct VideoQualityArgs {
    quality: i32,
}

fn decode_args<T: DeserializeOwned>(tag: u32, args: serde_yaml::Value) -> Result<T, WireError> {
    serde_yaml::from_value(args).map_err(|e| WireError::Malformed {
        tag,
        reason: e.to_string(),
    })
}

impl TryFrom<WireMessage> for Event {
    type Error = WireError;

    fn try_from(message: WireMessage) -> Result<Self, Self::Error> {
        let WireMessage { tag, args } = message;
        let event = match tag {
            tags::SESSION_MODIFY_REQUEST => {
                let a: SessionModifyRequestArgs = decode_args(tag, args)?;
                Event::SessionModifyRequest { profile: a.profile }
            }
            tags::SESSION_MODIFY_RESPONSE => {
                let a: SessionModifyResponseArgs = decode_args(tag, args)?;
                Event::SessionModifyResponse {
                    status: a.status,
                    requested: a.requested,
                    response: a.response,
                }
            }
            tags::CALL_SESSION_EVENT => {
                let a: CallSessionEventArgs = decode_args(tag, args)?;
                Event::CallSessionEvent { event: a.event }
            }
            tags::PEER_DIMENSIONS_CHANGED => {
                let a: PeerDimensionsArgs = decode_args(tag, args)?;
                Event::PeerDimensionsChanged {
                    width: a.width,
                    height: a.height,
                }
            }
            tags::CALL_DATA_USAGE_CHANGED => {
                let a: DataUsageArgs = decode_args(tag, args)?;
                Event::CallDataUsageChanged {
                    data_usage: a.data_usage,
                }
            }
            tags::CAMERA_CAPABILITIES_CHANGED => {
                let a: CameraCapabilitiesArgs = decode_args(tag, args)?;
                Event::CameraCapabilitiesChanged {
                    capabilities: a.capabilities,
                }
            }
            tags::VIDEO_QUALITY_CHANGED => {
                let a: VideoQualityArgs = decode_args(tag, args)?;
                Event::VideoQualityChanged { quality: a.quality }
            }
            other => return Err(WireError::UnknownTag(other)),
        };
        Ok(event)
    }
}
