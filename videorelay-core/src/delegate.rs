//! Defines the RelayDelegate trait receiving dispatched events.
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DelegateError;
use crate::events::{CameraCapabilities, Event, VideoProfile};

/// Recipient of relayed events.
///
/// A relay invokes one method at a time, in posting order, and waits for it to
/// return before starting the next, so implementations need no locking
/// against the relay itself. A returned error (or a panic) is logged by the
/// relay and does not stop later deliveries.
///
/// A callback may post to the relay that invoked it, but cannot wait for it
/// to close: the drain would wait on the very callback doing the waiting.
/// `close()` detects this, starts closing and returns
/// `RelayError::CloseFromDelegate` instead of hanging.
#[async_trait]
pub trait RelayDelegate: Send + Sync + 'static {
    async fn on_session_modify_request(&self, profile: VideoProfile) -> Result<(), DelegateError>;

    async fn on_session_modify_response(
        &self,
        status: i32,
        requested: VideoProfile,
        response: VideoProfile,
    ) -> Result<(), DelegateError>;

    async fn on_call_session_event(&self, event: i32) -> Result<(), DelegateError>;

    async fn on_peer_dimensions_changed(&self, width: i32, height: i32)
        -> Result<(), DelegateError>;

    async fn on_call_data_usage_changed(&self, data_usage: i64) -> Result<(), DelegateError>;

    async fn on_camera_capabilities_changed(
        &self,
        capabilities: CameraCapabilities,
    ) -> Result<(), DelegateError>;

    async fn on_video_quality_changed(&self, quality: i32) -> Result<(), DelegateError>;
}

/// Unpacks `event` into the matching callback.
pub(crate) async fn deliver(
    delegate: Arc<dyn RelayDelegate>,
    event: Event,
) -> Result<(), DelegateError> {
    match event {
        Event::SessionModifyRequest { profile } => {
            delegate.on_session_modify_request(profile).await
        }
        Event::SessionModifyResponse {
            status,
            requested,
            response,
        } => {
            delegate
                .on_session_modify_response(status, requested, response)
                .await
        }
        Event::CallSessionEvent { event } => delegate.on_call_session_event(event).await,
        Event::PeerDimensionsChanged { width, height } => {
            delegate.on_peer_dimensions_changed(width, height).await
        }
        Event::CallDataUsageChanged { data_usage } => {
            delegate.on_call_data_usage_changed(data_usage).await
        }
        Event::CameraCapabilitiesChanged { capabilities } => {
            delegate.on_camera_capabilities_changed(capabilities).await
        }
        Event::VideoQualityChanged { quality } => delegate.on_video_quality_changed(quality).await,
    }
}
