//! Delegate that turns every relayed event into a log line.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;
use videorelay_core::events::codes;
use videorelay_core::prelude::*;

#[derive(Debug, Default)]
pub struct LoggingDelegate {
    handled: AtomicU64,
}

impl LoggingDelegate {
    /// Number of callbacks run so far.
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    fn tick(&self) -> u64 {
        self.handled.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl RelayDelegate for LoggingDelegate {
    async fn on_session_modify_request(&self, profile: VideoProfile) -> Result<(), DelegateError> {
        info!(n = self.tick(), "Session modify request: {profile}");
        Ok(())
    }

    async fn on_session_modify_response(
        &self,
        status: i32,
        requested: VideoProfile,
        response: VideoProfile,
    ) -> Result<(), DelegateError> {
        info!(
            n = self.tick(),
            status = codes::session_modify_status::name(status).unwrap_or("unknown"),
            "Session modify response: requested {requested}, got {response}"
        );
        Ok(())
    }

    async fn on_call_session_event(&self, event: i32) -> Result<(), DelegateError> {
        info!(
            n = self.tick(),
            code = event,
            "Call session event: {}",
            codes::session_event::name(event).unwrap_or("unknown")
        );
        Ok(())
    }

    async fn on_peer_dimensions_changed(
        &self,
        width: i32,
        height: i32,
    ) -> Result<(), DelegateError> {
        info!(n = self.tick(), "Peer dimensions changed: {width}x{height}");
        Ok(())
    }

    async fn on_call_data_usage_changed(&self, data_usage: i64) -> Result<(), DelegateError> {
        info!(n = self.tick(), "Call data usage: {data_usage} bytes");
        Ok(())
    }

    async fn on_camera_capabilities_changed(
        &self,
        capabilities: CameraCapabilities,
    ) -> Result<(), DelegateError> {
        info!(n = self.tick(), "Camera capabilities changed: {capabilities}");
        Ok(())
    }

    async fn on_video_quality_changed(&self, quality: i32) -> Result<(), DelegateError> {
        info!(
            n = self.tick(),
            "Video quality changed: {}",
            VideoProfile::quality_name(quality).unwrap_or("unknown")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn logs_and_counts_callbacks() {
        let delegate = LoggingDelegate::default();

        delegate.on_peer_dimensions_changed(640, 480).await.unwrap();
        delegate
            .on_call_session_event(codes::session_event::TX_STOP)
            .await
            .unwrap();

        assert_eq!(delegate.handled(), 2);
        assert!(logs_contain("Peer dimensions changed: 640x480"));
        assert!(logs_contain("Call session event: tx_stop"));
    }
}
