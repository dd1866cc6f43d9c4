//! Video payload snapshots carried by events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Video state and quality requested for or negotiated on a call.
///
/// `video_state` is a bit set: bit 0 transmit, bit 1 receive, bit 2 paused.
/// A state of zero is audio only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoProfile {
    pub video_state: i32,
    #[serde(default = "default_quality")]
    pub quality: i32,
}

fn default_quality() -> i32 {
    VideoProfile::QUALITY_DEFAULT
}

impl VideoProfile {
    pub const STATE_AUDIO_ONLY: i32 = 0x0;
    pub const STATE_TX_ENABLED: i32 = 0x1;
    pub const STATE_RX_ENABLED: i32 = 0x2;
    pub const STATE_BIDIRECTIONAL: i32 = Self::STATE_TX_ENABLED | Self::STATE_RX_ENABLED;
    pub const STATE_PAUSED: i32 = 0x4;

    pub const QUALITY_UNKNOWN: i32 = 0;
    pub const QUALITY_HIGH: i32 = 1;
    pub const QUALITY_MEDIUM: i32 = 2;
    pub const QUALITY_LOW: i32 = 3;
    pub const QUALITY_DEFAULT: i32 = 4;

    pub fn new(video_state: i32, quality: i32) -> Self {
        Self {
            video_state,
            quality,
        }
    }

    /// Profile with the default quality.
    pub fn with_state(video_state: i32) -> Self {
        Self::new(video_state, Self::QUALITY_DEFAULT)
    }

    pub fn is_audio_only(&self) -> bool {
        !self.has_state(Self::STATE_TX_ENABLED) && !self.has_state(Self::STATE_RX_ENABLED)
    }

    pub fn is_transmission_enabled(&self) -> bool {
        self.has_state(Self::STATE_TX_ENABLED)
    }

    pub fn is_reception_enabled(&self) -> bool {
        self.has_state(Self::STATE_RX_ENABLED)
    }

    pub fn is_bidirectional(&self) -> bool {
        self.has_state(Self::STATE_BIDIRECTIONAL)
    }

    pub fn is_paused(&self) -> bool {
        self.has_state(Self::STATE_PAUSED)
    }

    fn has_state(&self, state: i32) -> bool {
        self.video_state & state == state
    }

    /// Name of a quality level, `None` for values outside the known set.
    pub fn quality_name(quality: i32) -> Option<&'static str> {
        match quality {
            Self::QUALITY_UNKNOWN => Some("unknown"),
            Self::QUALITY_HIGH => Some("high"),
            Self::QUALITY_MEDIUM => Some("medium"),
            Self::QUALITY_LOW => Some("low"),
            Self::QUALITY_DEFAULT => Some("default"),
            _ => None,
        }
    }
}

impl fmt::Display for VideoProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[VideoProfile State: ")?;
        if self.is_audio_only() {
            f.write_str("Audio Only")?;
        } else {
            f.write_str("Audio")?;
            if self.is_transmission_enabled() {
                f.write_str(" Tx")?;
            }
            if self.is_reception_enabled() {
                f.write_str(" Rx")?;
            }
        }
        if self.is_paused() {
            f.write_str(" Pause")?;
        }
        match Self::quality_name(self.quality) {
            Some(name) => write!(f, " Quality: {}]", name),
            None => write!(f, " Quality: {}]", self.quality),
        }
    }
}

/// Camera capabilities reported for the local device.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraCapabilities {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub zoom_supported: bool,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,
}

fn default_max_zoom() -> f32 {
    1.0
}

impl CameraCapabilities {
    /// Capabilities of a camera without zoom.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_zoom(width, height, false, default_max_zoom())
    }

    pub fn with_zoom(width: i32, height: i32, zoom_supported: bool, max_zoom: f32) -> Self {
        Self {
            width,
            height,
            zoom_supported,
            max_zoom,
        }
    }
}

impl fmt::Display for CameraCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        if self.zoom_supported {
            write!(f, " zoom<={}", self.max_zoom)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates() {
        let audio = VideoProfile::with_state(VideoProfile::STATE_AUDIO_ONLY);
        assert!(audio.is_audio_only());
        assert!(!audio.is_bidirectional());

        let paused_tx = VideoProfile::with_state(
            VideoProfile::STATE_TX_ENABLED | VideoProfile::STATE_PAUSED,
        );
        assert!(!paused_tx.is_audio_only());
        assert!(paused_tx.is_transmission_enabled());
        assert!(!paused_tx.is_reception_enabled());
        assert!(paused_tx.is_paused());

        let both = VideoProfile::with_state(VideoProfile::STATE_BIDIRECTIONAL);
        assert!(both.is_bidirectional());
        assert_eq!(both.quality, VideoProfile::QUALITY_DEFAULT);
    }

    #[test]
    fn profile_display() {
        let profile = VideoProfile::new(VideoProfile::STATE_BIDIRECTIONAL, VideoProfile::QUALITY_HIGH);
        assert_eq!(profile.to_string(), "[VideoProfile State: Audio Tx Rx Quality: high]");

        let odd = VideoProfile::new(VideoProfile::STATE_PAUSED, 42);
        assert_eq!(odd.to_string(), "[VideoProfile State: Audio Only Pause Quality: 42]");
    }

    #[test]
    fn camera_defaults_from_yaml() {
        let caps: CameraCapabilities = serde_yaml::from_str("width: 1280\nheight: 720\n").unwrap();
        assert_eq!(caps, CameraCapabilities::new(1280, 720));
        assert_eq!(caps.to_string(), "1280x720");
    }
}
