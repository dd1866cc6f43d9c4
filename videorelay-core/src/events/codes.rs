//! Well-known integer codes carried in event payloads.
//!
//! Payloads keep the raw integer; unknown codes pass through the relay
//! untouched and only lose their pretty name in logs.

/// Outcome codes of a session modify response.
pub mod session_modify_status {
    pub const SUCCESS: i32 = 1;
    pub const FAIL: i32 = 2;
    pub const INVALID: i32 = 3;
    pub const TIMED_OUT: i32 = 4;
    pub const REJECTED_BY_REMOTE: i32 = 5;

    pub fn name(code: i32) -> Option<&'static str> {
        match code {
            SUCCESS => Some("success"),
            FAIL => Some("fail"),
            INVALID => Some("invalid"),
            TIMED_OUT => Some("timed_out"),
            REJECTED_BY_REMOTE => Some("rejected_by_remote"),
            _ => None,
        }
    }
}

/// Call session event codes.
pub mod session_event {
    pub const RX_PAUSE: i32 = 1;
    pub const RX_RESUME: i32 = 2;
    pub const TX_START: i32 = 3;
    pub const TX_STOP: i32 = 4;
    pub const CAMERA_FAILURE: i32 = 5;
    pub const CAMERA_READY: i32 = 6;
    pub const CAMERA_PERMISSION_ERROR: i32 = 7;

    pub fn name(code: i32) -> Option<&'static str> {
        match code {
            RX_PAUSE => Some("rx_pause"),
            RX_RESUME => Some("rx_resume"),
            TX_START => Some("tx_start"),
            TX_STOP => Some("tx_stop"),
            CAMERA_FAILURE => Some("camera_failure"),
            CAMERA_READY => Some("camera_ready"),
            CAMERA_PERMISSION_ERROR => Some("camera_permission_error"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_codes_only() {
        assert_eq!(session_modify_status::name(4), Some("timed_out"));
        assert_eq!(session_modify_status::name(0), None);
        assert_eq!(session_event::name(7), Some("camera_permission_error"));
        assert_eq!(session_event::name(-1), None);
    }
}
