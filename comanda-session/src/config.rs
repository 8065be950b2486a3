//! Session configuration

/// Edit window armed on the initial send and on every reset (seconds)
pub const EDIT_WINDOW_SECS: i64 = 15;

/// How long the draft-saved confirmation stays visible (seconds)
pub const DRAFT_NOTICE_SECS: u64 = 3;

/// Tuning knobs for one order-composition session.
///
/// Defaults match production behavior; tests shorten the windows.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub edit_window_secs: i64,
    pub draft_notice_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            edit_window_secs: EDIT_WINDOW_SECS,
            draft_notice_secs: DRAFT_NOTICE_SECS,
        }
    }
}
