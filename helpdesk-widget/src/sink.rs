//! Output seams the controller and notification board draw on.
//!
//! A front end implements these traits for whatever it renders into (a
//! terminal, a DOM, a test recorder); nothing in this crate touches a real
//! display.

use shared::models::ChatLogEntry;

use crate::notification::{Banner, BannerId};

/// Handle for one typing indicator a sink has put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorId(pub u64);

/// Where chat output goes.
pub trait MessageSink: Send + Sync {
    /// Empty the input field after a submission is accepted.
    fn clear_input(&self);

    /// Append one message to the visible log.
    fn render_message(&self, entry: &ChatLogEntry);

    /// Bring the newest message into view.
    fn scroll_to_latest(&self);

    /// Show a "bot is typing" indicator and return its handle.
    fn show_typing_indicator(&self) -> IndicatorId;

    /// Remove an indicator previously returned by [`MessageSink::show_typing_indicator`].
    fn remove_typing_indicator(&self, indicator: IndicatorId);
}

/// Where notification banners go.
pub trait BannerSink: Send + Sync {
    /// Display a new banner.
    fn show_banner(&self, banner: &Banner);

    /// Take down the banner with this id. Only called for banners still shown.
    fn remove_banner(&self, id: BannerId);
}
