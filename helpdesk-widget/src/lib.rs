#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]

//! Chat controller and HTTP bindings for the helpdesk assistant.
//!
//! Front ends implement [`sink::MessageSink`] and [`sink::BannerSink`] and
//! feed user input to a [`controller::ChatController`]; everything that talks
//! to the server goes through [`api::HelpdeskApi`].

pub mod api;
pub mod complaints;
pub mod controller;
pub mod notification;
pub mod sink;

#[cfg(test)]
mod api_test;
#[cfg(test)]
mod testing;

pub use api::{ApiError, HelpdeskApi, HelpdeskClient};
pub use complaints::ComplaintDesk;
pub use controller::{ChatController, SubmissionState, SubmitOutcome, UiEvent};
pub use notification::{Banner, BannerId, BannerKind, NotificationBoard};
pub use sink::{BannerSink, IndicatorId, MessageSink};
