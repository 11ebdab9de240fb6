//! # Configuration
//!
//! Settings shared by every helpdesk front end: backend location, logging,
//! banner timing, and the session greeting.

pub mod client;
