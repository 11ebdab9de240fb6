#![cfg_attr(not(test), forbid(unsafe_code))]
#![warn(clippy::pedantic)]

pub mod config;
pub mod format;
pub mod models;
