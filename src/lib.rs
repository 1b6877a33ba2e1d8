#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod model;
pub mod session;
pub mod submit;
pub mod tui;
pub mod upload;
