//! Test Helper Utilities
//!
//! Shared fakes and fixtures for smilefjes-prep integration tests

#![allow(dead_code)]

pub mod fakes;
pub mod http_stub;
pub mod log_capture;

pub use fakes::{entity, record, FakeGeocoder, FakeRegistry, Reply};
pub use http_stub::{closed_base_url, HttpStub};
pub use log_capture::LogCapture;
