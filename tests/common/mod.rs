#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from parcelzone for tests
pub use parcelzone::{FramePipeline, FrameResult, PostalCode, ScanResult, ScanSession, Zone};
