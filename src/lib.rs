pub mod detection;
pub mod models;
pub mod postcode;
pub mod session;

pub use detection::FramePipeline;
pub use detection::ocr::{OcrsRecognizer, RecognitionError, TextRecognizer};
pub use models::{FrameResult, PostalCode, ScanResult, Zone};
pub use postcode::{classify, clean, extract};
pub use session::{ResultSlot, ScanSession};
