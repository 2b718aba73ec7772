use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
use parcelzone::{RecognitionError, TextRecognizer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Creates a width x height frame filled with one colour.
pub fn solid_frame(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    ImageBuffer::from_fn(width, height, |_, _| Rgb(color))
}

/// Creates a frame with a horizontal brightness ramp from 0 to 255.
pub fn gradient_frame(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, _| {
        let v = ((x * 255) / width.saturating_sub(1).max(1)) as u8;
        Rgb([v, v, v])
    })
}

/// Recognizer that always "reads" the same text and remembers what it was shown.
pub struct StubRecognizer {
    text: String,
    calls: AtomicUsize,
    last_image: Mutex<Option<GrayImage>>,
}

impl StubRecognizer {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_image(&self) -> Option<GrayImage> {
        self.last_image.lock().unwrap().clone()
    }
}

impl TextRecognizer for StubRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_image.lock().unwrap() = Some(image.clone());
        Ok(self.text.clone())
    }
}

/// Recognizer whose engine is never available.
pub struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        Err(RecognitionError::EngineUnavailable("no models".to_string()))
    }
}

/// Recognizer that takes a while, for exercising frame dropping.
pub struct SlowRecognizer {
    pub text: String,
    pub delay: Duration,
}

impl TextRecognizer for SlowRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        std::thread::sleep(self.delay);
        Ok(self.text.clone())
    }
}

/// Recognizer that returns each scripted text once, in order, then empty text.
pub struct ScriptedRecognizer {
    texts: Mutex<std::collections::VecDeque<String>>,
}

impl ScriptedRecognizer {
    pub fn new(texts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
        })
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        Ok(self.texts.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Recognizer that panics on its first call, then reads `text` every time.
pub struct PanicOnceRecognizer {
    text: String,
    calls: AtomicUsize,
}

impl PanicOnceRecognizer {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

impl TextRecognizer for PanicOnceRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("engine crashed");
        }
        Ok(self.text.clone())
    }
}
