use image::{DynamicImage, GrayImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub const DETECTION_MODEL: &str = "text-detection.rten";
pub const RECOGNITION_MODEL: &str = "text-recognition.rten";

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("image rejected by OCR engine: {0}")]
    InvalidImage(String),

    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Turns a thresholded single-channel image into plain text.
///
/// Implementations may be slow and are called once per frame from whatever
/// thread drives the session.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Arc<T> {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        (**self).recognize(image)
    }
}

/// Standard model cache location (`$HOME/.cache/ocrs`)
pub fn default_model_dir() -> anyhow::Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))?;
    Ok(Path::new(&home_dir).join(".cache/ocrs"))
}

/// Initialize OCR engine with models from `model_dir`
pub fn init_ocr_engine(model_dir: &Path) -> anyhow::Result<OcrEngine> {
    let detection_model_path = model_dir.join(DETECTION_MODEL);
    let recognition_model_path = model_dir.join(RECOGNITION_MODEL);

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        anyhow::bail!(
            "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
             Expected locations:\n  - {}\n  - {}",
            detection_model_path.display(),
            recognition_model_path.display()
        );
    }

    let detection_model = Model::load_file(&detection_model_path)?;
    let recognition_model = Model::load_file(&recognition_model_path)?;

    let engine = OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })?;

    Ok(engine)
}

/// Recognizer backed by the `ocrs` engine.
pub struct OcrsRecognizer {
    model_dir: PathBuf,
    // Loaded on first use; Arc so the lock is not held during recognition
    engine: Mutex<Option<Arc<OcrEngine>>>,
}

impl OcrsRecognizer {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            engine: Mutex::new(None),
        }
    }

    /// Use the default model cache directory
    pub fn from_default_location() -> anyhow::Result<Self> {
        Ok(Self::new(default_model_dir()?))
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Load the engine now instead of on the first frame
    pub fn warm_up(&self) -> Result<(), RecognitionError> {
        self.engine().map(|_| ())
    }

    fn engine(&self) -> Result<Arc<OcrEngine>, RecognitionError> {
        let mut guard = self
            .engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(engine) = guard.as_ref() {
            return Ok(engine.clone());
        }

        log::info!("Initializing OCR engine from {}", self.model_dir.display());
        let engine = init_ocr_engine(&self.model_dir)
            .map(Arc::new)
            .map_err(|e| RecognitionError::EngineUnavailable(format!("{e:#}")))?;
        log::info!("OCR engine initialized successfully");

        *guard = Some(engine.clone());
        Ok(engine)
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        let engine = self.engine()?;

        // Engine input is RGB
        let rgb = DynamicImage::ImageLuma8(image.clone()).to_rgb8();

        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| RecognitionError::InvalidImage(e.to_string()))?;
        let input = engine
            .prepare_input(source)
            .map_err(|e| RecognitionError::InvalidImage(e.to_string()))?;

        engine
            .get_text(&input)
            .map_err(|e| RecognitionError::Recognition(e.to_string()))
    }
}
