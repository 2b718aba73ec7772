pub mod ocr;
pub mod overlay;
pub mod preprocessing;

use ab_glyph::FontVec;
use anyhow::Result;
use image::{GrayImage, RgbImage};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::FrameResult;
use crate::postcode;
use ocr::TextRecognizer;

/// Where per-frame debug images go
#[derive(Debug)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
    // Numbers the saved files
    frames_written: AtomicUsize,
}

impl DebugConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            frames_written: AtomicUsize::new(0),
        }
    }

    fn next_index(&self) -> usize {
        self.frames_written.fetch_add(1, Ordering::Relaxed)
    }
}

/// Per-frame orchestrator: threshold, recognize, read the label, annotate.
///
/// Holds no per-frame state, so one pipeline can be shared between
/// sessions running on different threads.
pub struct FramePipeline {
    recognizer: Arc<dyn TextRecognizer>,
    threshold: u8,
    font: Option<FontVec>,
    font_scale: f32,
    verbose: bool,
    debug: Option<DebugConfig>,
}

impl FramePipeline {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            recognizer,
            threshold: preprocessing::DEFAULT_THRESHOLD,
            font: None,
            font_scale: overlay::OVERLAY_SCALE,
            verbose: false,
            debug: None,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_font_path(self, path: &Path) -> Result<Self> {
        Ok(self.with_font(overlay::load_font(path)?))
    }

    /// Try the usual system font locations; keeps going without a font
    pub fn with_system_font(mut self) -> Self {
        self.font = overlay::find_system_font();
        self
    }

    pub fn with_font_scale(mut self, scale: f32) -> Self {
        self.font_scale = scale;
        self
    }

    /// Log every frame's outcome at info instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig::new(output_dir));
        Ok(self)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Run one frame through the whole pipeline. Never fails: recognition
    /// errors and recognizer panics degrade to empty text and a
    /// "Not Found" result.
    pub fn process(&self, frame: &RgbImage) -> FrameResult {
        // Step 1: grayscale + binary threshold
        let prepared = preprocessing::prepare_for_ocr(frame, self.threshold);

        // Step 2: recognition, the only slow call
        let raw_text = self.recognize(&prepared);

        // Step 3: clean, extract, classify
        let (cleaned_text, found) = postcode::read_label(&raw_text);
        let (postcode, zone) = match found {
            Some((code, zone)) => (Some(code), Some(zone)),
            None => (None, None),
        };

        // Step 4: overlay on a copy of the original frame
        let overlay_text = overlay::overlay_text(postcode.as_ref(), zone);
        let image = overlay::render(frame, &overlay_text, self.font.as_ref(), self.font_scale);

        if self.verbose {
            log::info!("Frame: {:?} -> {}", cleaned_text, overlay_text);
        } else {
            log::debug!("Frame: {:?} -> {}", cleaned_text, overlay_text);
        }

        if let Some(debug) = &self.debug {
            save_debug_images(debug, debug.next_index(), frame, &prepared, &image);
        }

        FrameResult {
            image,
            cleaned_text,
            postcode,
            zone,
            overlay_text,
        }
    }

    fn recognize(&self, prepared: &GrayImage) -> String {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.recognizer.recognize(prepared)));
        match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                log::warn!("{}; treating as empty text", e);
                String::new()
            }
            Err(payload) => {
                log::warn!(
                    "Recognizer panicked ({}); treating as empty text",
                    panic_message(&*payload)
                );
                String::new()
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}

fn save_debug_images(
    debug: &DebugConfig,
    index: usize,
    input: &RgbImage,
    thresholded: &GrayImage,
    annotated: &RgbImage,
) {
    let filename = format!("{:04}.png", index);
    let root = &debug.output_dir;
    let saves = [
        ("00_input", save_into(root, "00_input", &filename, |p| input.save(p))),
        ("01_threshold", save_into(root, "01_threshold", &filename, |p| thresholded.save(p))),
        ("02_annotated", save_into(root, "02_annotated", &filename, |p| annotated.save(p))),
    ];

    for (step, outcome) in saves {
        match outcome {
            Ok(()) => log::debug!("Debug: saved {}/{}", step, filename),
            Err(e) => log::warn!("Failed to save debug image {}/{}: {}", step, filename, e),
        }
    }
}

fn save_into(
    root: &Path,
    step_dir: &str,
    filename: &str,
    save: impl FnOnce(&Path) -> Result<(), image::ImageError>,
) -> Result<(), image::ImageError> {
    let dir = root.join(step_dir);
    std::fs::create_dir_all(&dir).map_err(image::ImageError::IoError)?;
    save(&dir.join(filename))
}
