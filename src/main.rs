use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use std::sync::Arc;

use parcelzone::detection::preprocessing::DEFAULT_THRESHOLD;
use parcelzone::{FramePipeline, OcrsRecognizer, ScanSession};

#[derive(Parser)]
#[command(name = "parcelzone")]
#[command(about = "Read postcodes off parcel labels and sort them into delivery zones")]
struct Cli {
    /// Frames to process, in order, as one video session
    #[arg(value_name = "FRAMES", required = true)]
    frames: Vec<PathBuf>,

    /// Write annotated frames to this directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Directory holding the ocrs detection and recognition models
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// TrueType font for the overlay (defaults to a system font)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Binary threshold applied before recognition
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let recognizer = match &args.models {
        Some(dir) => OcrsRecognizer::new(dir),
        None => OcrsRecognizer::from_default_location()?,
    };
    // Fail early on missing models rather than on every frame
    recognizer.warm_up()?;

    let mut pipeline = FramePipeline::new(Arc::new(recognizer))
        .with_threshold(args.threshold)
        .with_verbose(args.verbose);
    pipeline = match &args.font {
        Some(path) => pipeline.with_font_path(path)?,
        None => pipeline.with_system_font(),
    };
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    if let Some(out) = &args.out {
        std::fs::create_dir_all(out)?;
    }

    let mut session = ScanSession::start(Arc::new(pipeline));

    for path in &args.frames {
        log::debug!("Loading frame: {:?}", path);
        let frame = ImageReader::open(path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))?
            .to_rgb8();
        session.submit_blocking(frame)?;
    }
    session.shutdown();

    println!("\n=== Parcel Zone Results ===");
    for (path, result) in args.frames.iter().zip(session.results().try_iter()) {
        println!("  {}: {}", path.display(), result.overlay_text);

        if let Some(out) = &args.out {
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "frame.png".into());
            let target = out.join(name).with_extension("png");
            result
                .image
                .save(&target)
                .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", target.display(), e))?;
        }
    }

    match session.latest() {
        Some(scan) => println!("\nLast scan: {} -> {}", scan.postcode, scan.zone),
        None => println!("\nNo postcode detected."),
    }

    Ok(())
}
