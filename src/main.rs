//! Sign language recognition application for live video feeds.

use anyhow::Result;
use clap::Parser;
use log::info;
use sign_language_recognition::app::{AppConfig, InvertMode, SignLanguageApp, VideoSource};
use sign_language_recognition::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// Path to the asset bundle directory
    #[arg(short, long)]
    assets: Option<String>,

    /// Invert image (none, x, y, xy)
    #[arg(short, long, default_value = "none")]
    inv: String,

    /// Brightness adjustment value (0 to disable, typical: 30)
    #[arg(short, long, default_value = "0")]
    brightness: f32,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Minimum confidence for reporting a prediction
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Reset the sequence after this many consecutive pose-free frames
    #[arg(long)]
    reset_after_lost: Option<u32>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Sign Language Recognition");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(assets_dir) = args.assets {
        config.assets.dir = assets_dir.into();
    }

    let app_config = AppConfig {
        video_source: if let Some(video_path) = args.video {
            VideoSource::File(video_path)
        } else {
            VideoSource::Camera(args.cam)
        },
        invert_mode: if args.inv == "none" {
            InvertMode::parse(&config.video.invert)
        } else {
            InvertMode::parse(&args.inv)
        },
        brightness: if args.brightness == 0.0 {
            config.video.brightness
        } else {
            args.brightness
        },
        max_frames: args.max_frames,
        confidence_floor: args
            .min_confidence
            .unwrap_or(config.classification.confidence_floor),
        reset_after_lost: args.reset_after_lost.unwrap_or(config.video.reset_after_lost),
    };

    let mut app = SignLanguageApp::new(app_config, &config)?;
    app.run().await?;

    Ok(())
}
