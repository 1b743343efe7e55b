use clap::Parser;
use face_collector::collector::DEFAULT_TARGET_COUNT;
use face_collector::logger::DEFAULT_LOG_DIR;
use face_collector::session::DEFAULT_OUTPUT_DIR;
use face_collector::{CollectorConfig, DetectorParams, FaceCollector};
use std::path::PathBuf;

/// Facial image collector
#[derive(Parser, Debug)]
#[command()]
struct Args {
    /// User's name
    #[clap(long)]
    user: String,

    /// Number of images to collect
    #[clap(long, default_value_t = DEFAULT_TARGET_COUNT)]
    count: usize,

    /// Directory session folders are created in
    #[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Directory session logs are written to
    #[clap(long, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Camera index
    #[clap(long, default_value_t = 0)]
    camera: i32,

    /// Haar cascade XML to use instead of OpenCV's frontal face model
    #[clap(long)]
    cascade: Option<PathBuf>,

    /// Run without a preview window
    #[clap(long)]
    no_preview: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Args = Args::parse();

    let config = CollectorConfig {
        user_name: args.user,
        target_count: args.count,
        output_dir: args.output_dir,
        log_dir: args.log_dir,
        camera_index: args.camera,
        cascade: args.cascade,
        preview: !args.no_preview,
        detector_params: DetectorParams::default(),
    };

    let collector = FaceCollector::new(&config)?;
    let report = collector.collect()?;

    println!(
        "Collection complete. {} grayscale face images saved in {}",
        report.saved_count,
        report.output_folder.display()
    );
    Ok(())
}
