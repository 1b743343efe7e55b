use clap::Parser;
use face_collector::cache::{wipe_cache_dir, DEFAULT_CACHE_DIR};
use std::path::PathBuf;

/// Deletes cached files, leaving subdirectories in place
#[derive(Parser, Debug)]
#[command()]
struct Args {
    /// Cache directory to clean
    #[clap(long, default_value = DEFAULT_CACHE_DIR)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = Args::parse();

    // the binary itself is built under target/, never inside the cache
    wipe_cache_dir(&args.dir, None)?;
    Ok(())
}
