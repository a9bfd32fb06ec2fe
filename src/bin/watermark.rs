use std::path::PathBuf;

use anyhow::Context as _;
use clap::{CommandFactory, Parser, error::ErrorKind};
use tracing::Level;
use watermark::{DEFAULT_JPEG_QUALITY, EncodeOptions, WatermarkJob, apply_watermark};

/// Overlay a watermark image onto a main image.
#[derive(Parser, Debug)]
#[command(name = "watermark", version, allow_negative_numbers = true)]
struct Cli {
    /// Main image (.png, .jpg/.jpeg or .gif).
    #[arg(short = 'm')]
    main_image: Option<PathBuf>,

    /// Watermark image (.png, .jpg/.jpeg or .gif).
    #[arg(short = 'w')]
    watermark_image: Option<PathBuf>,

    /// Output path; its extension picks the encoder.
    #[arg(short = 'o')]
    out: Option<PathBuf>,

    /// X position on the main image.
    #[arg(short = 'x')]
    x: Option<i64>,

    /// Y position on the main image.
    #[arg(short = 'y')]
    y: Option<i64>,

    /// Height of the watermark bounding box.
    #[arg(long)]
    height: Option<i64>,

    /// Width of the watermark bounding box.
    #[arg(long)]
    width: Option<i64>,

    /// JSON job file; flags given on the command line override its fields.
    #[arg(long)]
    job: Option<PathBuf>,

    /// JPEG output quality.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Log verbosity on stderr (-v info, -vv debug).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_job(self) -> anyhow::Result<WatermarkJob> {
        let mut job = match &self.job {
            Some(path) => WatermarkJob::from_json_path(path)?,
            None => WatermarkJob::default(),
        };
        if let Some(p) = self.main_image {
            job.main_image = p;
        }
        if let Some(p) = self.watermark_image {
            job.watermark_image = p;
        }
        if let Some(p) = self.out {
            job.out = p;
        }
        job.x = self.x.unwrap_or(job.x);
        job.y = self.y.unwrap_or(job.y);
        job.bound_height = self.height.unwrap_or(job.bound_height);
        job.bound_width = self.width.unwrap_or(job.bound_width);
        Ok(job)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let opts = EncodeOptions {
        jpeg_quality: cli.jpeg_quality,
    };
    let job = cli.into_job()?;

    if let Err(e) = job.validate() {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, format!("invalid usage: {e}"))
            .exit();
    }

    apply_watermark(&job, opts).with_context(|| {
        format!(
            "watermark '{}' with '{}'",
            job.main_image.display(),
            job.watermark_image.display()
        )
    })?;
    Ok(())
}
