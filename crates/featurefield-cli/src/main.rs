//! featurefield CLI: label features in images and report their moments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use featurefield::{
    measure_features, Connectivity, Decoder, FeatureMeasurement, FileDecoder, LabelMap,
    LabelMapBuilder, LabelSource, MeasureOptions, SegmentationConfig,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "featurefield")]
#[command(about = "Measure centroid, orientation and best-fit ellipse of image features")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Threshold one image and measure its features.
    Single(CliSingleArgs),

    /// Difference a foreground against a background image and measure the changes.
    Diff(CliDiffArgs),

    /// Print the default segmentation and measurement settings as JSON.
    ConfigInfo,
}

#[derive(Debug, Clone, Args)]
struct CliSingleArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Intensity cut-off; pixels strictly above it are foreground.
    #[arg(long)]
    threshold: Option<f64>,

    #[command(flatten)]
    common: CliCommonArgs,
}

#[derive(Debug, Clone, Args)]
struct CliDiffArgs {
    /// Path to the foreground image.
    #[arg(long)]
    foreground: PathBuf,

    /// Path to the background image.
    #[arg(long)]
    background: PathBuf,

    /// Difference cut-off; pixels whose absolute difference reaches it are foreground.
    #[arg(long)]
    diff_threshold: Option<f64>,

    #[command(flatten)]
    common: CliCommonArgs,
}

#[derive(Debug, Clone, Args)]
struct CliCommonArgs {
    /// Path to write measurements (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Segmentation config JSON; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pixel neighbourhood for connected components.
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityArg>,

    /// Report at most this many features (largest first).
    #[arg(long)]
    max_features: Option<usize>,

    /// Skip features with fewer pixels.
    #[arg(long, default_value = "1")]
    min_pixels: usize,

    /// Also measure the background label.
    #[arg(long)]
    include_background: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConnectivityArg {
    Four,
    Eight,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(c: ConnectivityArg) -> Self {
        match c {
            ConnectivityArg::Four => Connectivity::Four,
            ConnectivityArg::Eight => Connectivity::Eight,
        }
    }
}

impl CliCommonArgs {
    fn load_config(&self) -> CliResult<SegmentationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                SegmentationConfig::from_json_file(path)?
            }
            None => SegmentationConfig::default(),
        };
        if let Some(c) = self.connectivity {
            config.connectivity = c.into();
        }
        Ok(config)
    }

    fn measure_options(&self) -> MeasureOptions {
        MeasureOptions {
            max_features: self.max_features,
            min_pixel_count: self.min_pixels,
            include_background: self.include_background,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Single(args) => run_single(&args),
        Commands::Diff(args) => run_diff(&args),
        Commands::ConfigInfo => run_config_info(),
    }
}

// ── config-info ────────────────────────────────────────────────────────

fn run_config_info() -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&SegmentationConfig::default())?
    );
    println!("{}", serde_json::to_string_pretty(&MeasureOptions::default())?);
    Ok(())
}

// ── single ─────────────────────────────────────────────────────────────

fn run_single(args: &CliSingleArgs) -> CliResult<()> {
    let mut config = args.common.load_config()?;
    if let Some(t) = args.threshold {
        config.threshold = t;
    }

    tracing::info!("Loading image: {}", args.image.display());
    let decoder = FileDecoder::new(&args.image);
    let builder = LabelMapBuilder::new(config);
    let (intensity, map) = builder
        .from_single_image(&decoder, None)
        .map_err(|e| -> CliError {
            format!("Failed to label image {}: {}", args.image.display(), e).into()
        })?;
    tracing::info!(
        "Image size: {}x{}, threshold {}",
        intensity.ncols(),
        intensity.nrows(),
        builder.config().threshold
    );

    report(map, &args.common)
}

// ── diff ───────────────────────────────────────────────────────────────

fn run_diff(args: &CliDiffArgs) -> CliResult<()> {
    let mut config = args.common.load_config()?;
    if let Some(t) = args.diff_threshold {
        config.diff_threshold = t;
    }

    let decode = |path: &Path| {
        tracing::info!("Loading image: {}", path.display());
        FileDecoder::new(path).decode().map_err(|e| -> CliError {
            format!("Failed to open image {}: {}", path.display(), e).into()
        })
    };
    let fg = decode(args.foreground.as_path())?;
    let bg = decode(args.background.as_path())?;
    let builder = LabelMapBuilder::new(config);
    let map = builder.from_image_diff(fg, bg)?;
    tracing::info!("Difference threshold {}", builder.config().diff_threshold);

    report(map, &args.common)
}

fn report(map: LabelMap, common: &CliCommonArgs) -> CliResult<()> {
    tracing::info!("Labeled {} components", map.count);

    let source = LabelSource::from(map);
    let measurements: Vec<FeatureMeasurement> =
        measure_features(&source, &common.measure_options());
    tracing::info!("Measured {} features", measurements.len());

    let json = serde_json::to_string_pretty(&measurements)?;
    match &common.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
