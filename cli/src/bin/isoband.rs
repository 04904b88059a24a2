use clap::{Parser, Subcommand};
use cli::ExtractionConfig;
use color_eyre::eyre::Result;
use isoband::{ContourSet, SharedHolePolicy, ZeroAreaPolicy, linspace_levels};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract band polygons from a contour set and write GeoJSON
    Extract {
        /// Contour set JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// GeoJSON output file
        #[arg(short, long)]
        output: PathBuf,
        /// Handling of rings with zero signed area
        #[arg(long, default_value_t = ZeroAreaPolicy::Flag)]
        zero_area: ZeroAreaPolicy,
        /// Handling of holes claimed by several outer rings
        #[arg(long, default_value_t = SharedHolePolicy::Duplicate)]
        shared_holes: SharedHolePolicy,
        /// Process bands in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Run an extraction described by a TOML or JSON configuration file
    Process {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print evenly spaced contour levels
    Levels {
        /// Lowest level
        #[arg(long, default_value = "0.0")]
        min: f64,
        /// Highest level
        #[arg(long)]
        max: f64,
        /// Number of intervals between min and max
        #[arg(short = 'n', long, default_value = "30")]
        intervals: usize,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            zero_area,
            shared_holes,
            parallel,
        } => {
            let config = ExtractionConfig {
                input: input.display().to_string(),
                output: output.display().to_string(),
                zero_area,
                shared_holes,
                parallel,
            };
            run_extraction(&config)?;
        }
        Commands::Process { config } => {
            let config = ExtractionConfig::from_file(&config)?;
            info!("Configuration: {:?}", config);
            run_extraction(&config)?;
        }
        Commands::Levels { min, max, intervals } => {
            for level in linspace_levels(min, max, intervals) {
                println!("{level}");
            }
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&ExtractionConfig::schema())?);
        }
    }

    Ok(())
}

fn run_extraction(config: &ExtractionConfig) -> Result<()> {
    let contours = ContourSet::from_json_file(&config.input)?;
    info!(
        "Loaded {} bands with {} rings from {}",
        contours.bands.len(),
        contours.ring_count(),
        config.input
    );

    let extractor = config.extractor();
    info!("{}", extractor.info());
    let extraction = extractor.extract(&contours)?;

    for failure in &extraction.failures {
        warn!(
            "Band {} [{}, {}]: {}",
            failure.band, failure.range.vmin, failure.range.vmax, failure.error
        );
    }

    extraction.save_geojson(&config.output)?;
    info!(
        "Wrote {} polygons to {} ({} failures)",
        extraction.records.len(),
        config.output,
        extraction.failures.len()
    );

    Ok(())
}
