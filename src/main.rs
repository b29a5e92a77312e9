use clap::Parser;
use simrec::{LoaderConfig, Pipeline, PipelineConfig, RecommendConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Precompute content-based recommendations from a CSV catalog
#[derive(Parser, Debug)]
#[command(name = "simrec")]
#[command(about = "Precompute TF-IDF recommendations for a static site", long_about = None)]
struct Args {
    /// Path to the source CSV (e.g. movies_metadata.csv)
    #[arg(long)]
    csv: PathBuf,

    /// Output directory to save the recommendations file into
    #[arg(long, default_value = "site")]
    out_dir: PathBuf,

    /// Name of the JSON file written inside the output directory
    #[arg(long, default_value = "recommendations.json")]
    file_name: String,

    /// Max rows to process, 0 for no cap
    #[arg(long, default_value_t = 1000)]
    max_rows: usize,

    /// Top N recommendations per item, 0 writes empty lists
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Drop terms present in more than this fraction of descriptions
    #[arg(long, default_value_t = 0.85)]
    max_df: f32,

    /// Accepted for compatibility; the pipeline is deterministic
    #[arg(long, default_value_t = 42)]
    random_seed: u64,

    /// Take the year from a "(1999)" group in the title when there is no year column
    #[arg(long)]
    year_from_title: bool,

    /// Write bare title lists instead of records with scores and metadata
    #[arg(long)]
    minimal: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source: self.csv.clone(),
            out_dir: self.out_dir.clone(),
            file_name: self.file_name.clone(),
            loader: LoaderConfig {
                max_rows: (self.max_rows > 0).then_some(self.max_rows),
                year_from_title: self.year_from_title,
            },
            recommend: RecommendConfig {
                top_n: self.top_n,
                max_df: self.max_df,
                verbose_output: !self.minimal,
                ..Default::default()
            },
            random_seed: self.random_seed,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simrec v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::new(args.pipeline_config());
    match pipeline.run() {
        Ok(path) => {
            info!("Done: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
