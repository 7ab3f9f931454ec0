use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weekly_listens::app::App;
use weekly_listens::config;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// ListenBrainz username whose listen history is inspected.
    #[clap(long, env = "LISTENBRAINZ_USERNAME")]
    pub username: Option<String>,

    /// Path to the line-delimited file of previously suggested track ids.
    #[clap(long, env = "IGNORED_TRACKS_FILE")]
    pub ignored_tracks_file: Option<PathBuf>,

    /// How many days of listen history to inspect.
    #[clap(long, env = "LOOKBACK_DAYS", default_value_t = 30)]
    pub lookback_days: u32,

    /// Select and log a track without posting it or updating the ignored list.
    #[clap(long, env = "DRY_RUN")]
    pub dry_run: bool,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            username: args.username.clone(),
            ignored_tracks_file: args.ignored_tracks_file.clone(),
            lookback_days: args.lookback_days,
            dry_run: args.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    App::new(app_config).run(&mut rand::rng()).await
}
