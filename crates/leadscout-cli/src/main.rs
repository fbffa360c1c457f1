mod run;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use leadscout_core::RunConfig;

#[derive(Debug, Parser)]
#[command(name = "leadscout")]
#[command(about = "Find monetized Instagram creator profiles from search results")]
struct Cli {
    /// Run input file (YAML or JSON, camelCase keys)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Search query; repeat to run several. Replaces the input file's queries.
    #[arg(long = "query", short = 'q', value_name = "QUERY")]
    queries: Vec<String>,

    #[arg(long)]
    max_profiles: Option<usize>,

    #[arg(long, conflicts_with = "no_min_followers")]
    min_followers: Option<u64>,

    /// Disable the follower floor.
    #[arg(long)]
    no_min_followers: bool,

    #[arg(long, conflicts_with = "no_activity_filter")]
    active_within_days: Option<u32>,

    /// Disable the last-post recency check.
    #[arg(long)]
    no_activity_filter: bool,

    /// Keep profiles that expose neither an email nor a link.
    #[arg(long)]
    allow_no_contact: bool,

    /// Fetch profile pages through the headless browser.
    #[arg(long, conflicts_with = "no_browser")]
    use_browser: bool,

    /// Fetch profile pages over plain HTTP.
    #[arg(long)]
    no_browser: bool,

    #[arg(long)]
    over_collection_factor: Option<usize>,

    /// Output JSON file; defaults to `LEADSCOUT_OUTPUT_PATH`.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the resolved run and the search URLs without fetching anything.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layer command-line flags over a loaded run configuration.
    fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if !self.queries.is_empty() {
            config.queries.clone_from(&self.queries);
        }
        if let Some(max) = self.max_profiles {
            config.max_profiles = max;
        }
        if self.no_min_followers {
            config.min_followers = None;
        } else if let Some(min) = self.min_followers {
            config.min_followers = Some(min);
        }
        if self.no_activity_filter {
            config.active_within_days = None;
        } else if let Some(days) = self.active_within_days {
            config.active_within_days = Some(days);
        }
        if self.allow_no_contact {
            config.require_link_or_email = false;
        }
        if self.use_browser {
            config.use_browser_for_profiles = true;
        } else if self.no_browser {
            config.use_browser_for_profiles = false;
        }
        if let Some(factor) = self.over_collection_factor {
            config.over_collection_factor = factor;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = leadscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(app_config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let run_config = cli.apply_overrides(leadscout_core::load_run_config(cli.input.as_deref())?);
    if let Err(e) = run_config.validate() {
        tracing::error!(error = %e, "invalid run configuration");
        return Err(e.into());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| app_config.output_path.clone());

    if cli.dry_run {
        run::print_dry_run(&run_config, &output);
        return Ok(());
    }

    run::run_leads(&app_config, &run_config, &output).await
}

#[cfg(test)]
mod tests;
