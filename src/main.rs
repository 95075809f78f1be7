mod cli;
mod core;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::dashboard_cmd::ViewState;
use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::analytics::aggregate::{Dimension, Granularity};
use crate::core::api::client::DEFAULT_SKIP;
use crate::core::api::endpoint::resolve_base_url;
use crate::core::api::ApiClient;
use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "ccost", about = "Cloud cost visibility dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cost API base URL (overrides config and CLOUDCOST_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show total spend, rollups, breakdowns and the 7-day forecast
    Dashboard {
        /// Time bucket (daily|weekly|monthly)
        #[arg(short, long)]
        timeframe: Option<String>,

        /// Grouping dimension (provider|service|environment|project)
        #[arg(short, long)]
        group_by: Option<String>,

        /// Page through every cost entry instead of the first page
        #[arg(short, long)]
        all: bool,
    },
    /// List raw cost entries
    Costs {
        #[arg(long, default_value_t = DEFAULT_SKIP)]
        skip: u32,

        /// Page size (default: api.page_size from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Fetch every page
        #[arg(short, long)]
        all: bool,
    },
    /// View or update the spend alert threshold
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },
    /// View or update the monthly budget
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },
    /// Manage cost optimization recommendations
    Optimize {
        #[command(subcommand)]
        action: OptimizeAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AlertAction {
    /// Show the threshold and whether current spend exceeds it
    Show {
        /// Evaluate against every cost entry instead of the first page
        #[arg(short, long)]
        all: bool,
    },
    /// Set the threshold amount
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
enum BudgetAction {
    /// Show budget usage and per-service projections
    Show,
    /// Set the monthly budget amount
    Set {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
enum OptimizeAction {
    /// List recommendations with savings summary
    List,
    /// Mark a recommendation as applied
    Apply { id: i64 },
    /// Mark a recommendation as ignored
    Ignore { id: i64 },
    /// Ask the server to generate new recommendations
    Generate,
    /// Interactively pick pending recommendations to apply
    Review,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the effective configuration
    Show,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "ccost=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn view_state(
    config: &AppConfig,
    timeframe: Option<&str>,
    group_by: Option<&str>,
    fetch_all: bool,
) -> anyhow::Result<ViewState> {
    let timeframe_id = timeframe.unwrap_or(&config.dashboard.timeframe);
    let group_by_id = group_by.unwrap_or(&config.dashboard.group_by);
    let timeframe = Granularity::from_id(timeframe_id).with_context(|| {
        format!("Unknown timeframe '{}' (expected daily|weekly|monthly)", timeframe_id)
    })?;
    let group_by = Dimension::from_id(group_by_id).with_context(|| {
        format!(
            "Unknown grouping '{}' (expected provider|service|environment|project)",
            group_by_id
        )
    })?;
    Ok(ViewState {
        timeframe,
        group_by,
        fetch_all,
        page_size: config.api.page_size,
        top_services: config.dashboard.top_services,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        AppConfig::default()
    });

    let format = if cli.json {
        OutputFormat::Json
    } else {
        let id = cli
            .format
            .as_deref()
            .unwrap_or(&config.settings.default_format);
        OutputFormat::from_id(id)
            .with_context(|| format!("Unknown format '{}' (expected text|json)", id))?
    };
    let output_opts = OutputOptions {
        format,
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color, &config.settings.color),
        verbose: cli.verbose,
    };

    if let Some(Commands::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts),
            ConfigAction::Check => cli::config_cmd::check(&output_opts),
            ConfigAction::Show => cli::config_cmd::show(&config, &output_opts),
        };
    }

    let base_url = resolve_base_url(cli.api_url.as_deref(), &config.api.url);
    let client = ApiClient::new(&base_url, Duration::from_secs(config.api.timeout_secs))?;
    debug!(api = client.base_url(), "using cost API");

    match cli.command {
        None => {
            let view = view_state(&config, None, None, false)?;
            cli::dashboard_cmd::run(&client, view, &output_opts).await?;
        }
        Some(Commands::Dashboard {
            timeframe,
            group_by,
            all,
        }) => {
            let view = view_state(&config, timeframe.as_deref(), group_by.as_deref(), all)?;
            cli::dashboard_cmd::run(&client, view, &output_opts).await?;
        }
        Some(Commands::Costs { skip, limit, all }) => {
            let limit = limit.unwrap_or(config.api.page_size);
            cli::costs_cmd::run(&client, skip, limit, all, &output_opts).await?;
        }
        Some(Commands::Alert { action }) => match action {
            AlertAction::Show { all } => {
                let view = view_state(&config, None, None, all)?;
                cli::alert_cmd::show(&client, &view, &output_opts).await?
            }
            AlertAction::Set { amount } => {
                cli::alert_cmd::set(&client, amount, &output_opts).await?
            }
        },
        Some(Commands::Budget { action }) => match action {
            BudgetAction::Show => cli::budget_cmd::show(&client, &output_opts).await?,
            BudgetAction::Set { amount } => {
                cli::budget_cmd::set(&client, amount, &output_opts).await?
            }
        },
        Some(Commands::Optimize { action }) => match action {
            OptimizeAction::List => cli::optimize_cmd::list(&client, &output_opts).await?,
            OptimizeAction::Apply { id } => {
                cli::optimize_cmd::apply(&client, id, &output_opts).await?
            }
            OptimizeAction::Ignore { id } => {
                cli::optimize_cmd::ignore(&client, id, &output_opts).await?
            }
            OptimizeAction::Generate => cli::optimize_cmd::generate(&client, &output_opts).await?,
            OptimizeAction::Review => cli::optimize_cmd::review(&client, &output_opts).await?,
        },
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}
