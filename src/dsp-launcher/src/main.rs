//! DSP Launcher — plan, forecast and launch connected-TV campaigns.
//!
//! Runs either as a REST server (`serve`) or as a one-shot command against
//! the advertising API. One-shot commands print JSON to stdout.

use anyhow::Context;
use campaign_api::ApiServer;
use campaign_core::campaign::{CampaignDraft, GeoInput, Targeting};
use campaign_core::config::AppConfig;
use campaign_core::report::DateRange;
use campaign_core::targeting::Platform;
use campaign_dsp::{Credentials, DspClient};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "dsp-launcher")]
#[command(about = "Plan, forecast and launch connected-TV campaigns on a demand-side platform")]
#[command(version)]
struct Cli {
    /// TOML configuration file, overlaid by DSP_LAUNCHER__* variables
    #[arg(long, global = true)]
    config: Option<String>,

    /// OAuth client id (overrides config)
    #[arg(long, global = true, env = "DSP_LAUNCHER__CREDENTIALS__CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// OAuth client secret (overrides config)
    #[arg(long, global = true, env = "DSP_LAUNCHER__CREDENTIALS__CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Long-lived refresh token (overrides config)
    #[arg(long, global = true, env = "DSP_LAUNCHER__CREDENTIALS__REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: Option<String>,

    /// Advertising API base URL (overrides config)
    #[arg(long, global = true, env = "DSP_LAUNCHER__DSP__API_BASE_URL")]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the line items a draft would create, without calling the API
    Plan {
        /// Campaign draft JSON file
        draft: PathBuf,
    },

    #[command(flatten)]
    Remote(RemoteCommands),
}

/// Commands that talk to the advertising API and need credentials.
#[derive(Subcommand, Debug)]
enum RemoteCommands {
    /// Start the REST API and metrics exporter
    Serve {
        /// HTTP port (overrides config)
        #[arg(long, env = "DSP_LAUNCHER__API__HTTP_PORT")]
        http_port: Option<u16>,
    },

    /// Check that the credentials can obtain a token and list profiles
    Validate,

    /// List the entities visible to the credentials
    Entities,

    /// List the advertisers visible to the credentials
    Advertisers,

    /// Create a campaign and all of its line items
    Submit {
        /// Campaign draft JSON file
        draft: PathBuf,
    },

    /// Forecast reach and impressions for a draft
    Forecast {
        /// Campaign draft JSON file
        draft: PathBuf,
    },

    /// Wait for an existing report job and print its payload
    Report {
        report_id: String,

        /// Advertiser profile scope
        #[arg(long)]
        advertiser_id: Option<String>,
    },

    /// Run the daily performance report for a campaign
    Performance {
        campaign_id: String,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,

        /// Advertiser profile scope
        #[arg(long)]
        advertiser_id: Option<String>,
    },

    /// List inventory available for a targeting
    Inventory {
        /// Comma-separated postal codes
        #[arg(long, default_value = "")]
        postal_codes: String,

        /// Comma-separated DMAs
        #[arg(long, default_value = "")]
        dmas: String,

        #[arg(long, value_enum, default_value = "ctv")]
        platform: PlatformArg,

        /// Advertiser profile scope
        #[arg(long)]
        advertiser_id: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformArg {
    Ctv,
    Mobile,
    Desktop,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ctv => Platform::ConnectedTv,
            PlatformArg::Mobile => Platform::Mobile,
            PlatformArg::Desktop => Platform::Desktop,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dsp_launcher=info,campaign_dsp=info,tower_http=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(client_id) = cli.client_id {
        config.credentials.client_id = client_id;
    }
    if let Some(client_secret) = cli.client_secret {
        config.credentials.client_secret = client_secret;
    }
    if let Some(refresh_token) = cli.refresh_token {
        config.credentials.refresh_token = refresh_token;
    }
    if let Some(url) = cli.api_base_url {
        config.dsp.api_base_url = url;
    }

    match cli.command {
        // Planning is local; no credentials needed.
        Commands::Plan { draft } => {
            let draft = read_draft(&draft)?;
            print_json(&campaign_dsp::planner::plan(&draft))
        }
        Commands::Remote(command) => run_remote(command, config).await,
    }
}

async fn run_remote(command: RemoteCommands, mut config: AppConfig) -> anyhow::Result<()> {
    let missing = config.credentials.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("missing credentials: {}", missing.join(", "));
    }

    let credentials = Credentials::new(
        config.credentials.client_id.clone(),
        config.credentials.client_secret.clone(),
        config.credentials.refresh_token.clone(),
    );
    let client = Arc::new(DspClient::from_config(&config, credentials)?);

    info!(
        api_base_url = %config.dsp.api_base_url,
        command = ?command,
        "Configuration loaded"
    );

    match command {
        RemoteCommands::Serve { http_port } => {
            if let Some(port) = http_port {
                config.api.http_port = port;
            }
            serve(config, client).await
        }
        RemoteCommands::Validate => {
            let valid = client.validate_credentials().await;
            print_json(&serde_json::json!({ "valid": valid }))?;
            if !valid {
                anyhow::bail!("credentials rejected");
            }
            Ok(())
        }
        RemoteCommands::Entities => print_json(&client.list_entities().await?),
        RemoteCommands::Advertisers => print_json(&client.list_advertisers().await?),
        RemoteCommands::Submit { draft } => {
            let draft = read_draft(&draft)?;
            match client.submit_campaign(&draft).await {
                Ok(receipt) => print_json(&receipt),
                Err(e) => {
                    error!(code = e.code(), error = %e, "Campaign submission failed");
                    Err(e.into())
                }
            }
        }
        RemoteCommands::Forecast { draft } => {
            let draft = read_draft(&draft)?;
            print_json(&client.forecast(&draft).await)
        }
        RemoteCommands::Report {
            report_id,
            advertiser_id,
        } => {
            let payload = client
                .await_report(&report_id, advertiser_id, interrupted())
                .await?;
            print_json(&payload)
        }
        RemoteCommands::Performance {
            campaign_id,
            start,
            end,
            advertiser_id,
        } => {
            let range = DateRange {
                start_date: start,
                end_date: end,
            };
            let payload = client
                .campaign_performance(&campaign_id, range, advertiser_id, interrupted())
                .await?;
            print_json(&payload)
        }
        RemoteCommands::Inventory {
            postal_codes,
            dmas,
            platform,
            advertiser_id,
        } => {
            let targeting = Targeting {
                platform: platform.into(),
                geo_input: GeoInput { postal_codes, dmas },
                ..Default::default()
            };
            print_json(&client.available_inventory(&targeting, advertiser_id).await)
        }
    }
}

async fn serve(config: AppConfig, client: Arc<DspClient>) -> anyhow::Result<()> {
    let api_server = ApiServer::new(config, client);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("DSP Launcher is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await
}

/// Resolves on Ctrl-C.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn read_draft(path: &Path) -> anyhow::Result<CampaignDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read draft {}", path.display()))?;
    let draft: CampaignDraft =
        serde_json::from_str(&raw).with_context(|| format!("invalid campaign draft {}", path.display()))?;
    draft.validate()?;
    Ok(draft)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
