use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use lib::client::CommuneClient;
use lib::config::{self, Config};
use lib::host::ItemConsumer;

#[derive(Parser)]
#[command(name = "commune")]
#[command(about = "Commune CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: COMMUNE_CONFIG_PATH or ~/.commune/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Run the inbound webhook receiver. Registers the inbox webhook on start
    /// and removes it on shutdown; received events are printed as JSON lines.
    Receiver {
        /// Config file path (default: COMMUNE_CONFIG_PATH or ~/.commune/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Receiver port (default from config or 15252)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Execute one operation over a batch of items and print the output records.
    Exec {
        /// Config file path (default: COMMUNE_CONFIG_PATH or ~/.commune/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Resource selector (inbox, message, thread, search, delivery); set on every item
        #[arg(long, short)]
        resource: Option<String>,

        /// Operation selector (e.g. send, list, setWebhook); set on every item
        #[arg(long, short)]
        operation: Option<String>,

        /// Parameters for a single item as a JSON object
        #[arg(long, value_name = "JSON", conflicts_with = "items")]
        params: Option<String>,

        /// Path to a file with one JSON parameter object per line (a batch)
        #[arg(long, value_name = "PATH")]
        items: Option<PathBuf>,

        /// Emit an { "error": ... } record for a failing item instead of aborting the batch
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// List inboxes as selector options (label, value, description).
    Inboxes {
        /// Config file path (default: COMMUNE_CONFIG_PATH or ~/.commune/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Verify the configured API key against the Commune API.
    TestCredentials {
        /// Config file path (default: COMMUNE_CONFIG_PATH or ~/.commune/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print a descriptor (parameter-form metadata) as JSON.
    Describe {
        #[arg(value_enum)]
        target: DescribeTarget,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DescribeTarget {
    Node,
    Trigger,
    Credentials,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("commune {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Receiver { config, port }) => {
            if let Err(e) = run_receiver(config, port).await {
                log::error!("receiver failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Exec {
            config,
            resource,
            operation,
            params,
            items,
            continue_on_fail,
        }) => {
            if let Err(e) = run_exec(config, resource, operation, params, items, continue_on_fail).await
            {
                log::error!("exec failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Inboxes { config }) => {
            if let Err(e) = run_inboxes(config).await {
                log::error!("inboxes failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::TestCredentials { config }) => {
            if let Err(e) = run_test_credentials(config).await {
                log::error!("credential test failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Describe { target }) => {
            if let Err(e) = run_describe(target) {
                log::error!("describe failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    let dir = config::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

/// Consumer that prints each produced workflow item as a JSON line.
struct PrintConsumer;

#[async_trait]
impl ItemConsumer for PrintConsumer {
    async fn deliver(&self, item: serde_json::Value) {
        println!("{}", item);
    }
}

async fn run_receiver(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, _path) = config::load_config(config_path)?;
    if let Some(p) = port {
        config.receiver.port = p;
    }
    log::info!(
        "starting receiver on {}:{}",
        config.receiver.bind,
        config.receiver.port
    );
    lib::receiver::run_receiver(config, Arc::new(PrintConsumer)).await
}

fn client_from_config(config: &Config) -> anyhow::Result<CommuneClient> {
    let api_key = config::resolve_api_key(config).ok_or_else(|| {
        anyhow::anyhow!("no API key configured (set credentials.apiKey or COMMUNE_API_KEY)")
    })?;
    Ok(CommuneClient::new(api_key, None))
}

async fn run_exec(
    config_path: Option<PathBuf>,
    resource: Option<String>,
    operation: Option<String>,
    params: Option<String>,
    items_path: Option<PathBuf>,
    continue_on_fail: bool,
) -> anyhow::Result<()> {
    let (config, _path) = config::load_config(config_path)?;
    let client = client_from_config(&config)?;

    let mut items: Vec<serde_json::Value> = match items_path {
        Some(path) => std::fs::read_to_string(&path)?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?,
        None => {
            let raw = params.as_deref().unwrap_or("{}");
            vec![serde_json::from_str(raw)?]
        }
    };

    for item in items.iter_mut() {
        if let Some(map) = item.as_object_mut() {
            if let Some(ref r) = resource {
                map.insert("resource".to_string(), serde_json::Value::String(r.clone()));
            }
            if let Some(ref o) = operation {
                map.insert(
                    "operation".to_string(),
                    serde_json::Value::String(o.clone()),
                );
            }
        }
    }

    let records = lib::node::execute(&client, &items, continue_on_fail).await?;
    for record in records {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

async fn run_inboxes(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, _path) = config::load_config(config_path)?;
    let client = client_from_config(&config)?;
    let options = lib::node::load_inbox_options(&client).await?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

async fn run_test_credentials(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, _path) = config::load_config(config_path)?;
    let client = client_from_config(&config)?;
    lib::credentials::test_credentials(&client).await?;
    println!("credentials ok");
    Ok(())
}

fn run_describe(target: DescribeTarget) -> anyhow::Result<()> {
    let json = match target {
        DescribeTarget::Node => serde_json::to_string_pretty(&lib::node::node_descriptor())?,
        DescribeTarget::Trigger => {
            serde_json::to_string_pretty(&lib::trigger::trigger_descriptor())?
        }
        DescribeTarget::Credentials => {
            serde_json::to_string_pretty(&lib::credentials::credential_descriptor())?
        }
    };
    println!("{}", json);
    Ok(())
}
