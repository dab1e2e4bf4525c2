use anyhow::Context;
use clap::Parser;
use pir_dashboard::{cli, client, config, editor, render};
use cli::{Cli, Commands};
use client::ApiClient;
use config::Config;
use pir_dashboard_common::{DashboardStore, MaterialRecord};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let mut config = Config::load().context("failed to load config")?;

    match cli.command {
        Commands::Show => {
            let client = ApiClient::new(config.resolve_endpoint(cli.endpoint.as_deref()))?;
            let store = load_store(&client).await?;
            let Some(payload) = store.payload() else {
                return Ok(());
            };

            println!("PIR DASHBOARD PRO\n");
            println!("{}", render::render_general(&payload.general_data));
            println!("Findings:");
            print!("{}", render::render_findings(&payload.findings));
        }

        Commands::Finding { target } => {
            let client = ApiClient::new(config.resolve_endpoint(cli.endpoint.as_deref()))?;
            let mut store = load_store(&client).await?;
            cli::select_target(&mut store, &target)?;

            if let Some(finding) = store.selected_finding() {
                println!("{}", render::render_finding_detail(finding));
            }
            print!("{}", render::render_materials(store.session()));
        }

        Commands::Edit { target } => {
            let client = ApiClient::new(config.resolve_endpoint(cli.endpoint.as_deref()))?;
            let mut store = load_store(&client).await?;
            cli::select_target(&mut store, &target)?;

            if let Some(finding) = store.selected_finding() {
                println!("{}", render::render_finding_detail(finding));
            }
            editor::run_interactive_edit(&mut store, &client).await?;
        }

        Commands::Pull { target, output } => {
            let client = ApiClient::new(config.resolve_endpoint(cli.endpoint.as_deref()))?;
            let mut store = load_store(&client).await?;
            cli::select_target(&mut store, &target)?;

            // サーバー側の最新値（空なら空配列）
            let materials = match (store.payload(), store.selected_finding()) {
                (Some(payload), Some(finding)) => payload.materials_for(&finding.finding).to_vec(),
                _ => Vec::new(),
            };
            let json = serde_json::to_string_pretty(&materials)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("✔ {} records written: {}", materials.len(), path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Sync { target, input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let materials: Vec<MaterialRecord> = serde_json::from_str(&content)
                .with_context(|| format!("parse {}", input.display()))?;

            let client = ApiClient::new(config.resolve_endpoint(cli.endpoint.as_deref()))?;
            let mut store = load_store(&client).await?;
            cli::select_target(&mut store, &target)?;
            store.session_mut().seed(Some(&materials));

            let rows = store.session().materials().len();
            println!("Synchronizing {} records...", rows);
            let response = store.save(&client).await?;
            println!("✔ Sync Successful! (status: {})", response.status);
            if let Some(err) = store.load_error() {
                println!("Reload failed: {}", err);
            }
        }

        Commands::Config { set_endpoint, clear_endpoint, show } => {
            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                config.save()?;
                println!("✔ Endpoint saved");
            }

            if clear_endpoint {
                config.endpoint = None;
                config.save()?;
                println!("✔ Endpoint cleared");
            }

            if show {
                println!("Config:");
                println!("  File:     {}", Config::config_path()?.display());
                println!(
                    "  Endpoint: {}",
                    config.endpoint.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Effective: {}",
                    config.resolve_endpoint(cli.endpoint.as_deref())
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "pir_dashboard=debug,pir_dashboard_common=debug"
    } else {
        "pir_dashboard=warn,pir_dashboard_common=warn"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn load_store(client: &ApiClient) -> anyhow::Result<DashboardStore> {
    eprintln!("Initializing data link... ({})", client.endpoint());
    let mut store = DashboardStore::new();
    store
        .load(client)
        .await
        .context("failed to load dashboard")?;
    Ok(store)
}
