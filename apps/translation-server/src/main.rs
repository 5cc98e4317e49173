use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use service_bootstrap::{AppConfig, CliArgs};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use translation::{InMemoryTranslation, MODULE_NAME, TranslationConfig, TranslationModule};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Translation Server - translation use case over HTTP, gRPC and AMQP-RPC
#[derive(Parser)]
#[command(name = "translation-server")]
#[command(about = "Translation Server - translation use case over HTTP, gRPC and AMQP-RPC")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // defaults -> YAML (if provided) -> env (APP__*) -> CLI overrides
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);
    service_bootstrap::init_logging(&config.logging);

    let module_cfg: TranslationConfig = config.module_config(MODULE_NAME)?;
    config.set_module_config(MODULE_NAME, &module_cfg)?;

    if args.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    let command = cli.command.unwrap_or(Commands::Run);
    if matches!(command, Commands::Check) {
        tracing::info!("Checking configuration...");
    }
    validate_module_config(&module_cfg)?;

    match command {
        Commands::Run => run_server(&config, module_cfg).await,
        Commands::Check => {
            println!("Configuration is valid");
            println!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

/// Reject settings the servers cannot run with. Shared by `run` and `check`.
fn validate_module_config(module_cfg: &TranslationConfig) -> Result<()> {
    parse_addr("http.bind_addr", &module_cfg.http.bind_addr)?;
    parse_addr("grpc.listen_addr", &module_cfg.grpc.listen_addr)?;
    anyhow::ensure!(
        module_cfg.request_timeout_ms > 0,
        "request_timeout_ms must be greater than zero"
    );
    Ok(())
}

fn parse_addr(key: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .with_context(|| format!("invalid {key} '{value}'"))
}

async fn run_server(config: &AppConfig, module_cfg: TranslationConfig) -> Result<()> {
    tracing::info!(name = %config.server.name, "Translation Server starting");

    let shutdown = CancellationToken::new();
    let max_in_flight = module_cfg.rpc.max_in_flight.max(1);
    let module = Arc::new(TranslationModule::new(
        module_cfg,
        Arc::new(InMemoryTranslation::new()),
        shutdown.clone(),
    ));

    let rpc = module.rpc_server()?;
    // The broker consumer feeds this channel; until one is attached the
    // RPC server only idles.
    let (rpc_tx, rpc_rx) = mpsc::channel(max_in_flight);

    let mut servers = JoinSet::new();
    {
        let module = Arc::clone(&module);
        let cancel = shutdown.clone();
        servers.spawn(async move { module.serve_http(cancel).await.context("HTTP server") });
    }
    {
        let module = Arc::clone(&module);
        let cancel = shutdown.clone();
        servers.spawn(async move { module.serve_grpc(cancel).await.context("gRPC server") });
    }
    {
        let cancel = shutdown.clone();
        servers.spawn(async move { rpc.serve(rpc_rx, cancel).await.context("RPC server") });
    }

    let outcome = tokio::select! {
        res = service_bootstrap::wait_for_shutdown() => res,
        Some(joined) = servers.join_next() => match joined {
            Ok(Ok(())) => Err(anyhow::anyhow!("a server stopped unexpectedly")),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(e.into()),
        },
    };

    shutdown.cancel();
    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "server failed during shutdown"),
            Err(e) => tracing::error!(error = %e, "server task panicked"),
        }
    }
    drop(rpc_tx);

    match &outcome {
        Ok(()) => tracing::info!("Translation Server stopped"),
        Err(e) => tracing::error!(error = %e, "Translation Server stopped with error"),
    }
    outcome
}
