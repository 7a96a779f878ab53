use anyhow::Context;
use clap::Parser;
use holder_snapshot::config::{Cli, Config};
use holder_snapshot::graphql::GraphqlClient;
use holder_snapshot::snapshot::{take_snapshot, SnapshotRequest};
use holder_snapshot::snapshot_utils::holder_eligibility::HolderEligibility;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    let result = _main().await;
    if let Err(err) = result {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn _main() -> anyhow::Result<()> {
    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let http_filter = tracing_subscriber::filter::Targets::new()
        // connection pool chatter drowns out the page progress
        .with_target("hyper", tracing::Level::WARN)
        .with_target("reqwest", tracing::Level::WARN)
        .with_default(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(http_filter)
        .init();

    let Cli {
        coin_type,
        airdrop,
        exclude,
        config_path,
        output,
    } = Cli::parse();

    let config = match config_path {
        Some(config_path) => {
            tracing::info!("Config file {:?}", config_path);
            Config::load(&config_path)?
        }
        None => Config::default(),
    };
    let output_path = output.unwrap_or_else(|| config.output_path.clone());

    let request = SnapshotRequest {
        airdrop,
        excluded: exclude
            .as_deref()
            .map(HolderEligibility::from_list)
            .unwrap_or_default(),
    };

    tracing::info!("Snapshot of {} from {}", coin_type, config.endpoint);
    let mut client = GraphqlClient::new(
        &config.endpoint,
        &coin_type,
        config.page_size,
        config.request_timeout(),
    )
    .context("Failed to build HTTP Client")?;

    let report = take_snapshot(&mut client, &request)
        .await
        .with_context(|| format!("Snapshot of {coin_type} failed"))?;

    report.dump_to_file(output_path.clone()).with_context(|| {
        format!(
            "Cannot write report to {path}",
            path = output_path.display()
        )
    })?;
    tracing::info!(
        "Wrote {:?} holders holding {} raw units to {:?}",
        report.rows().len(),
        report.total_raw_balance(),
        output_path
    );

    Ok(())
}
