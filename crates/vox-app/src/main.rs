//! Vox application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build a deliverer over the system clipboard and keyboard
//! 4. Deliver the text once, or print the plan with `--dry-run`

mod cli;

use std::io::Read;

use clap::Parser;

use vox_core::config::VoxConfig;
use vox_delivery::{Deliverer, SystemBackend};

use cli::CliArgs;

/// Text from `--text`, or all of stdin without its trailing newline.
fn read_text(args: &CliArgs) -> std::io::Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = VoxConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Vox v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    let text = read_text(&args)?;
    let options = args.delivery_options(config.delivery.auto_paste)?;

    let backend = SystemBackend::new(&config.automation);
    let deliverer = Deliverer::new(backend, &config);

    if args.dry_run {
        let plan = deliverer.plan(&text, &options);
        println!("protocol: {}", plan.protocol);
        for (step, action) in plan.actions.iter().enumerate() {
            println!("{:>3}  {}", step, action);
        }
        return Ok(());
    }

    if let Err(e) = deliverer.deliver(&text, &options).await {
        tracing::error!(error = %e, "Delivery failed");
        return Err(e.into());
    }

    Ok(())
}
