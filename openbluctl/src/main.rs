//! OpenBlu CLI
//!
//! Command-line client for the OpenBlu VPN server directory.

use clap::Parser;
use openbluctl::cli::{
    build_config, dispatch, exit_code, generate_completion, prompt_for_key, Cli,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completion(shell);
        return;
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(exit_code(&e));
        }
    };

    init_tracing(config.verbose);
    tracing::debug!(endpoint = %config.endpoint, format = %config.output_format, "configuration loaded");

    let out_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine the working directory: {}", e);
            std::process::exit(7);
        }
    };

    if let Err(e) = dispatch(&cli, &config, &out_dir, prompt_for_key).await {
        eprintln!("Error: {}", e);
        if config.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the verbosity.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("openbluctl=debug,openblu_core=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
