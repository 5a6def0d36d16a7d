//! evalwire server binary.
//!
//! Binds a localhost TCP listener, announces the chosen port on stdout,
//! then serves exactly one client connection with the built-in evaluator.
//! Logs go to stderr so stdout stays a clean discovery channel.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use evalwire::eval::BasicEvaluator;
use evalwire::{Server, DEFAULT_BIND_ADDR};

#[derive(Parser, Debug)]
#[command(name = "evalwire")]
#[command(about = "Remote code-execution bridge over a single TCP connection")]
struct Args {
    /// Address to bind (port 0 picks an ephemeral port)
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging on stderr; stdout carries only the port announcement line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let server = Server::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    server
        .announce_port()
        .context("Failed to announce port on stdout")?;

    server
        .serve(BasicEvaluator::new())
        .await
        .context("Session failed")?;

    Ok(())
}
