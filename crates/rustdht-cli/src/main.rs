//! RustDHT terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Chat with an echo peer through the in-process relay
//! rustdht --echo-peer
//!
//! # Verbose logs on stderr
//! RUST_LOG=rustdht_app=debug rustdht
//! ```

use clap::Parser;
use rustdht_app::{ControllerConfig, Runtime};
use rustdht_cli::{SystemEnv, TerminalDriver};
use rustdht_sim::{SimNetwork, spawn_echo_peer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// RustDHT terminal client
#[derive(Parser, Debug)]
#[command(name = "rustdht")]
#[command(about = "Terminal client for RustDHT peer-to-peer chat")]
#[command(version)]
struct Args {
    /// Address the in-process relay listens on
    #[arg(short, long, default_value = "/ip4/127.0.0.1/udp/9000/webrtc-direct")]
    relay: String,

    /// Seed for peer id generation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Run an echo peer attached to the relay
    #[arg(long)]
    echo_peer: bool,

    /// Name shown for your own messages
    #[arg(long, default_value = "you")]
    local_name: String,

    /// Keep at most this many transcript entries
    #[arg(long)]
    transcript_limit: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the transcript
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let network = SimNetwork::new(args.seed);
    let relay_id = network.spawn_relay(&args.relay)?;
    tracing::info!(relay = %args.relay, %relay_id, "relay listening");

    let _echo = if args.echo_peer {
        let echo = spawn_echo_peer(&network, &args.relay).await?;
        tracing::info!(peer_id = echo.peer_id(), "echo peer attached");
        Some(echo)
    } else {
        None
    };

    let config =
        ControllerConfig { local_peer: args.local_name, transcript_limit: args.transcript_limit };
    let mut runtime =
        Runtime::new(TerminalDriver::stdio(), SystemEnv::new(), config, || network.module());

    runtime.run().await?;

    Ok(())
}
