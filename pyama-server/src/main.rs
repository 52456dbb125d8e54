//! PyAMA viewer and analysis HTTP service.
//!
//! Serves the interactive viewer session (coordinate navigation, particle
//! enablement) and dispatches pipeline stages (segmentation, tracking,
//! square ROI generation, export) as background jobs over a configured
//! external pipeline program.

mod error;
mod metadata;
mod render;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use pyama_pipeline::JobEvent;

use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pyama-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// External program that executes pipeline stages (`--job <json>`) and
    /// reports dataset extents (`--describe <path>`). Without it, stage
    /// requests are rejected at dispatch and extents come from the output
    /// tree alone.
    #[arg(long)]
    pipeline_cmd: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let (state, events) = AppState::new(args.pipeline_cmd);
    thread::spawn(move || drain_job_events(&events));

    let app = routes::router(state);
    let addr = format!("{}:{}", args.host, args.port);
    info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Logs job outcomes arriving on the dispatcher's out-of-band channel.
/// The accept acknowledgment never carries completion; this is the only
/// place stage success or failure becomes visible.
fn drain_job_events(events: &Receiver<JobEvent>) {
    while let Ok(event) = events.recv() {
        match event {
            JobEvent::Finished { id, stage, elapsed } => {
                info!(id, stage, ?elapsed, "job finished");
            }
            JobEvent::Failed { id, stage, error } => {
                error!(id, stage, %error, "job failed");
            }
        }
    }
}
