use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use avatar_studio::{
    config::AppConfig,
    models::{
        generation::{Dimension, GenerationRequest},
        job::JobStatus,
    },
    services::{
        gateway::SubmissionGateway,
        heygen::HeyGenClient,
        poller::{PollerSettings, PollerSlot},
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let Some(request_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: generate <request.json>");
        return ExitCode::from(2);
    };

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    let request = match load_request(&request_path) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(path = %request_path.display(), error = %e, "Failed to read generation request");
            return ExitCode::FAILURE;
        }
    };

    let heygen =
        Arc::new(HeyGenClient::new(&config).expect("Failed to initialize video service client"));
    let gateway = SubmissionGateway::new(
        heygen.clone(),
        Dimension {
            width: config.video_width,
            height: config.video_height,
        },
    );

    let job_id = match gateway.submit(&request).await {
        Ok(job_id) => job_id,
        Err(e) => {
            tracing::error!(error = %e, "Submission failed");
            return ExitCode::FAILURE;
        }
    };

    let mut slot = PollerSlot::new();
    let handle = slot.track(
        job_id.clone(),
        heygen,
        PollerSettings::from_config(&config),
        |video_url| println!("{video_url}"),
    );

    let mut updates = handle.subscribe();
    let watch_updates = async {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            tracing::info!(
                job_id = %view.job_id,
                status = %view.status,
                error = view.error.as_deref().unwrap_or_default(),
                "Job update"
            );
        }
    };

    tokio::select! {
        _ = watch_updates => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(job_id = %job_id, "Interrupted, cancelling status polling");
            slot.clear();
            return ExitCode::from(130);
        }
    }

    let Some(handle) = slot.active_mut() else {
        return ExitCode::FAILURE;
    };
    let view = handle.wait().await;

    if let Some(anomaly) = view.anomaly {
        tracing::warn!(job_id = %view.job_id, anomaly = ?anomaly, "Job finished with an anomaly");
    }

    match (view.status, view.video_url) {
        (JobStatus::Completed, Some(_)) => ExitCode::SUCCESS,
        _ => {
            tracing::error!(
                job_id = %view.job_id,
                status = %view.status,
                error = view.error.as_deref().unwrap_or_default(),
                "Video generation did not complete"
            );
            ExitCode::FAILURE
        }
    }
}

fn load_request(path: &Path) -> Result<GenerationRequest, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
