use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::generation::Dimension;
use crate::services::{gateway::SubmissionGateway, heygen::HeyGenClient};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub heygen: Arc<HeyGenClient>,
    pub gateway: SubmissionGateway,
    pub page_size: usize,
}

impl AppState {
    pub fn new(heygen: HeyGenClient, config: &AppConfig) -> Self {
        let heygen = Arc::new(heygen);
        let dimension = Dimension {
            width: config.video_width,
            height: config.video_height,
        };

        Self {
            gateway: SubmissionGateway::new(heygen.clone(), dimension),
            heygen,
            page_size: config.page_size,
        }
    }
}
