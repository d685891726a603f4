use std::sync::Arc;

use garde::Validate;

use crate::models::generation::{Dimension, GenerateVideoPayload, GenerationRequest, JobId};
use crate::services::heygen::{HeyGenClient, HeyGenError};

/// Validates generation requests and forwards them to the remote service.
///
/// A request is checked before anything goes on the wire; a request that
/// fails validation never reaches the network. Exactly one upstream call is
/// made per valid request and failures are returned as-is, never retried.
#[derive(Clone)]
pub struct SubmissionGateway {
    client: Arc<HeyGenClient>,
    dimension: Dimension,
}

impl SubmissionGateway {
    pub fn new(client: Arc<HeyGenClient>, dimension: Dimension) -> Self {
        Self { client, dimension }
    }

    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobId, HeyGenError> {
        if let Err(report) = request.validate() {
            let message = report.to_string().trim().to_string();
            tracing::info!(reason = %message, "Rejected generation request");
            return Err(HeyGenError::Validation(message));
        }

        metrics::counter!("video_submissions_total").increment(1);

        let payload = GenerateVideoPayload::from_request(request, self.dimension);
        match self.client.generate_video(&payload).await {
            Ok(job_id) => {
                tracing::info!(
                    job_id = %job_id,
                    avatar_id = %request.avatar_id,
                    voice_id = %request.voice_id,
                    script_chars = request.script.chars().count(),
                    "Video generation submitted"
                );
                Ok(job_id)
            }
            Err(e) => {
                metrics::counter!("video_submissions_failed").increment(1);
                tracing::error!(error = %e, avatar_id = %request.avatar_id, "Video generation submit failed");
                Err(e)
            }
        }
    }
}
