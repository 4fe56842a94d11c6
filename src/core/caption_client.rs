use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{CaptionResponse, IMAGE_FIELD};
use crate::core::constants::CAPTION_ENDPOINT;
use crate::core::error::CaptionError;
use crate::core::image::{MediaType, SelectedImage};
use crate::utils::url::construct_api_url;

/// Everything the HTTP task needs for one submission.
#[derive(Debug, Clone)]
pub struct CaptionJob {
    pub request_id: u64,
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Arc<[u8]>,
}

impl CaptionJob {
    pub fn new(request_id: u64, image: &SelectedImage) -> Self {
        Self {
            request_id,
            file_name: image.name.clone(),
            media_type: image.media_type,
            bytes: image.shared_bytes(),
        }
    }
}

/// HTTP client for the captioning endpoint.
#[derive(Clone, Debug)]
pub struct CaptionClient {
    client: reqwest::Client,
    base_url: String,
}

impl CaptionClient {
    /// Build a client. `timeout` of `None` leaves the transport default in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CaptionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        construct_api_url(&self.base_url, CAPTION_ENDPOINT)
    }

    /// Upload the image as a single multipart field and return the caption.
    pub async fn caption(&self, job: &CaptionJob) -> Result<String, CaptionError> {
        let part = Part::bytes(job.bytes.to_vec())
            .file_name(job.file_name.clone())
            .mime_str(job.media_type.mime())?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let url = self.endpoint();
        info!(
            request_id = job.request_id,
            %url,
            bytes = job.bytes.len(),
            media_type = %job.media_type,
            "submitting caption request"
        );

        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Remote {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(
            request_id = job.request_id,
            len = body.len(),
            "caption response received"
        );
        parse_caption_body(&body)
    }
}

fn parse_caption_body(body: &[u8]) -> Result<String, CaptionError> {
    let parsed: CaptionResponse =
        serde_json::from_slice(body).map_err(|err| CaptionError::MalformedResponse {
            detail: format!("response is not valid JSON: {err}"),
        })?;
    parsed
        .into_caption()
        .ok_or_else(|| CaptionError::MalformedResponse {
            detail: "response has no caption field".to_string(),
        })
}

/// Result of one spawned request, tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionUpdate {
    pub request_id: u64,
    pub outcome: Result<String, CaptionError>,
}

/// Runs caption requests as background tasks and reports back over a channel.
#[derive(Clone)]
pub struct CaptionService {
    tx: mpsc::UnboundedSender<CaptionUpdate>,
}

impl CaptionService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CaptionUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Spawn the request. A cancelled token drops the task without reporting.
    pub fn spawn_request(
        &self,
        client: CaptionClient,
        job: CaptionJob,
        cancel_token: CancellationToken,
    ) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(request_id = job.request_id, "caption request dropped on shutdown");
                }
                outcome = client.caption(&job) => {
                    let _ = tx.send(CaptionUpdate {
                        request_id: job.request_id,
                        outcome,
                    });
                }
            }
        });
    }
}
