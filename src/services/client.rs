// src/services/client.rs
use log::{debug, error, info};
use reqwest::{Client, Response};

use crate::error::WorkflowError;
use crate::models::{CanonicalPayload, DscrResult};

pub const COMPUTE_PATH: &str = "/menus/dscr/";
pub const DOCUMENT_PATH: &str = "/menus/dscr_exact/";

/// HTTP boundary to the remote calculation service.
#[derive(Clone)]
pub struct DscrClient {
    http: Client,
    base_url: String,
}

impl DscrClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        DscrClient {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, payload: &CanonicalPayload) -> Result<Response, WorkflowError> {
        let url = self.endpoint(path);
        info!("POST {}", url);
        debug!("Payload: {:?}", payload);

        let response = self.http.post(&url).json(payload).send().await?;
        debug!("{} answered {}", url, response.status());
        Ok(response)
    }

    /// Submits the payload for a DSCR computation.
    pub async fn compute(&self, payload: &CanonicalPayload) -> Result<DscrResult, WorkflowError> {
        let response = self.post(COMPUTE_PATH, payload).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!("Compute endpoint returned {}: {}", status, body);
            return Err(WorkflowError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let result: DscrResult = serde_json::from_slice(&body)?;
        Ok(result)
    }

    /// Requests the filled-in document for the payload.
    pub async fn fetch_document(&self, payload: &CanonicalPayload) -> Result<Vec<u8>, WorkflowError> {
        let response = self.post(DOCUMENT_PATH, payload).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!("Document endpoint returned {}: {}", status, body);
            return Err(WorkflowError::DocumentGeneration {
                status: status.as_u16(),
                body,
            });
        }

        let document = response.bytes().await?;
        info!("Received document ({} bytes)", document.len());
        Ok(document.to_vec())
    }
}
