//! In-process stand-in for the calculation service.

use serde_json::Value;
use srwto_dscr::services::client::{COMPUTE_PATH, DOCUMENT_PATH};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use warp::http::Response;
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

#[derive(Clone)]
pub struct StubReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubReply {
    pub fn json(body: Value) -> Self {
        StubReply {
            status: 200,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    pub fn pdf(body: &[u8]) -> Self {
        StubReply {
            status: 200,
            content_type: "application/pdf",
            body: body.to_vec(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        StubReply {
            status,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

struct StubState {
    compute: Vec<StubReply>,
    document: Vec<StubReply>,
    gate: Option<Arc<Notify>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubState {
    // Replies are served in order; the last one repeats.
    fn reply_for(&self, path: &str, seen: usize) -> StubReply {
        let replies = match path {
            COMPUTE_PATH => &self.compute,
            DOCUMENT_PATH => &self.document,
            _ => return StubReply::text(404, "not found"),
        };
        replies
            .get(seen)
            .or_else(|| replies.last())
            .cloned()
            .unwrap_or_else(|| StubReply::text(404, "not found"))
    }
}

pub struct StubService {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubService {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

pub struct StubBuilder {
    compute: Vec<StubReply>,
    document: Vec<StubReply>,
    gate: Option<Arc<Notify>>,
}

pub fn stub() -> StubBuilder {
    StubBuilder {
        compute: Vec::new(),
        document: Vec::new(),
        gate: None,
    }
}

impl StubBuilder {
    pub fn compute(mut self, reply: StubReply) -> Self {
        self.compute.push(reply);
        self
    }

    pub fn document(mut self, reply: StubReply) -> Self {
        self.document.push(reply);
        self
    }

    /// Hold every reply until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn spawn(self) -> StubService {
        let state = Arc::new(StubState {
            compute: self.compute,
            document: self.document,
            gate: self.gate,
            requests: Mutex::new(Vec::new()),
        });

        let shared = state.clone();
        let routes = warp::post()
            .and(warp::path::full())
            .and(warp::body::bytes())
            .and_then(move |path: FullPath, body: Bytes| {
                let state = shared.clone();
                async move {
                    let path = path.as_str().to_string();
                    let seen = {
                        let mut requests = state.requests.lock().unwrap();
                        let seen = requests.iter().filter(|r| r.path == path).count();
                        requests.push(RecordedRequest {
                            path: path.clone(),
                            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                        });
                        seen
                    };

                    if let Some(gate) = &state.gate {
                        gate.notified().await;
                    }

                    let reply = state.reply_for(&path, seen);
                    let response = Response::builder()
                        .status(reply.status)
                        .header("content-type", reply.content_type)
                        .body(reply.body)
                        .unwrap();
                    Ok::<_, warp::Rejection>(response)
                }
            });

        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        StubService {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}
