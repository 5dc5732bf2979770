//! Shared fakes for the gateway integration tests.
//!
//! Nothing here needs llama-server or the network.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

use fastqwen_axum::{CorsConfig, GatewayContext, create_router};
use fastqwen_core::{
    EngineHandle, EngineInitError, EngineLoader, EngineSlot, EngineSpec, InferenceError,
    ModelAcquisitionError, ModelFetcher, ModelSource, NativeChatRequest, NativeChatResponse,
    NativeEngine, NativeUsage,
};

pub const MODEL_ID: &str = "test-model.gguf";

/// Marker that makes [`ScriptedEngine`] fail the request.
pub const FAIL_MARKER: &str = "__fail__";

/// Records when each inference entered and left the engine.
#[derive(Debug, Default)]
pub struct CallLog {
    spans: Mutex<Vec<(Instant, Instant)>>,
    contents: Mutex<Vec<String>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    released: AtomicUsize,
}

impl CallLog {
    pub fn spans(&self) -> Vec<(Instant, Instant)> {
        let mut spans = self.spans.lock().unwrap().clone();
        spans.sort_by_key(|(start, _)| *start);
        spans
    }

    /// Last message of each call, in the order calls entered the engine.
    pub fn contents(&self) -> Vec<String> {
        self.contents.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.spans.lock().unwrap().len()
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Echoes the last message back after `delay`, failing on [`FAIL_MARKER`].
pub struct ScriptedEngine {
    delay: Duration,
    log: Arc<CallLog>,
}

impl ScriptedEngine {
    pub fn new(delay: Duration) -> (Self, Arc<CallLog>) {
        let log = Arc::new(CallLog::default());
        (
            Self {
                delay,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

#[async_trait]
impl NativeEngine for ScriptedEngine {
    async fn chat_completion(
        &self,
        request: NativeChatRequest,
    ) -> Result<NativeChatResponse, InferenceError> {
        let started = Instant::now();
        let now_active = self.log.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_active.fetch_max(now_active, Ordering::SeqCst);

        let last = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.log.contents.lock().unwrap().push(last.clone());

        tokio::time::sleep(self.delay).await;

        let result = if last.contains(FAIL_MARKER) {
            Err(InferenceError::Engine("scripted failure".to_string()))
        } else {
            let prompt = u32::try_from(request.content_len()).unwrap_or(u32::MAX);
            let completion = u32::try_from(last.split_whitespace().count()).unwrap_or(u32::MAX);
            Ok(NativeChatResponse::new(
                format!("echo: {last}"),
                Some("stop"),
                NativeUsage::new(prompt, completion),
            ))
        };

        self.log.active.fetch_sub(1, Ordering::SeqCst);
        self.log
            .spans
            .lock()
            .unwrap()
            .push((started, Instant::now()));
        result
    }

    async fn release(&mut self) {
        self.log.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out one pre-built engine, optionally waiting on a gate first.
pub struct FakeLoader {
    engine: Mutex<Option<Box<dyn NativeEngine>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeLoader {
    pub fn with_engine(engine: impl NativeEngine + 'static) -> Self {
        Self {
            engine: Mutex::new(Some(Box::new(engine))),
            gate: None,
        }
    }

    /// A loader that always rejects the model.
    pub fn failing() -> Self {
        Self {
            engine: Mutex::new(None),
            gate: None,
        }
    }

    /// Hold `load` until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl EngineLoader for FakeLoader {
    async fn load(&self, _spec: &EngineSpec) -> Result<Box<dyn NativeEngine>, EngineInitError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.engine
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| EngineInitError::Rejected("fake loader has no engine".to_string()))
    }
}

/// Writes a small placeholder artifact and counts calls.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ModelFetcher for FakeFetcher {
    async fn fetch(
        &self,
        source: &ModelSource,
        dest_dir: &Path,
    ) -> Result<PathBuf, ModelAcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let path = dest_dir.join(&source.filename);
        tokio::fs::write(&path, b"GGUF")
            .await
            .map_err(|e| ModelAcquisitionError::Directory(e.to_string()))?;
        Ok(path)
    }
}

pub fn test_spec(model_path: PathBuf) -> EngineSpec {
    EngineSpec {
        model_path,
        context_size: 512,
        thread_count: 1,
        batch_size: 8,
        model_alias: MODEL_ID.to_string(),
    }
}

pub fn test_source() -> ModelSource {
    ModelSource {
        repo_id: "test/repo".to_string(),
        filename: MODEL_ID.to_string(),
        token: None,
    }
}

/// A router whose slot is already `Ready` with `engine`.
pub fn ready_router(engine: impl NativeEngine + 'static) -> Router {
    let handle = EngineHandle::from_engine(Box::new(engine), test_spec(PathBuf::from(MODEL_ID)));
    router_for(Arc::new(EngineSlot::ready(MODEL_ID, handle)))
}

pub fn router_for(slot: Arc<EngineSlot>) -> Router {
    create_router(GatewayContext::new(slot), &CorsConfig::AllowAll)
}

pub fn chat_body(content: &str) -> Value {
    serde_json::json!({
        "messages": [{"role": "user", "content": content}],
        "max_tokens": 16
    })
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Poll `check` every 10ms until it holds or `timeout` passes.
pub async fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
