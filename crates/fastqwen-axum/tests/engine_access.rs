//! Engine access under concurrency and across the startup lifecycle.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use fastqwen_core::{EngineSlot, ReadinessController, ReadinessState, StartupPlan};
use tokio::sync::Notify;

use common::{
    FAIL_MARKER, FakeFetcher, FakeLoader, MODEL_ID, ScriptedEngine, body_json, chat_body, get,
    post_json, ready_router, router_for, test_source, test_spec, wait_for,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_overlap_in_the_engine() {
    const REQUESTS: usize = 6;
    let delay = Duration::from_millis(40);
    let (engine, log) = ScriptedEngine::new(delay);
    let app = ready_router(engine);

    let started = Instant::now();
    let tasks: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                post_json(&app, "/v1/chat/completions", &chat_body(&format!("req {i}"))).await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().status(), StatusCode::OK);
    }

    assert_eq!(log.calls(), REQUESTS);
    assert_eq!(log.max_active(), 1);
    let spans = log.spans();
    for pair in spans.windows(2) {
        assert!(pair[1].0 >= pair[0].1, "engine calls overlapped");
    }
    assert!(started.elapsed() >= delay * u32::try_from(REQUESTS).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn waiting_requests_are_served_in_arrival_order() {
    const REQUESTS: usize = 8;
    let (engine, log) = ScriptedEngine::new(Duration::from_millis(30));
    let app = ready_router(engine);

    let mut tasks = Vec::new();
    for i in 0..REQUESTS {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            post_json(&app, "/v1/chat/completions", &chat_body(&i.to_string())).await
        }));
        if i == 0 {
            assert!(wait_for(Duration::from_secs(2), || log.active() == 1).await);
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    for task in tasks {
        assert_eq!(task.await.unwrap().status(), StatusCode::OK);
    }

    let expected: Vec<String> = (0..REQUESTS).map(|i| i.to_string()).collect();
    assert_eq!(log.contents(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_answers_while_inference_runs() {
    let (engine, log) = ScriptedEngine::new(Duration::from_millis(800));
    let app = ready_router(engine);

    let busy = tokio::spawn({
        let app = app.clone();
        async move { post_json(&app, "/v1/chat/completions", &chat_body("slow")).await }
    });
    assert!(wait_for(Duration::from_secs(2), || log.active() == 1).await);

    let response = tokio::time::timeout(Duration::from_millis(200), get(&app, "/health"))
        .await
        .expect("health blocked behind inference");
    assert_eq!(response.status(), StatusCode::OK);

    let models = tokio::time::timeout(Duration::from_millis(200), get(&app, "/v1/models"))
        .await
        .expect("models blocked behind inference");
    assert_eq!(models.status(), StatusCode::OK);

    assert_eq!(busy.await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn a_failed_request_does_not_poison_the_engine() {
    let (engine, log) = ScriptedEngine::new(Duration::ZERO);
    let app = ready_router(engine);

    let failed = post_json(&app, "/v1/chat/completions", &chat_body(FAIL_MARKER)).await;
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let ok = post_json(&app, "/v1/chat/completions", &chat_body("still there?")).await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(
        body_json(ok).await["choices"][0]["message"]["content"],
        "echo: still there?"
    );

    assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);
    assert_eq!(log.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_failing_request_among_concurrent_ones_is_isolated() {
    let (engine, log) = ScriptedEngine::new(Duration::from_millis(20));
    let app = ready_router(engine);

    let bodies = ["first", FAIL_MARKER, "third"];
    let tasks: Vec<_> = bodies
        .iter()
        .map(|content| {
            let app = app.clone();
            let body = chat_body(content);
            tokio::spawn(async move { post_json(&app, "/v1/chat/completions", &body).await })
        })
        .collect();

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap().status());
    }
    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::OK
        ]
    );
    assert_eq!(log.calls(), 3);
    assert_eq!(log.max_active(), 1);
}

#[tokio::test]
async fn health_never_reverts_once_ready() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join(MODEL_ID);
    std::fs::write(&model_path, b"GGUF").unwrap();

    let gate = Arc::new(Notify::new());
    let (engine, _log) = ScriptedEngine::new(Duration::ZERO);
    let slot = Arc::new(EngineSlot::new(MODEL_ID));
    let controller = ReadinessController::new(
        Arc::clone(&slot),
        Arc::new(FakeFetcher::default()),
        Arc::new(FakeLoader::with_engine(engine).gated(Arc::clone(&gate))),
    );
    let app = router_for(Arc::clone(&slot));
    let plan = StartupPlan {
        source: test_source(),
        models_dir: dir.path().to_path_buf(),
        engine: test_spec(model_path),
    };

    let mut observed = vec![get(&app, "/health").await.status()];
    let startup = tokio::spawn(async move { controller.start(plan).await });
    for _ in 0..3 {
        observed.push(get(&app, "/health").await.status());
    }
    gate.notify_one();
    startup.await.unwrap().unwrap();
    for _ in 0..3 {
        observed.push(get(&app, "/health").await.status());
    }

    let first_ok = observed
        .iter()
        .position(|s| *s == StatusCode::OK)
        .expect("health never turned OK");
    assert!(observed[..first_ok]
        .iter()
        .all(|s| *s == StatusCode::SERVICE_UNAVAILABLE));
    assert!(observed[first_ok..].iter().all(|s| *s == StatusCode::OK));
}

#[tokio::test]
async fn requests_are_rejected_while_loading_then_served() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join(MODEL_ID);
    std::fs::write(&model_path, b"GGUF").unwrap();

    let gate = Arc::new(Notify::new());
    let (engine, log) = ScriptedEngine::new(Duration::ZERO);
    let slot = Arc::new(EngineSlot::new(MODEL_ID));
    let fetcher = Arc::new(FakeFetcher::default());
    let controller = ReadinessController::new(
        Arc::clone(&slot),
        fetcher.clone(),
        Arc::new(FakeLoader::with_engine(engine).gated(Arc::clone(&gate))),
    );
    let app = router_for(Arc::clone(&slot));

    let plan = StartupPlan {
        source: test_source(),
        models_dir: dir.path().to_path_buf(),
        engine: test_spec(model_path),
    };
    let startup = tokio::spawn(async move { controller.start(plan).await });

    assert!(wait_for(Duration::from_secs(2), || slot.state() == ReadinessState::Loading).await);
    assert_eq!(
        get(&app, "/health").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    let rejected = post_json(&app, "/v1/chat/completions", &chat_body("early")).await;
    assert_eq!(rejected.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(log.calls(), 0);

    gate.notify_one();
    startup.await.unwrap().unwrap();

    assert_eq!(slot.state(), ReadinessState::Ready);
    assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);
    let served = post_json(&app, "/v1/chat/completions", &chat_body("now")).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_artifact_is_fetched_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _log) = ScriptedEngine::new(Duration::ZERO);
    let slot = Arc::new(EngineSlot::new(MODEL_ID));
    let fetcher = Arc::new(FakeFetcher::default());
    let controller = ReadinessController::new(
        Arc::clone(&slot),
        fetcher.clone(),
        Arc::new(FakeLoader::with_engine(engine)),
    );

    let plan = StartupPlan {
        source: test_source(),
        models_dir: dir.path().to_path_buf(),
        engine: test_spec(dir.path().join(MODEL_ID)),
    };
    controller.start(plan).await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(dir.path().join(MODEL_ID).is_file());
    assert!(slot.is_ready());
}

#[tokio::test]
async fn failed_startup_keeps_rejecting_requests() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join(MODEL_ID);
    std::fs::write(&model_path, b"GGUF").unwrap();

    let slot = Arc::new(EngineSlot::new(MODEL_ID));
    let controller = ReadinessController::new(
        Arc::clone(&slot),
        Arc::new(FakeFetcher::default()),
        Arc::new(FakeLoader::failing()),
    );
    let plan = StartupPlan {
        source: test_source(),
        models_dir: dir.path().to_path_buf(),
        engine: test_spec(model_path),
    };
    assert!(controller.start(plan).await.is_err());
    assert_eq!(slot.state(), ReadinessState::Failed);

    let app = router_for(slot);
    assert_eq!(
        get(&app, "/health").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    let response = post_json(&app, "/v1/chat/completions", &chat_body("hello")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
