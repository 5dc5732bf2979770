//! The serve loop over a real loopback listener.

mod common;

use std::sync::Arc;
use std::time::Duration;

use fastqwen_axum::{CorsConfig, Gateway, ServerConfig, serve};
use fastqwen_core::{CoreError, EngineInitError, EngineSlot, ReadinessController, StartupPlan};
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use common::{
    FakeFetcher, FakeLoader, MODEL_ID, ScriptedEngine, chat_body, test_source, test_spec,
};

fn gateway(dir: &std::path::Path, loader: FakeLoader) -> (Gateway, Arc<EngineSlot>) {
    let slot = Arc::new(EngineSlot::new(MODEL_ID));
    let controller = ReadinessController::new(
        Arc::clone(&slot),
        Arc::new(FakeFetcher::default()),
        Arc::new(loader),
    );
    let gateway = Gateway {
        config: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::AllowAll,
        },
        controller,
        plan: StartupPlan {
            source: test_source(),
            models_dir: dir.to_path_buf(),
            engine: test_spec(dir.join(MODEL_ID)),
        },
    };
    (gateway, slot)
}

#[tokio::test]
async fn serves_until_shutdown_then_releases_once() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, log) = ScriptedEngine::new(Duration::ZERO);
    let (gateway, slot) = gateway(dir.path(), FakeLoader::with_engine(engine));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, gateway, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let mut ready = false;
    for _ in 0..100 {
        let status = client
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap()
            .status();
        if status == StatusCode::OK {
            ready = true;
            break;
        }
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(ready, "gateway never became ready");

    let response = client
        .post(format!("{base}/v1/chat/completions"))
        .json(&chat_body("over the wire"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("serve did not stop")
        .unwrap()
        .unwrap();

    assert_eq!(log.released(), 1);
    assert!(!slot.release().await);
    assert_eq!(log.released(), 1);
}

#[tokio::test]
async fn startup_failure_stops_the_server_with_the_cause() {
    let dir = tempfile::tempdir().unwrap();
    let (gateway, slot) = gateway(dir.path(), FakeLoader::failing());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        serve(listener, gateway, std::future::pending()),
    )
    .await
    .expect("serve kept running after failed startup");

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CoreError>(),
        Some(CoreError::EngineInit(EngineInitError::Rejected(_)))
    ));
    assert!(!slot.is_ready());
}
