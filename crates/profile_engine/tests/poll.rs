use std::sync::{mpsc, Arc};
use std::time::Duration;

use profile_engine::{
    run_poll_loop, ChannelEventSink, EngineEvent, EngineHandle, FetchSettings, ReqwestSource,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> ReqwestSource {
    let settings = FetchSettings {
        manifest_url: format!("{}/files.json", server.uri()),
        content_base_url: format!("{}/profile/", server.uri()),
        ..FetchSettings::default()
    };
    ReqwestSource::new(settings).expect("valid settings")
}

async fn serve_manifest(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/files.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/json"))
        .mount(server)
        .await;
}

fn polled(events: &mpsc::Receiver<EngineEvent>) -> Vec<u64> {
    events
        .try_iter()
        .filter_map(|event| match event {
            EngineEvent::ManifestPolled(manifest) => Some(manifest.modified_at),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn poll_loop_survives_errors_and_stops_on_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    serve_manifest(&server, r#"{"files":["a.txt"],"lastModified":150}"#).await;

    let (tx, rx) = mpsc::channel();
    let source = source_for(&server);
    let sink = ChannelEventSink::new(tx);
    let token = CancellationToken::new();
    let loop_token = token.clone();
    let task = tokio::spawn(async move {
        run_poll_loop(&source, Duration::from_millis(20), loop_token, &sink).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    token.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("loop stops after cancel")
        .expect("loop does not panic");

    let stamps = polled(&rx);
    assert!(!stamps.is_empty());
    assert!(stamps.iter().all(|stamp| *stamp == 150));

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.len() >= 3);
    assert!(requests
        .iter()
        .all(|request| request.url.query().is_some_and(|q| q.starts_with("t="))));
}

#[tokio::test]
async fn cancelled_loop_makes_no_requests() {
    let server = MockServer::start().await;
    serve_manifest(&server, "[]").await;

    let (tx, rx) = mpsc::channel();
    let token = CancellationToken::new();
    token.cancel();
    run_poll_loop(
        &source_for(&server),
        Duration::from_millis(10),
        token,
        &ChannelEventSink::new(tx),
    )
    .await;

    assert!(polled(&rx).is_empty());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_handle_runs_cycles_and_stoppable_polling() {
    let server = MockServer::start().await;
    serve_manifest(&server, r#"{"files":["a.txt"],"lastModified":5}"#).await;
    Mock::given(method("GET"))
        .and(path("/profile/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("alpha"))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(
        Arc::new(source_for(&server)),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");

    engine.run_cycle(9, false);
    let poll = engine.start_polling(Duration::from_millis(20));

    let (rx, events) = tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_millis(500)) {
            events.push(event);
            if events.len() >= 3 {
                break;
            }
        }
        (rx, events)
    })
    .await
    .expect("collector");

    let completed = events.iter().find_map(|event| match event {
        EngineEvent::CycleCompleted { cycle_id, result } => Some((*cycle_id, result.clone())),
        _ => None,
    });
    let (cycle_id, result) = completed.expect("cycle completed");
    assert_eq!(cycle_id, 9);
    let output = result.expect("cycle ok");
    assert_eq!(output.files[0].content, "alpha");
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::ManifestPolled(_))));

    poll.stop();
    assert!(poll.is_stopped());
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = rx.try_iter().count();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(polled(&rx).len(), 0);
}
