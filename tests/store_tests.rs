use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{Local, TimeZone};

use pontolog::bridge::SlackStatus;
use pontolog::errors::{AppError, BridgeError};
use pontolog::models::{Operation, PunchType, RawPunchRecord};
use pontolog::queue::{QueueConfig, TaskQueue};
use pontolog::refresh::RefreshBus;
use pontolog::store::{AuthStore, PontoStore, SlackStore, WorkdayStore};
use pontolog::Credentials;

mod common;
use common::{MockAuthBridge, MockPontoBridge, MockSlackBridge};

fn punch(hour: u32, min: u32, kind: PunchType) -> RawPunchRecord {
    RawPunchRecord {
        timestamp: Local.with_ymd_and_hms(2025, 3, 10, hour, min, 0).unwrap(),
        kind,
        location: "Escritório".to_string(),
    }
}

fn day_records() -> Vec<RawPunchRecord> {
    vec![
        punch(9, 0, PunchType::Entry),
        punch(12, 0, PunchType::LunchStart),
        punch(13, 0, PunchType::Entry),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_ponto_initialize_populates_state() {
    let bridge = Arc::new(MockPontoBridge::default());
    let store = PontoStore::new(bridge, TaskQueue::new(QueueConfig::default()), RefreshBus::new());

    store.initialize().await.unwrap();

    let state = store.state();
    assert!(state.initialized);
    assert_eq!(state.current_location.as_deref(), Some("Escritório Central"));
    assert_eq!(state.locations.len(), 2);
    assert_eq!(state.operations.len(), 3);
    assert!(state.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_execute_success_fires_refresh_signal() {
    let bridge = Arc::new(MockPontoBridge::default());
    let refresh = RefreshBus::new();
    let mut rx = refresh.subscribe();
    let store = PontoStore::new(bridge, TaskQueue::new(QueueConfig::default()), refresh);

    store.execute(Operation::ClockIn).await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("refresh signal not received")
        .expect("refresh bus closed");
}

#[tokio::test(start_paused = true)]
async fn test_execute_retries_transient_failure_then_refreshes() {
    let bridge = Arc::new(MockPontoBridge::failing_executes(
        1,
        BridgeError::Network("sem conexão".to_string()),
    ));
    let refresh = RefreshBus::new();
    let mut rx = refresh.subscribe();
    let store = PontoStore::new(
        bridge.clone(),
        TaskQueue::new(QueueConfig::default()),
        refresh,
    );

    store.execute(Operation::Lunch).await.unwrap();

    assert_eq!(bridge.executed.load(Ordering::SeqCst), 2, "one retry expected");
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("refresh signal not received after retried success")
        .expect("refresh bus closed");
}

#[tokio::test(start_paused = true)]
async fn test_execute_exhaustion_records_bridge_error() {
    let bridge = Arc::new(MockPontoBridge::failing_executes(
        10,
        BridgeError::Blocked("fora do horário permitido".to_string()),
    ));
    let refresh = RefreshBus::new();
    let mut rx = refresh.subscribe();
    let store = PontoStore::new(
        bridge.clone(),
        TaskQueue::new(QueueConfig::default()),
        refresh,
    );

    let outcome = store.execute(Operation::ClockOut).await;

    match outcome {
        Err(AppError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(bridge.executed.load(Ordering::SeqCst), 3);

    let state = store.state();
    match state.last_error {
        Some(BridgeError::Blocked(_)) => {}
        other => panic!("expected blocked error in store state, got {other:?}"),
    }

    assert!(
        rx.try_recv().is_err(),
        "failed operation must not fire the refresh signal"
    );
}

#[tokio::test(start_paused = true)]
async fn test_workday_store_reconstructs_raw_records() {
    let bridge = Arc::new(MockPontoBridge::with_records(day_records()));
    let store = WorkdayStore::new(bridge, RefreshBus::new());

    let summary = store.refresh().await.unwrap();

    assert_eq!(
        summary.workday.clock_in,
        Some(Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap())
    );
    assert_eq!(
        summary.workday.lunch_end,
        Some(Local.with_ymd_and_hms(2025, 3, 10, 13, 0, 0).unwrap())
    );
    assert_eq!(summary.workday.records.len(), 3);
    assert!(store.state().last_updated.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_workday_store_accepts_preaggregated_snapshot() {
    let snapshot = pontolog::reconstruct(&day_records());
    let bridge = Arc::new(MockPontoBridge::with_snapshot(snapshot.clone()));
    let store = WorkdayStore::new(bridge, RefreshBus::new());

    let summary = store.refresh().await.unwrap();

    assert_eq!(summary.workday, snapshot, "snapshot must be used as-is");
}

#[tokio::test(start_paused = true)]
async fn test_workday_store_keeps_error_on_fetch_failure() {
    let bridge = Arc::new(MockPontoBridge::default());
    *bridge.failure.lock().unwrap() = Some(BridgeError::Runtime("bridge down".to_string()));
    let store = WorkdayStore::new(bridge.clone(), RefreshBus::new());

    let outcome = store.refresh().await;

    assert!(outcome.is_err());
    match store.state().last_error {
        Some(BridgeError::Runtime(_)) => {}
        other => panic!("expected runtime error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_refresh_loop_refetches_on_signal() {
    let bridge = Arc::new(MockPontoBridge::with_records(day_records()));
    let refresh = RefreshBus::new();
    let store = Arc::new(WorkdayStore::new(
        bridge.clone(),
        refresh.clone(),
    ));

    let _loop_handle = store.spawn_refresh_loop();
    tokio::task::yield_now().await;

    refresh.notify();

    // Let the loop task observe the signal and refetch.
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }

    assert_eq!(bridge.fetches.load(Ordering::SeqCst), 1);
    assert!(store.state().last_updated.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_auth_login_success_and_failure() {
    let bridge = Arc::new(MockAuthBridge::default());
    let store = AuthStore::new(
        bridge.clone(),
        TaskQueue::new(QueueConfig::default()),
    );

    let credentials = Credentials {
        username: "mwallace".to_string(),
        password: "hunter2".to_string(),
    };

    store.login(credentials.clone()).await.unwrap();
    assert!(store.state().authenticated);

    *bridge.login_error.lock().unwrap() =
        Some(BridgeError::Auth("credenciais inválidas".to_string()));

    let outcome = store.login(credentials).await;
    assert!(outcome.is_err());

    let state = store.state();
    assert!(!state.authenticated);
    match state.last_error {
        Some(BridgeError::Auth(_)) => {}
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_slack_store_status_roundtrip() {
    let bridge = Arc::new(MockSlackBridge::default());
    let store = SlackStore::new(
        bridge.clone(),
        TaskQueue::new(QueueConfig::default()),
    );

    store.load_status().await.unwrap();
    assert!(store.state().status.is_none());

    let status = SlackStatus {
        emoji: ":bento:".to_string(),
        text: "Almoçando".to_string(),
    };
    store.set_status(status.clone()).await.unwrap();
    assert_eq!(store.state().status, Some(status));

    store.send_message("Voltei do almoço".to_string()).await.unwrap();
    assert_eq!(bridge.messages.lock().unwrap().as_slice(), ["Voltei do almoço"]);
}

#[tokio::test(start_paused = true)]
async fn test_stores_share_queue_without_interference() {
    let queue = TaskQueue::new(QueueConfig::default());
    let refresh = RefreshBus::new();

    let auth_bridge = Arc::new(MockAuthBridge::default());
    *auth_bridge.login_error.lock().unwrap() =
        Some(BridgeError::Network("sem conexão".to_string()));
    let auth = AuthStore::new(auth_bridge.clone(), queue.clone());

    let ponto_bridge = Arc::new(MockPontoBridge::default());
    let ponto = PontoStore::new(
        ponto_bridge.clone(),
        queue.clone(),
        refresh,
    );

    let credentials = Credentials {
        username: "mwallace".to_string(),
        password: "hunter2".to_string(),
    };

    // Auth exhausts its retries; the punch-clock key must still succeed.
    let (auth_outcome, ponto_outcome) =
        tokio::join!(auth.login(credentials), ponto.initialize());

    assert!(auth_outcome.is_err(), "login must exhaust its retries");
    assert!(ponto_outcome.is_ok());
    assert!(ponto.state().initialized);
    assert!(
        ponto.state().last_error.is_none(),
        "failures under other keys must not leak into this store"
    );
    match auth.state().last_error {
        Some(BridgeError::Network(_)) => {}
        other => panic!("expected network error on auth store, got {other:?}"),
    }
}
