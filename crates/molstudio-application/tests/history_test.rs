mod common;

use common::{MockGateway, record};
use molstudio_application::{HistorySynchronizer, RefreshOutcome, SharedState, StudioState};
use molstudio_core::molecule::ResultKey;
use molstudio_core::session::Session;
use molstudio_core::{Operation, RequestGateway};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn synchronizer(gateway: &Arc<MockGateway>) -> (HistorySynchronizer, SharedState) {
    let dyn_gateway: Arc<dyn RequestGateway> = gateway.clone();
    let state = StudioState::new(Session::default()).into_shared();
    (HistorySynchronizer::new(dyn_gateway, state.clone()), state)
}

#[tokio::test]
async fn test_refresh_replaces_history_and_keeps_active() {
    let gateway = MockGateway::new();
    gateway.seed(record("a", "ethanol", &[("your_model", "CCO")]));
    gateway.seed(record("b", "benzene", &[("your_model", "c1ccccc1")]));
    let (sync, state) = synchronizer(&gateway);

    assert_eq!(sync.refresh().await.unwrap(), RefreshOutcome::Applied { records: 2 });
    state
        .write()
        .await
        .select(ResultKey::new("a", "your_model"))
        .unwrap();

    gateway.seed(record("c", "aspirin", &[("your_model", "CC")]));
    assert_eq!(sync.refresh().await.unwrap(), RefreshOutcome::Applied { records: 3 });

    let state = state.read().await;
    let ids: Vec<_> = state.records.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(state.session.selection.active_record_id(), Some("a"));
}

#[tokio::test]
async fn test_vanished_active_record_clears_selection() {
    let gateway = MockGateway::new();
    gateway.seed(record("a", "ethanol", &[("your_model", "CCO")]));
    gateway.seed(record("b", "benzene", &[("your_model", "c1ccccc1")]));
    let (sync, state) = synchronizer(&gateway);
    sync.refresh().await.unwrap();
    {
        let mut state = state.write().await;
        state.select(ResultKey::new("a", "your_model")).unwrap();
        state.select_overlay(ResultKey::new("b", "your_model")).unwrap();
    }

    gateway.remove("a");
    let outcome = sync.refresh().await.unwrap();

    assert_eq!(
        outcome,
        RefreshOutcome::SelectionCleared {
            records: 1,
            record_id: "a".to_string()
        }
    );
    assert!(state.read().await.session.selection.is_empty());
}

#[tokio::test]
async fn test_vanished_overlay_record_clears_overlay_only() {
    let gateway = MockGateway::new();
    gateway.seed(record("a", "ethanol", &[("your_model", "CCO")]));
    gateway.seed(record("b", "benzene", &[("your_model", "c1ccccc1")]));
    let (sync, state) = synchronizer(&gateway);
    sync.refresh().await.unwrap();
    {
        let mut state = state.write().await;
        state.select(ResultKey::new("a", "your_model")).unwrap();
        state.select_overlay(ResultKey::new("b", "your_model")).unwrap();
    }

    gateway.remove("b");
    assert_eq!(sync.refresh().await.unwrap(), RefreshOutcome::Applied { records: 1 });

    let state = state.read().await;
    assert_eq!(state.session.selection.active_record_id(), Some("a"));
    assert!(state.session.selection.overlay_result_key().is_none());
}

#[tokio::test]
async fn test_failed_refresh_leaves_state_untouched() {
    let gateway = MockGateway::new();
    gateway.seed(record("a", "ethanol", &[("your_model", "CCO")]));
    let (sync, state) = synchronizer(&gateway);
    sync.refresh().await.unwrap();

    gateway.fail(Operation::ListHistory);
    gateway.remove("a");
    let err = sync.refresh().await.unwrap_err();

    assert_eq!(err.operation(), Some(Operation::ListHistory));
    assert!(state.read().await.records.contains("a"));
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_refresh_is_applied() {
    let gateway = MockGateway::new();
    gateway.seed(record("a", "ethanol", &[("your_model", "CCO")]));
    // First refresh is slow and sees only "a"; the second is fast and sees "b" too.
    gateway.queue_history_delays(&[Duration::from_millis(500), Duration::from_millis(10)]);
    let (sync, state) = synchronizer(&gateway);

    let slow = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;
    gateway.seed(record("b", "benzene", &[("your_model", "c1ccccc1")]));
    let fast = sync.refresh().await.unwrap();

    assert_eq!(fast, RefreshOutcome::Applied { records: 2 });
    assert_eq!(slow.await.unwrap().unwrap(), RefreshOutcome::Discarded);
    assert_eq!(state.read().await.records.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_predating_local_write_is_discarded() {
    let gateway = MockGateway::new();
    gateway.queue_history_delays(&[Duration::from_millis(500)]);
    let (sync, state) = synchronizer(&gateway);

    let pending = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    state
        .write()
        .await
        .records
        .insert_front(record("local", "ethanol", &[("your_model", "CCO")]));

    assert_eq!(pending.await.unwrap().unwrap(), RefreshOutcome::Discarded);
    assert!(state.read().await.records.contains("local"));
}

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh_stops_on_cancel() {
    let gateway = MockGateway::new();
    let (sync, _state) = synchronizer(&gateway);
    let token = CancellationToken::new();

    let handle = sync
        .spawn_periodic(Duration::from_secs(30), token.clone())
        .unwrap();
    tokio::time::sleep(Duration::from_secs(65)).await;
    let calls = gateway.count(Operation::ListHistory);
    // Immediate first tick, then at 30s and 60s.
    assert_eq!(calls, 3);

    token.cancel();
    handle.await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(gateway.count(Operation::ListHistory), 3);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh_rejects_zero_interval() {
    let gateway = MockGateway::new();
    let (sync, _state) = synchronizer(&gateway);

    let err = sync
        .spawn_periodic(Duration::ZERO, CancellationToken::new())
        .unwrap_err();
    assert!(err.is_validation());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.count(Operation::ListHistory), 0);
}
