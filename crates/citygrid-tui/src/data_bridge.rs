//! Data bridge — connects the [`NetworkStore`] and [`RemoteSync`] to TUI
//! actions.
//!
//! Runs as a background task: pushes initial snapshots so every screen has
//! data on its first frame, starts backend polling, then forwards each
//! change as an [`Action`] until cancelled. Cancellation also shuts the
//! poller down, so no response lands after the app has quit.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use citygrid_core::{ConnectionState, LiveSnapshot, NetworkStore, RemoteSync, Subscription};

use crate::action::Action;

pub async fn spawn_data_bridge(
    store: Arc<NetworkStore>,
    sync: Option<RemoteSync>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut vlans = store.subscribe_vlans();
    let mut devices = store.subscribe_devices();
    let mut nodes = store.subscribe_nodes();
    let mut links = store.subscribe_links();
    let mut selected_vlan = store.subscribe_selected_vlan();
    let mut selected_device = store.subscribe_selected_device();

    let _ = action_tx.send(Action::TrafficLoaded(store.traffic()));
    let _ = action_tx.send(Action::VlansUpdated(vlans.current().clone()));
    let _ = action_tx.send(Action::DevicesUpdated(devices.current().clone()));
    let _ = action_tx.send(Action::NodesUpdated(nodes.current().clone()));
    let _ = action_tx.send(Action::LinksUpdated(links.current().clone()));
    let _ = action_tx.send(Action::SelectedVlanChanged(*selected_vlan.current()));
    let _ = action_tx.send(Action::SelectedDeviceChanged(
        selected_device.current().clone(),
    ));

    let mut live = sync.as_ref().map(RemoteSync::subscribe);
    let mut conn_state = sync.as_ref().map(RemoteSync::connection_state);

    if let Some(sync) = sync.clone() {
        let _ = action_tx.send(Action::ConnectionChanged(ConnectionState::Connecting));
        // The first fetch can take a full timeout; the store keeps flowing meanwhile.
        tokio::spawn(async move {
            if let Err(e) = sync.start().await {
                warn!(error = %e, "initial backend fetch failed; polling continues");
            }
        });
    } else {
        let _ = action_tx.send(Action::ConnectionChanged(ConnectionState::Disconnected));
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(v) = vlans.changed() => {
                let _ = action_tx.send(Action::VlansUpdated(v));
            }
            Some(d) = devices.changed() => {
                let _ = action_tx.send(Action::DevicesUpdated(d));
            }
            Some(n) = nodes.changed() => {
                let _ = action_tx.send(Action::NodesUpdated(n));
            }
            Some(l) = links.changed() => {
                let _ = action_tx.send(Action::LinksUpdated(l));
            }
            Some(v) = selected_vlan.changed() => {
                let _ = action_tx.send(Action::SelectedVlanChanged(v));
            }
            Some(d) = selected_device.changed() => {
                let _ = action_tx.send(Action::SelectedDeviceChanged(d));
            }
            Some(snapshot) = next_snapshot(&mut live) => {
                debug!(devices = snapshot.device_count(), "dispatching LiveUpdated");
                let _ = action_tx.send(Action::LiveUpdated(snapshot));
            }
            Some(state) = next_state(&mut conn_state) => {
                let _ = action_tx.send(Action::ConnectionChanged(state));
            }
        }
    }

    if let Some(sync) = sync {
        sync.shutdown().await;
    }
    debug!("data bridge shut down");
}

/// Never resolves without a backend.
async fn next_snapshot(
    sub: &mut Option<Subscription<Arc<LiveSnapshot>>>,
) -> Option<Arc<LiveSnapshot>> {
    match sub {
        Some(sub) => sub.changed().await,
        None => std::future::pending().await,
    }
}

async fn next_state(rx: &mut Option<watch::Receiver<ConnectionState>>) -> Option<ConnectionState> {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    rx.changed().await.ok()?;
    let state = rx.borrow_and_update().clone();
    Some(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn initial_snapshots_then_store_changes() {
        let store = Arc::new(NetworkStore::seeded(Some(7)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            Arc::clone(&store),
            None,
            tx,
            cancel.clone(),
        ));

        let mut initial = Vec::new();
        for _ in 0..8 {
            initial.push(rx.recv().await.unwrap());
        }
        assert!(matches!(initial[0], Action::TrafficLoaded(_)));
        assert!(matches!(&initial[2], Action::DevicesUpdated(d) if d.len() == 15));
        assert!(matches!(
            initial[7],
            Action::ConnectionChanged(ConnectionState::Disconnected)
        ));

        store.set_selected_vlan(Some(30));
        let next = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(next, Action::SelectedVlanChanged(Some(30))));

        cancel.cancel();
        bridge.await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
