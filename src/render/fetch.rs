use crate::auth::Session;
use crate::render::protocol::{FetchKind, FetchOutcome, FetchResponse, RegionData, RenderGeneration};
use crate::store::DataStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Read and decode one region for `session`.
///
/// Never fails: transport, authorization and decoding problems all become
/// [`FetchOutcome::Failed`].
pub async fn fetch_region(
    store: &dyn DataStore,
    kind: FetchKind,
    session: &Session,
) -> FetchOutcome<RegionData> {
    let path = match kind.path_for(session.user_id()) {
        Ok(path) => path,
        Err(err) => return FetchOutcome::Failed(err.to_string()),
    };

    let snapshot = match store.get(&path, session.id_token()).await {
        Ok(snapshot) => snapshot,
        Err(err) => return FetchOutcome::Failed(err.to_string()),
    };

    let decoded = match kind {
        FetchKind::Profile => snapshot.decode().map(|v| v.map(RegionData::Profile)),
        FetchKind::LatestOrder => snapshot.decode().map(|v| v.map(RegionData::LatestOrder)),
        FetchKind::History => snapshot.decode().map(|v| v.map(RegionData::History)),
    };

    match decoded {
        Ok(Some(data)) => FetchOutcome::Found(data),
        Ok(None) => FetchOutcome::NotFound,
        Err(err) => FetchOutcome::Failed(err.to_string()),
    }
}

/// Spawn a fetch that reports back on `tx` unless `cancel` fires first.
///
/// A cancelled fetch sends nothing.
pub fn spawn_fetch(
    store: Arc<dyn DataStore>,
    kind: FetchKind,
    session: Session,
    generation: RenderGeneration,
    cancel: CancellationToken,
    tx: UnboundedSender<FetchResponse>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("{kind:?} fetch for generation {generation} cancelled");
                return;
            }
            outcome = fetch_region(store.as_ref(), kind, &session) => outcome,
        };

        if tx
            .send(FetchResponse {
                generation,
                kind,
                outcome,
            })
            .is_err()
        {
            log::debug!("renderer gone, dropping {kind:?} result");
        }
    })
}
