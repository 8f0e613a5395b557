use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TransportErrorPolicy;
use crate::domain::StructureId;
use crate::error::CymolError;
use crate::formats::{FlatFileParser, RecordParser};
use crate::rcsb::RcsbService;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LoadEvent {
    Loaded {
        id: String,
        raw: String,
        chains: Vec<String>,
    },
    Failed {
        id: String,
        reason: String,
    },
}

pub struct StructureLoader<T, P = FlatFileParser> {
    service: RcsbService<T, P>,
    policy: TransportErrorPolicy,
    events: mpsc::Sender<LoadEvent>,
}

impl<T: Transport, P: RecordParser> StructureLoader<T, P> {
    pub fn new(
        service: RcsbService<T, P>,
        policy: TransportErrorPolicy,
        events: mpsc::Sender<LoadEvent>,
    ) -> Self {
        Self {
            service,
            policy,
            events,
        }
    }

    pub fn service(&self) -> &RcsbService<T, P> {
        &self.service
    }

    pub async fn load(&self, id: &StructureId, cancel: &CancellationToken) {
        let event = match self.service.load_entry(id, cancel).await {
            Ok(entry) => LoadEvent::Loaded {
                id: entry.id.to_string(),
                chains: entry.chain_names(),
                raw: entry.raw,
            },
            Err(err) => match self.failure_event(id, err) {
                Some(event) => event,
                None => return,
            },
        };
        if self.events.send(event).await.is_err() {
            debug!(id = %id, "load listener gone");
        }
    }

    fn failure_event(&self, id: &StructureId, err: CymolError) -> Option<LoadEvent> {
        if matches!(err, CymolError::Cancelled) {
            debug!(id = %id, "structure load cancelled");
            return None;
        }
        if err.is_transport() && self.policy == TransportErrorPolicy::Silent {
            warn!(id = %id, error = %err, "structure load failed; not reported");
            return None;
        }
        Some(LoadEvent::Failed {
            id: id.to_string(),
            reason: err.to_string(),
        })
    }
}
