use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cymol_db::config::{Endpoint, RCSB_HOST, TransportErrorPolicy};
use cymol_db::domain::StructureId;
use cymol_db::error::CymolError;
use cymol_db::notify::{LoadEvent, StructureLoader};
use cymol_db::rcsb::RcsbService;
use cymol_db::transport::{Reply, Request, Transport};

struct MockTransport {
    replies: Mutex<VecDeque<Result<Reply, CymolError>>>,
}

impl MockTransport {
    fn new(reply: Result<Reply, CymolError>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([reply])),
        })
    }
}

impl Transport for MockTransport {
    async fn execute(
        &self,
        _request: Request,
        cancel: &CancellationToken,
    ) -> Result<Reply, CymolError> {
        if cancel.is_cancelled() {
            return Err(CymolError::Cancelled);
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CymolError::Cancelled))
    }
}

fn ok(body: &'static str) -> Result<Reply, CymolError> {
    Ok(Reply {
        status: 200,
        body: Bytes::from_static(body.as_bytes()),
    })
}

fn refused() -> Result<Reply, CymolError> {
    Err(CymolError::Transport {
        host: RCSB_HOST.to_string(),
        message: "connection refused".to_string(),
    })
}

fn loader(
    reply: Result<Reply, CymolError>,
    policy: TransportErrorPolicy,
) -> (
    StructureLoader<Arc<MockTransport>>,
    mpsc::Receiver<LoadEvent>,
) {
    let (tx, rx) = mpsc::channel(4);
    let service = RcsbService::new(MockTransport::new(reply), Endpoint::new(RCSB_HOST));
    (StructureLoader::new(service, policy, tx), rx)
}

fn id() -> StructureId {
    "1EHZ".parse().unwrap()
}

const ENTRY: &str = "\
ATOM      1  P     G A   1      51.628  43.330  47.806  1.00 71.29           P
ATOM      2  P     C B   1      50.193  40.262  45.052  1.00 64.50           P
";

#[tokio::test]
async fn loaded_entry_publishes_chains_and_raw_text() {
    let (loader, mut rx) = loader(ok(ENTRY), TransportErrorPolicy::Surface);
    loader.load(&id(), &CancellationToken::new()).await;
    drop(loader);

    assert_eq!(
        rx.recv().await,
        Some(LoadEvent::Loaded {
            id: "1EHZ".to_string(),
            raw: ENTRY.to_string(),
            chains: vec!["A".to_string(), "B".to_string()],
        })
    );
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn surfaced_transport_failure_publishes_once() {
    let (loader, mut rx) = loader(refused(), TransportErrorPolicy::Surface);
    loader.load(&id(), &CancellationToken::new()).await;
    drop(loader);

    let event = rx.recv().await.unwrap();
    let LoadEvent::Failed { id, reason } = event else {
        panic!("expected failure event, got {event:?}");
    };
    assert_eq!(id, "1EHZ");
    assert!(reason.contains("connection refused"));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn silent_policy_drops_transport_failure() {
    let (loader, mut rx) = loader(refused(), TransportErrorPolicy::Silent);
    loader.load(&id(), &CancellationToken::new()).await;
    drop(loader);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn parse_failure_is_published_under_any_policy() {
    for policy in [TransportErrorPolicy::Surface, TransportErrorPolicy::Silent] {
        let (loader, mut rx) = loader(ok("not a structure"), policy);
        loader.load(&id(), &CancellationToken::new()).await;
        drop(loader);
        assert_eq!(
            rx.recv().await,
            Some(LoadEvent::Failed {
                id: "1EHZ".to_string(),
                reason: "1EHZ: no ATOM records found".to_string(),
            })
        );
    }
}

#[tokio::test]
async fn cancelled_load_publishes_nothing() {
    let (loader, mut rx) = loader(ok(ENTRY), TransportErrorPolicy::Surface);
    let cancel = CancellationToken::new();
    cancel.cancel();
    loader.load(&id(), &cancel).await;
    drop(loader);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn closed_listener_does_not_fail_the_load() {
    let (loader, rx) = loader(ok(ENTRY), TransportErrorPolicy::Surface);
    drop(rx);
    loader.load(&id(), &CancellationToken::new()).await;
}

#[test]
fn events_serialize_with_tag() {
    let event = LoadEvent::Failed {
        id: "1EHZ".to_string(),
        reason: "Service Temporarily Unavailable".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "failed");
    assert_eq!(json["id"], "1EHZ");
}
