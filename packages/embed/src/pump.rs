//! Channel driver for an [`EmbedHost`].
//!
//! Renders run as spawned tasks so later messages are still read while a
//! save is in flight.

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::{EmbedError, EmbedHost, HostAction, Outbound, SavedState};

/// One raw message with the origin it came from
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub origin: String,
    pub data: Value,
}

impl InboundEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Serve `host` until the inbound channel closes and every started save
/// has been delivered. Returns the host for inspection.
pub async fn pump(
    mut host: EmbedHost,
    mut inbound: mpsc::Receiver<InboundEvent>,
    outbound: mpsc::Sender<Value>,
) -> Result<EmbedHost, EmbedError> {
    let mut in_flight: JoinSet<(u64, SavedState)> = JoinSet::new();

    loop {
        tokio::select! {
            event = inbound.recv() => {
                let Some(event) = event else { break };
                match host.receive(&event.origin, &event.data) {
                    Ok(HostAction::Reply(reply)) => send(&outbound, &reply).await?,
                    Ok(HostAction::Fetch(job)) => {
                        let renderer = host.renderer().clone();
                        in_flight.spawn(async move {
                            let version = job.document_version();
                            (version, job.run(&renderer).await)
                        });
                    }
                    Ok(HostAction::Ignore) => {}
                    Err(e) => error!(error = %e, "Failed to handle message"),
                }
            }
            Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                deliver(&mut host, &outbound, done).await?;
            }
        }
    }

    while let Some(done) = in_flight.join_next().await {
        deliver(&mut host, &outbound, done).await?;
    }
    info!("Parent channel closed");
    Ok(host)
}

async fn deliver(
    host: &mut EmbedHost,
    outbound: &mpsc::Sender<Value>,
    done: Result<(u64, SavedState), tokio::task::JoinError>,
) -> Result<(), EmbedError> {
    match done {
        Ok((version, saved)) => {
            host.complete(Some(version));
            send(outbound, &Outbound::SavedState(saved)).await
        }
        Err(e) => {
            error!(error = %e, "Save task aborted");
            host.complete(None);
            Ok(())
        }
    }
}

async fn send(outbound: &mpsc::Sender<Value>, reply: &Outbound) -> Result<(), EmbedError> {
    outbound
        .send(reply.to_value()?)
        .await
        .map_err(|_| EmbedError::Disconnected)
}
