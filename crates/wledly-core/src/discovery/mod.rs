// ── LAN discovery ──
//
// One multicast query per scan. Responses arrive as an event stream from
// an `MdnsQuerier`; address records are pulled from both the answer and
// additional sections and collapsed by address. Scans never fail: a
// broken query ends the scan early with whatever was collected.

mod mdns;

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::DiscoveredDevice;

pub use mdns::MdnsSdQuerier;

// ── Wire-level view ──────────────────────────────────────────────

/// Payload of one resource record. Only address records matter here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdnsRecord {
    /// Owner name, e.g. `wled-kitchen.local`.
    pub name: String,
    pub data: RecordData,
}

impl MdnsRecord {
    pub fn a(name: impl Into<String>, addr: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            data: RecordData::A(addr),
        }
    }
}

/// One inbound mDNS response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MdnsResponse {
    pub answers: Vec<MdnsRecord>,
    pub additionals: Vec<MdnsRecord>,
}

#[derive(Debug)]
pub enum QueryEvent {
    Response(MdnsResponse),
    /// The query mechanism broke. No further events follow.
    Failed(String),
}

// ── Query handle ─────────────────────────────────────────────────

/// A running query. Dropping it releases the underlying resource.
pub struct MdnsQuery {
    events: mpsc::UnboundedReceiver<QueryEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl MdnsQuery {
    pub fn new(
        events: mpsc::UnboundedReceiver<QueryEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            events,
            release: Some(Box::new(release)),
        }
    }

    /// Next event, or `None` once the querier has gone away.
    pub async fn next(&mut self) -> Option<QueryEvent> {
        self.events.recv().await
    }

    /// Stop the query. Idempotent.
    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for MdnsQuery {
    fn drop(&mut self) {
        self.release();
    }
}

/// Something that can issue a multicast query for a service name.
pub trait MdnsQuerier: Send + Sync {
    fn query(&self, service: &str) -> Result<MdnsQuery, CoreError>;
}

// ── Scanner ──────────────────────────────────────────────────────

/// Collects discovered devices keyed by address; the first name wins.
#[derive(Debug, Default)]
struct Sightings {
    order: Vec<String>,
    by_address: HashMap<String, String>,
}

impl Sightings {
    fn record(&mut self, response: &MdnsResponse) {
        for record in response.answers.iter().chain(&response.additionals) {
            let RecordData::A(addr) = record.data else {
                continue;
            };
            let address = addr.to_string();
            if self.by_address.contains_key(&address) {
                continue;
            }
            debug!(%address, name = %record.name, "discovered controller");
            self.by_address
                .insert(address.clone(), strip_local_suffix(&record.name).to_owned());
            self.order.push(address);
        }
    }

    fn into_devices(mut self) -> Vec<DiscoveredDevice> {
        self.order
            .into_iter()
            .filter_map(|address| {
                let name = self.by_address.remove(&address)?;
                Some(DiscoveredDevice { address, name })
            })
            .collect()
    }
}

/// Drop the `.local` domain from an announced host name.
pub fn strip_local_suffix(name: &str) -> &str {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    trimmed.strip_suffix(".local").unwrap_or(trimmed)
}

/// Finds WLED controllers on the local network.
#[derive(Clone)]
pub struct DiscoveryScanner {
    querier: Arc<dyn MdnsQuerier>,
    service: String,
}

impl DiscoveryScanner {
    pub fn new(querier: Arc<dyn MdnsQuerier>, service: impl Into<String>) -> Self {
        Self {
            querier,
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Listen for `budget` and return every distinct device that answered,
    /// in order of first sighting.
    pub async fn scan(&self, budget: Duration) -> Vec<DiscoveredDevice> {
        let mut query = match self.querier.query(&self.service) {
            Ok(query) => query,
            Err(e) => {
                warn!(service = %self.service, error = %e, "could not start discovery query");
                return Vec::new();
            }
        };

        let mut sightings = Sightings::default();
        let deadline = tokio::time::sleep(budget);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                () = &mut deadline => break,
                event = query.next() => match event {
                    Some(QueryEvent::Response(response)) => sightings.record(&response),
                    Some(QueryEvent::Failed(reason)) => {
                        warn!(service = %self.service, %reason, "discovery query failed, returning partial results");
                        break;
                    }
                    None => {
                        debug!("discovery event stream closed");
                        break;
                    }
                },
            }
        }

        query.release();
        let devices = sightings.into_devices();
        debug!(count = devices.len(), "scan complete");
        devices
    }
}
