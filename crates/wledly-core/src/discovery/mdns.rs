use std::net::IpAddr;

use mdns_sd::{ServiceDaemon, ServiceEvent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{MdnsQuerier, MdnsQuery, MdnsRecord, MdnsResponse, QueryEvent};
use crate::error::CoreError;

/// [`MdnsQuerier`] backed by the `mdns-sd` daemon.
///
/// Each query owns its own daemon; releasing the query stops the browse
/// and shuts the daemon down.
#[derive(Debug, Default, Clone, Copy)]
pub struct MdnsSdQuerier;

impl MdnsSdQuerier {
    pub fn new() -> Self {
        Self
    }
}

impl MdnsQuerier for MdnsSdQuerier {
    fn query(&self, service: &str) -> Result<MdnsQuery, CoreError> {
        let daemon = ServiceDaemon::new().map_err(|e| CoreError::Discovery {
            message: e.to_string(),
        })?;
        let receiver = daemon.browse(service).map_err(|e| CoreError::Discovery {
            message: e.to_string(),
        })?;

        let (tx, rx) = mpsc::unbounded_channel();

        // The daemon hands out a blocking receiver; pump it on the blocking
        // pool until the browse stops or the daemon goes away.
        tokio::task::spawn_blocking(move || {
            loop {
                let event = match receiver.recv() {
                    Ok(event) => event,
                    Err(e) => {
                        debug!(error = %e, "mdns receiver closed");
                        break;
                    }
                };
                match event {
                    ServiceEvent::ServiceResolved(info) => {
                        let host = info.get_hostname().to_owned();
                        let answers = info
                            .get_addresses()
                            .iter()
                            .filter_map(|addr| match addr {
                                IpAddr::V4(v4) => Some(MdnsRecord::a(host.clone(), *v4)),
                                IpAddr::V6(_) => None,
                            })
                            .collect();
                        let response = MdnsResponse {
                            answers,
                            additionals: Vec::new(),
                        };
                        if tx.send(QueryEvent::Response(response)).is_err() {
                            break;
                        }
                    }
                    ServiceEvent::SearchStopped(_) => break,
                    _ => {}
                }
            }
        });

        let service = service.to_owned();
        Ok(MdnsQuery::new(rx, move || {
            if let Err(e) = daemon.stop_browse(&service) {
                debug!(error = %e, "stop_browse failed");
            }
            if let Err(e) = daemon.shutdown() {
                warn!(error = %e, "mdns daemon shutdown failed");
            }
        }))
    }
}
