// WLED JSON API client
//
// One DeviceClient per controller address. Each public method is exactly
// one HTTP request with its own timeout -- no retries, no read-back.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::address::DeviceAddress;
use crate::error::Error;
use crate::models::{
    DeviceInfo, DeviceState, PowerSetting, Preset, PresetMap, StatePatch, presets_from_map,
};
use crate::transport::{RequestTimeouts, TransportConfig};

/// Builds [`DeviceClient`]s that share one `reqwest::Client` and one set
/// of timeouts. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DeviceConnector {
    http: reqwest::Client,
    timeouts: RequestTimeouts,
}

impl DeviceConnector {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeouts: transport.timeouts,
        })
    }

    /// A client for one controller address.
    pub fn connect(&self, address: &str) -> Result<DeviceClient, Error> {
        DeviceClient::with_client(self.http.clone(), address, self.timeouts)
    }

    pub fn timeouts(&self) -> &RequestTimeouts {
        &self.timeouts
    }
}

/// HTTP client for a single WLED controller.
///
/// Cheap to construct: pass a shared `reqwest::Client` through
/// [`with_client`](Self::with_client) when talking to many devices.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    address: DeviceAddress,
    base_url: Url,
    timeouts: RequestTimeouts,
}

impl DeviceClient {
    /// Create a client for `address` with its own HTTP client.
    pub fn new(address: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, address, transport.timeouts)
    }

    /// Create a client reusing a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        address: &str,
        timeouts: RequestTimeouts,
    ) -> Result<Self, Error> {
        let address = DeviceAddress::parse(address);
        let base_url = address.base_url()?;
        Ok(Self {
            http,
            address,
            base_url,
            timeouts,
        })
    }

    /// Replace the per-operation timeouts.
    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeouts(&self) -> &RequestTimeouts {
        &self.timeouts
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Device metadata.
    ///
    /// `GET /json/info`
    pub async fn get_info(&self) -> Result<DeviceInfo, Error> {
        self.get_info_within(self.timeouts.info).await
    }

    /// [`get_info`](Self::get_info) with a caller-chosen bound.
    pub async fn get_info_within(&self, timeout: Duration) -> Result<DeviceInfo, Error> {
        self.get_json("json/info", timeout).await
    }

    /// Current state snapshot.
    ///
    /// `GET /json/state`
    pub async fn get_state(&self) -> Result<DeviceState, Error> {
        self.get_json("json/state", self.timeouts.state).await
    }

    /// User presets, reserved key dropped, sorted by id.
    ///
    /// `GET /presets.json`
    pub async fn get_presets(&self) -> Result<Vec<Preset>, Error> {
        let map: PresetMap = self.get_json("presets.json", self.timeouts.presets).await?;
        Ok(presets_from_map(map))
    }

    /// `true` if the device answers `/json/info` within the probe bound.
    /// Never fails.
    pub async fn is_online(&self) -> bool {
        match self.get_info_within(self.timeouts.probe).await {
            Ok(_) => true,
            Err(e) => {
                debug!(address = %self.address, error = %e, "device offline");
                false
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a partial state patch.
    ///
    /// `POST /json/state`
    pub async fn set_state(&self, patch: &StatePatch) -> Result<(), Error> {
        let url = self.url("json/state")?;
        debug!(address = %self.address, ?patch, "POST {}", url);

        let request = self.http.post(url).json(patch);
        self.send(request, self.timeouts.command).await?;
        Ok(())
    }

    /// Flip power using the device-side toggle sentinel.
    ///
    /// Always sends `{"on":"t"}`, never a computed boolean.
    pub async fn toggle_power(&self) -> Result<(), Error> {
        self.set_state(&StatePatch::power(PowerSetting::Toggle)).await
    }

    /// Switch power on or off explicitly.
    pub async fn set_power(&self, on: bool) -> Result<(), Error> {
        let setting = if on { PowerSetting::On } else { PowerSetting::Off };
        self.set_state(&StatePatch::power(setting)).await
    }

    /// Activate a stored preset.
    pub async fn activate_preset(&self, id: u16) -> Result<(), Error> {
        self.set_state(&StatePatch::preset(id)).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!(address = %self.address, "GET {}", url);

        let resp = self.send(self.http.get(url), timeout).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e, timeout))?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            address: self.address.to_string(),
            message: e.to_string(),
            body,
        })
    }

    /// Send with a per-request bound and reject non-2xx statuses.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<reqwest::Response, Error> {
        let resp = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                address: self.address.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    fn transport_error(&self, err: reqwest::Error, timeout: Duration) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                address: self.address.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Unreachable {
                address: self.address.to_string(),
                source: err,
            }
        }
    }
}
