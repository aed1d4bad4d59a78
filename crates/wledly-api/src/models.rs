// WLED JSON API wire types
//
// Only the fields this crate reads or patches are modelled. Unknown fields
// are ignored on input so newer firmware doesn't break deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Preset key WLED reserves for "no preset" in `/presets.json`.
pub const RESERVED_PRESET_KEY: &str = "0";

// ── /json/info ──────────────────────────────────────────────────────

/// Device metadata from `GET /json/info`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Firmware version.
    #[serde(default)]
    pub ver: String,
    /// Friendly name configured on the device.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub udpport: u16,
    /// Realtime (UDP/E1.31) data is currently overriding effects.
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub fxcount: u32,
    #[serde(default)]
    pub palcount: u32,
    pub mac: Option<String>,
    pub arch: Option<String>,
    pub core: Option<String>,
    pub lwip: Option<u32>,
    pub maxleds: Option<u32>,
    pub brand: Option<String>,
    pub product: Option<String>,
}

impl DeviceInfo {
    /// The self-reported name, if the device actually has one.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

// ── /json/state ─────────────────────────────────────────────────────

/// Nightlight sub-state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NightLight {
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub dur: u32,
    #[serde(default)]
    pub mode: u8,
    #[serde(default)]
    pub tbri: u8,
    #[serde(default)]
    pub rem: i32,
}

/// UDP sync sub-state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UdpSync {
    #[serde(default)]
    pub send: bool,
    #[serde(default)]
    pub recv: bool,
}

/// One LED segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub id: u8,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub stop: u32,
    #[serde(default)]
    pub len: u32,
    #[serde(default)]
    pub col: Vec<Vec<u8>>,
    #[serde(default)]
    pub fx: u16,
    #[serde(default)]
    pub sx: u8,
    #[serde(default)]
    pub ix: u8,
    #[serde(default)]
    pub pal: u16,
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub bri: u8,
}

/// Current device state from `GET /json/state`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    pub on: bool,
    #[serde(default)]
    pub bri: u8,
    /// Active preset, `-1` for none.
    #[serde(default = "none_selected")]
    pub ps: i16,
    /// Active playlist, `-1` for none.
    #[serde(default = "none_selected")]
    pub pl: i16,
    #[serde(default)]
    pub nl: NightLight,
    #[serde(default)]
    pub udpn: UdpSync,
    #[serde(default)]
    pub lor: u8,
    #[serde(default)]
    pub mainseg: u8,
    pub seg: Option<Vec<Segment>>,
}

fn none_selected() -> i16 {
    -1
}

// ── POST /json/state ────────────────────────────────────────────────

/// Value of the `on` field in a state patch.
///
/// WLED only exposes toggle as the string sentinel `"t"`; a client can't
/// compute the boolean without a read-modify-write race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSetting {
    On,
    Off,
    Toggle,
}

impl Serialize for PowerSetting {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::On => serializer.serialize_bool(true),
            Self::Off => serializer.serialize_bool(false),
            Self::Toggle => serializer.serialize_str("t"),
        }
    }
}

/// Partial state update. Only `Some` fields are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<PowerSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u16>,
}

impl StatePatch {
    pub fn power(setting: PowerSetting) -> Self {
        Self {
            on: Some(setting),
            ..Self::default()
        }
    }

    pub fn preset(id: u16) -> Self {
        Self {
            ps: Some(id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.bri.is_none() && self.ps.is_none()
    }
}

// ── /presets.json ───────────────────────────────────────────────────

/// One raw entry in `/presets.json`. Most fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetEntry {
    pub n: Option<String>,
}

/// Raw `/presets.json` body: string-encoded numeric keys to entries.
pub type PresetMap = HashMap<String, PresetEntry>;

/// A user preset, as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: u16,
    pub name: String,
}

/// Drop the reserved and non-numeric keys, fill in missing names, and
/// sort ascending by id.
pub fn presets_from_map(map: PresetMap) -> Vec<Preset> {
    let mut presets: Vec<Preset> = map
        .into_iter()
        .filter(|(key, _)| key != RESERVED_PRESET_KEY)
        .filter_map(|(key, entry)| {
            let id = key.parse::<u16>().ok().filter(|id| *id > 0)?;
            let name = entry
                .n
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Preset {id}"));
            Some(Preset { id, name })
        })
        .collect();
    presets.sort_by_key(|p| p.id);
    presets
}
