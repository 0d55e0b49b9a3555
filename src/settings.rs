//! Player settings and their persisted JSON form.
//!
//! The stored blob is a flat object:
//! `{"drawMode": 1|3, "timed": bool, "hintsEnabled": bool, "animationsEnabled": bool}`.
//! There is no schema version. Loading is deliberately forgiving: every
//! field is read on its own, and a missing, mistyped or out-of-range value
//! falls back to that field's default without disturbing the others.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// How many cards a single draw takes from the stock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DrawMode {
    #[default]
    One,
    Three,
}

impl DrawMode {
    /// Cards per draw.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }

    /// Flat score penalty per draw, however many cards were actually drawn.
    #[inline]
    pub fn penalty(self) -> u32 {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DrawMode::One => DrawMode::Three,
            DrawMode::Three => DrawMode::One,
        }
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(DrawMode::One),
            3 => Ok(DrawMode::Three),
            other => Err(format!("draw mode must be 1 or 3, got {other}")),
        }
    }
}

impl From<DrawMode> for u8 {
    fn from(mode: DrawMode) -> u8 {
        mode.count() as u8
    }
}

/// User-facing game options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub draw_mode: DrawMode,
    pub timed: bool,
    pub hints_enabled: bool,
    pub animations_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            draw_mode: DrawMode::One,
            timed: false,
            hints_enabled: true,
            animations_enabled: true,
        }
    }
}

impl Settings {
    /// Parse a stored blob, defaulting each unreadable field independently.
    pub fn from_json_lenient(raw: &str) -> Self {
        let defaults = Settings::default();
        let Some(obj) = parse_object(raw, "settings") else {
            return defaults;
        };
        Settings {
            draw_mode: field(&obj, "drawMode").unwrap_or(defaults.draw_mode),
            timed: field(&obj, "timed").unwrap_or(defaults.timed),
            hints_enabled: field(&obj, "hintsEnabled").unwrap_or(defaults.hints_enabled),
            animations_enabled: field(&obj, "animationsEnabled")
                .unwrap_or(defaults.animations_enabled),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse `raw` as a JSON object, logging and returning `None` otherwise.
pub(crate) fn parse_object(raw: &str, what: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => Some(obj),
        Ok(other) => {
            warn!(what, found = %other, "stored blob is not an object; using defaults");
            None
        }
        Err(err) => {
            warn!(what, %err, "could not parse stored blob; using defaults");
            None
        }
    }
}

/// Read one field, or `None` if it is absent or does not decode as `T`.
pub(crate) fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}
