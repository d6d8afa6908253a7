//! Wire types for the RacePi REST API. Response bodies are parsed into
//! these structs at the boundary; fields the backend may omit or null out
//! are optional, unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope used by the `/data/*` endpoints: `{"result": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: Vec<T>,
}

/// One recorded session, as listed by `/data/sessions`. The summary fields
/// are only present when the backend joins the session_info table.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time_utc: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub num_data_samples: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GpsSample {
    pub session_id: String,
    pub timestamp: f64,
    /// GPS wall-clock time string, as reported by gpsd
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Speed over ground, m/s
    #[serde(default)]
    pub speed: Option<f64>,
    /// Course over ground, degrees from true north
    #[serde(default)]
    pub track: Option<f64>,
    #[serde(default)]
    pub epx: Option<f64>,
    #[serde(default)]
    pub epy: Option<f64>,
    #[serde(default)]
    pub epv: Option<f64>,
    #[serde(default)]
    pub alt: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ImuSample {
    pub session_id: String,
    pub timestamp: f64,
    /// Roll, radians
    #[serde(default)]
    pub r: Option<f64>,
    /// Pitch, radians
    #[serde(default)]
    pub p: Option<f64>,
    /// Yaw, radians
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub x_accel: Option<f64>,
    #[serde(default)]
    pub y_accel: Option<f64>,
    #[serde(default)]
    pub z_accel: Option<f64>,
    #[serde(default)]
    pub x_gyro: Option<f64>,
    #[serde(default)]
    pub y_gyro: Option<f64>,
    #[serde(default)]
    pub z_gyro: Option<f64>,
}

/// A server-rendered plot description as returned by the `/plot/*`
/// endpoints: a list of traces plus a layout object. Equality is deep so
/// the plot adapter can tell whether a re-fetched config actually changed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlotConfig {
    #[serde(default)]
    pub data: Vec<Trace>,
    #[serde(default)]
    pub layout: PlotLayout,
}

/// A single trace within a plot config. The backend rounds values and
/// emits nulls for points it could not compute.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    #[serde(default)]
    pub x: Vec<Option<f64>>,
    #[serde(default)]
    pub y: Vec<Option<f64>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub yaxis: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Layout portion of a plot config. Only the title is interpreted; the
/// rest (axis domains, overlays) rides along for equality comparisons.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlotLayout {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Index of recorder configuration profiles returned by `/settings`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsIndex {
    #[serde(default)]
    pub configuration_profiles: Vec<String>,
}
