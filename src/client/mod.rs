//! Typed client for the RacePi backend REST API.
//!
//! Requests are first-class values so the view-models can be exercised
//! without a network: a view-model decides *which* [`ApiRequest`]s to
//! issue, and the fetch layer decides *how* they run.

pub mod types;

use log::debug;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::errors::PaddockError;
use types::{GpsSample, ImuSample, PlotConfig, ResultEnvelope, Session, SettingsIndex};

/// The four plot endpoints the backend can render for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotKind {
    Run,
    Speed,
    Accel,
    Gps,
}

impl PlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Run => "run",
            PlotKind::Speed => "speed",
            PlotKind::Accel => "accel",
            PlotKind::Gps => "gps",
        }
    }
}

/// One backend request, identified by endpoint and parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiRequest {
    Sessions,
    GpsData { session_id: String },
    ImuData { session_id: String },
    Plot { kind: PlotKind, session_id: String },
    SettingsIndex,
    SettingProfile { name: String },
    SaveSettingProfile { name: String, body: String },
    ActivateProfile { name: String },
}

impl ApiRequest {
    /// Path and query string relative to the backend base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            ApiRequest::Sessions => "/data/sessions".to_string(),
            ApiRequest::GpsData { session_id } => format!("/data/gps?session_id={session_id}"),
            ApiRequest::ImuData { session_id } => format!("/data/imu?session_id={session_id}"),
            ApiRequest::Plot { kind, session_id } => {
                format!("/plot/{}?session_id={}", kind.as_str(), session_id)
            }
            ApiRequest::SettingsIndex => "/settings".to_string(),
            ApiRequest::SettingProfile { name } => format!("/settings/{name}"),
            ApiRequest::SaveSettingProfile { name, .. } => format!("/settings/{name}"),
            ApiRequest::ActivateProfile { name } => format!("/active_setting_profile/{name}"),
        }
    }

    /// The session this request is scoped to, if any. Used to drop
    /// responses that arrive after the user navigated to another session.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            ApiRequest::GpsData { session_id }
            | ApiRequest::ImuData { session_id }
            | ApiRequest::Plot { session_id, .. } => Some(session_id),
            _ => None,
        }
    }
}

/// Parsed payload of a completed request.
#[derive(Clone, Debug)]
pub enum ApiResponse {
    Sessions(Vec<Session>),
    GpsData(Vec<GpsSample>),
    ImuData(Vec<ImuSample>),
    Plot { kind: PlotKind, config: PlotConfig },
    SettingsIndex(SettingsIndex),
    SettingProfile { name: String, value: serde_json::Value },
    /// Write or fire-and-forget request completed; body ignored.
    Ack,
}

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, PaddockError> {
        let base = Url::parse(base_url).map_err(|e| PaddockError::InvalidBackendUrl {
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("paddock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PaddockError::HttpError { source: e })?;
        Ok(Self { base, http })
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, PaddockError> {
        match request {
            ApiRequest::Sessions => Ok(ApiResponse::Sessions(self.get_result_list(request).await?)),
            ApiRequest::GpsData { .. } => {
                Ok(ApiResponse::GpsData(self.get_result_list(request).await?))
            }
            ApiRequest::ImuData { .. } => {
                Ok(ApiResponse::ImuData(self.get_result_list(request).await?))
            }
            ApiRequest::Plot { kind, .. } => Ok(ApiResponse::Plot {
                kind: *kind,
                config: self.get_json(request).await?,
            }),
            ApiRequest::SettingsIndex => {
                Ok(ApiResponse::SettingsIndex(self.get_json(request).await?))
            }
            ApiRequest::SettingProfile { name } => Ok(ApiResponse::SettingProfile {
                name: name.clone(),
                value: self.get_json(request).await?,
            }),
            ApiRequest::SaveSettingProfile { body, .. } => {
                self.post_json(request, body).await?;
                Ok(ApiResponse::Ack)
            }
            ApiRequest::ActivateProfile { .. } => {
                self.get_ack(request).await?;
                Ok(ApiResponse::Ack)
            }
        }
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, PaddockError> {
        self.base
            .join(&request.path_and_query())
            .map_err(|e| PaddockError::InvalidBackendUrl {
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, PaddockError> {
        let path = request.path_and_query();
        let url = self.url_for(request)?;
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PaddockError::HttpError { source: e })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::ResponseStatus {
                status: status.as_u16(),
                path,
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| PaddockError::HttpError { source: e })?;
        serde_json::from_slice(&body).map_err(|e| PaddockError::DecodeError { path, source: e })
    }

    async fn get_result_list<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<Vec<T>, PaddockError> {
        Ok(self.get_json::<ResultEnvelope<T>>(request).await?.result)
    }

    async fn get_ack(&self, request: &ApiRequest) -> Result<(), PaddockError> {
        let path = request.path_and_query();
        let url = self.url_for(request)?;
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PaddockError::HttpError { source: e })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::ResponseStatus {
                status: status.as_u16(),
                path,
            });
        }
        Ok(())
    }

    async fn post_json(&self, request: &ApiRequest, body: &str) -> Result<(), PaddockError> {
        let path = request.path_and_query();
        let url = self.url_for(request)?;
        debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .await
            .map_err(|e| PaddockError::HttpError { source: e })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::ResponseStatus {
                status: status.as_u16(),
                path,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_paths_carry_session_query() {
        let gps = ApiRequest::GpsData {
            session_id: "abc123".to_string(),
        };
        assert_eq!(gps.path_and_query(), "/data/gps?session_id=abc123");

        let plot = ApiRequest::Plot {
            kind: PlotKind::Speed,
            session_id: "abc123".to_string(),
        };
        assert_eq!(plot.path_and_query(), "/plot/speed?session_id=abc123");

        assert_eq!(ApiRequest::Sessions.path_and_query(), "/data/sessions");
        assert_eq!(
            ApiRequest::ActivateProfile {
                name: "track_day".to_string()
            }
            .path_and_query(),
            "/active_setting_profile/track_day"
        );
    }

    #[test]
    fn session_scope_only_on_data_requests() {
        let imu = ApiRequest::ImuData {
            session_id: "abc123".to_string(),
        };
        assert_eq!(imu.session_id(), Some("abc123"));
        assert_eq!(ApiRequest::Sessions.session_id(), None);
        assert_eq!(ApiRequest::SettingsIndex.session_id(), None);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(PaddockError::InvalidBackendUrl { .. })
        ));
    }

    #[test]
    fn joins_base_url_with_request_path() {
        let client = ApiClient::new("http://racepi.local:5000").unwrap();
        let url = client
            .url_for(&ApiRequest::GpsData {
                session_id: "abc123".to_string(),
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://racepi.local:5000/data/gps?session_id=abc123"
        );
    }
}
