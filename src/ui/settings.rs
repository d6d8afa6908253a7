//! View-model for recorder configuration profiles.
//!
//! Mirrors the original settings screen: list profiles, load one into an
//! editable JSON document, save it back and activate it. Save and
//! activate are fire-and-forget; their failures are only reported, never
//! retried.

use log::warn;
use serde_json::Value;

use crate::client::{ApiRequest, ApiResponse};
use crate::errors::PaddockError;
use crate::fetch::{FetchEvent, FetchState, Fetcher};

pub struct SettingsViewModel {
    pub profiles: FetchState<Vec<String>>,
    pub selected_profile: String,
    pub profile: FetchState<Value>,
    pub editor_text: String,
    pub last_error: Option<String>,
}

impl SettingsViewModel {
    pub fn new(fetcher: &dyn Fetcher) -> Self {
        fetcher.submit(ApiRequest::SettingsIndex);
        Self {
            profiles: FetchState::Loading,
            selected_profile: String::new(),
            profile: FetchState::NotStarted,
            editor_text: String::new(),
            last_error: None,
        }
    }

    /// Fetches the selected profile into the editor.
    pub fn load_fields(&mut self, fetcher: &dyn Fetcher) {
        if self.selected_profile.is_empty() {
            return;
        }
        self.profile = FetchState::Loading;
        fetcher.submit(ApiRequest::SettingProfile {
            name: self.selected_profile.clone(),
        });
    }

    /// Saves the editor content back to the selected profile and marks it
    /// active. Fails fast when the editor does not hold valid JSON.
    pub fn save_fields(&mut self, fetcher: &dyn Fetcher) -> Result<(), PaddockError> {
        if self.selected_profile.is_empty() {
            return Ok(());
        }
        let value: Value = serde_json::from_str(&self.editor_text)
            .map_err(|e| PaddockError::InvalidProfileJson { source: e })?;
        let body = value.to_string();
        fetcher.submit(ApiRequest::SaveSettingProfile {
            name: self.selected_profile.clone(),
            body,
        });
        fetcher.submit(ApiRequest::ActivateProfile {
            name: self.selected_profile.clone(),
        });
        self.profile = FetchState::Loaded(value);
        Ok(())
    }

    /// Routes a fetch completion into this view-model. Returns false when
    /// the event belongs to someone else.
    pub fn apply(&mut self, event: &FetchEvent) -> bool {
        match &event.request {
            ApiRequest::SettingsIndex => {
                match &event.result {
                    Ok(ApiResponse::SettingsIndex(index)) => {
                        self.profiles = FetchState::Loaded(index.configuration_profiles.clone());
                    }
                    Ok(other) => warn!("unexpected payload for settings index: {other:?}"),
                    Err(message) => self.profiles = FetchState::Failed(message.clone()),
                }
                true
            }
            ApiRequest::SettingProfile { name } => {
                // a load for a profile the user already navigated away from
                if *name != self.selected_profile {
                    return false;
                }
                match &event.result {
                    Ok(ApiResponse::SettingProfile { value, .. }) => {
                        self.editor_text =
                            serde_json::to_string_pretty(value).unwrap_or_default();
                        self.profile = FetchState::Loaded(value.clone());
                    }
                    Ok(other) => warn!("unexpected payload for profile fetch: {other:?}"),
                    Err(message) => self.profile = FetchState::Failed(message.clone()),
                }
                true
            }
            ApiRequest::SaveSettingProfile { name, .. }
            | ApiRequest::ActivateProfile { name } => {
                if let Err(message) = &event.result {
                    warn!("settings write for {name} failed: {message}");
                    self.last_error = Some(message.clone());
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::SettingsIndex;
    use crate::fetch::testing::RecordingFetcher;

    #[test]
    fn fetches_profile_index_on_construction() {
        let fetcher = RecordingFetcher::default();
        let vm = SettingsViewModel::new(&fetcher);
        assert_eq!(fetcher.requests(), vec![ApiRequest::SettingsIndex]);
        assert!(vm.profiles.is_loading());
    }

    #[test]
    fn load_fetches_the_selected_profile() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.selected_profile = "track_day".to_string();
        vm.load_fields(&fetcher);

        assert_eq!(
            fetcher.requests().last(),
            Some(&ApiRequest::SettingProfile {
                name: "track_day".to_string()
            })
        );

        vm.apply(&FetchEvent {
            request: ApiRequest::SettingProfile {
                name: "track_day".to_string(),
            },
            result: Ok(ApiResponse::SettingProfile {
                name: "track_day".to_string(),
                value: serde_json::json!({"can_enabled": true}),
            }),
        });
        assert!(vm.editor_text.contains("can_enabled"));
        assert!(vm.profile.value().is_some());
    }

    #[test]
    fn load_without_selection_is_a_no_op() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.load_fields(&fetcher);
        assert_eq!(fetcher.requests().len(), 1); // just the index fetch
    }

    #[test]
    fn save_posts_then_activates() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.selected_profile = "track_day".to_string();
        vm.editor_text = r#"{"can_enabled": false}"#.to_string();
        vm.save_fields(&fetcher).unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 3);
        assert!(matches!(
            &requests[1],
            ApiRequest::SaveSettingProfile { name, body }
                if name == "track_day" && body.contains("can_enabled")
        ));
        assert_eq!(
            requests[2],
            ApiRequest::ActivateProfile {
                name: "track_day".to_string()
            }
        );
    }

    #[test]
    fn save_rejects_invalid_json() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.selected_profile = "track_day".to_string();
        vm.editor_text = "{not json".to_string();
        assert!(matches!(
            vm.save_fields(&fetcher),
            Err(PaddockError::InvalidProfileJson { .. })
        ));
        assert_eq!(fetcher.requests().len(), 1); // nothing submitted
    }

    #[test]
    fn profile_load_for_stale_selection_is_dropped() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.selected_profile = "autocross".to_string();

        let applied = vm.apply(&FetchEvent {
            request: ApiRequest::SettingProfile {
                name: "track_day".to_string(),
            },
            result: Ok(ApiResponse::SettingProfile {
                name: "track_day".to_string(),
                value: serde_json::json!({}),
            }),
        });
        assert!(!applied);
        assert_eq!(vm.profile, FetchState::NotStarted);
    }

    #[test]
    fn index_resolves_into_profiles() {
        let fetcher = RecordingFetcher::default();
        let mut vm = SettingsViewModel::new(&fetcher);
        vm.apply(&FetchEvent {
            request: ApiRequest::SettingsIndex,
            result: Ok(ApiResponse::SettingsIndex(SettingsIndex {
                configuration_profiles: vec!["track_day".to_string(), "autocross".to_string()],
            })),
        });
        assert_eq!(
            vm.profiles.value().map(Vec::len),
            Some(2)
        );
    }
}
