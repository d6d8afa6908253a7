//! View-model for the session details view.
//!
//! Construction with a non-empty session id issues the session-scoped
//! fetches concurrently; each result lands in its own field whenever it
//! arrives, so the view renders partial data (GPS table before plots, or
//! the other way around) without caring about completion order. Without a
//! session id nothing is fetched.

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::client::types::{GpsSample, ImuSample, PlotConfig};
use crate::client::{ApiRequest, ApiResponse, PlotKind};
use crate::fetch::{FetchEvent, FetchState, Fetcher};

/// Which pair of plots the details view shows. Both layouts existed in
/// the original dashboards; neither superseded the other cleanly, so the
/// choice is configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum DetailsVariant {
    /// Run overview and speed comparison plots
    RunSpeed,
    /// Acceleration and GPS track plots
    #[default]
    AccelGps,
}

impl DetailsVariant {
    /// Primary and secondary plot endpoints for this layout.
    pub fn plot_kinds(&self) -> [PlotKind; 2] {
        match self {
            DetailsVariant::RunSpeed => [PlotKind::Run, PlotKind::Speed],
            DetailsVariant::AccelGps => [PlotKind::Accel, PlotKind::Gps],
        }
    }
}

pub struct DetailsViewModel {
    session_id: Option<String>,
    variant: DetailsVariant,
    pub gps: FetchState<Vec<GpsSample>>,
    pub imu: FetchState<Vec<ImuSample>>,
    pub primary_plot: FetchState<PlotConfig>,
    pub secondary_plot: FetchState<PlotConfig>,
}

impl DetailsViewModel {
    pub fn new(
        session_id: Option<&str>,
        variant: DetailsVariant,
        fetch_imu: bool,
        fetcher: &dyn Fetcher,
    ) -> Self {
        let mut vm = Self {
            session_id: None,
            variant,
            gps: FetchState::NotStarted,
            imu: FetchState::NotStarted,
            primary_plot: FetchState::NotStarted,
            secondary_plot: FetchState::NotStarted,
        };
        // session-scoped fields stay unset until a session is known
        let Some(id) = session_id.filter(|id| !id.is_empty()) else {
            return vm;
        };
        vm.session_id = Some(id.to_owned());

        let [primary, secondary] = variant.plot_kinds();
        fetcher.submit(ApiRequest::GpsData {
            session_id: id.to_owned(),
        });
        vm.gps = FetchState::Loading;
        fetcher.submit(ApiRequest::Plot {
            kind: primary,
            session_id: id.to_owned(),
        });
        vm.primary_plot = FetchState::Loading;
        fetcher.submit(ApiRequest::Plot {
            kind: secondary,
            session_id: id.to_owned(),
        });
        vm.secondary_plot = FetchState::Loading;
        if fetch_imu {
            fetcher.submit(ApiRequest::ImuData {
                session_id: id.to_owned(),
            });
            vm.imu = FetchState::Loading;
        }
        vm
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn variant(&self) -> DetailsVariant {
        self.variant
    }

    /// Routes a fetch completion into this view-model. Events scoped to a
    /// different session are rejected, which is what keeps a slow response
    /// for a previously selected session from clobbering the current one.
    pub fn apply(&mut self, event: &FetchEvent) -> bool {
        let Some(own) = self.session_id.as_deref() else {
            return false;
        };
        if event.session_id() != Some(own) {
            return false;
        }
        match &event.request {
            ApiRequest::GpsData { .. } => {
                self.gps = match &event.result {
                    Ok(ApiResponse::GpsData(samples)) => FetchState::Loaded(samples.clone()),
                    Ok(other) => {
                        warn!("unexpected payload for gps fetch: {other:?}");
                        return true;
                    }
                    Err(message) => FetchState::Failed(message.clone()),
                };
            }
            ApiRequest::ImuData { .. } => {
                self.imu = match &event.result {
                    Ok(ApiResponse::ImuData(samples)) => FetchState::Loaded(samples.clone()),
                    Ok(other) => {
                        warn!("unexpected payload for imu fetch: {other:?}");
                        return true;
                    }
                    Err(message) => FetchState::Failed(message.clone()),
                };
            }
            ApiRequest::Plot { kind, .. } => {
                let [primary, secondary] = self.variant.plot_kinds();
                let slot = if *kind == primary {
                    &mut self.primary_plot
                } else if *kind == secondary {
                    &mut self.secondary_plot
                } else {
                    return false;
                };
                *slot = match &event.result {
                    Ok(ApiResponse::Plot { config, .. }) => FetchState::Loaded(config.clone()),
                    Ok(other) => {
                        warn!("unexpected payload for plot fetch: {other:?}");
                        return true;
                    }
                    Err(message) => FetchState::Failed(message.clone()),
                };
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::RecordingFetcher;

    #[test]
    fn issues_three_fetches_scoped_to_the_session() {
        let fetcher = RecordingFetcher::default();
        let vm = DetailsViewModel::new(
            Some("abc123"),
            DetailsVariant::AccelGps,
            false,
            &fetcher,
        );

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert!(
                request.path_and_query().contains("session_id=abc123"),
                "missing session scope: {request:?}"
            );
        }
        assert!(requests.contains(&ApiRequest::GpsData {
            session_id: "abc123".to_string()
        }));
        assert!(requests.contains(&ApiRequest::Plot {
            kind: PlotKind::Accel,
            session_id: "abc123".to_string()
        }));
        assert!(requests.contains(&ApiRequest::Plot {
            kind: PlotKind::Gps,
            session_id: "abc123".to_string()
        }));
        assert!(vm.gps.is_loading());
        assert!(vm.primary_plot.is_loading());
        assert!(vm.secondary_plot.is_loading());
        assert_eq!(vm.imu, FetchState::NotStarted);
    }

    #[test]
    fn run_speed_variant_uses_its_own_plot_endpoints() {
        let fetcher = RecordingFetcher::default();
        let _vm = DetailsViewModel::new(
            Some("abc123"),
            DetailsVariant::RunSpeed,
            false,
            &fetcher,
        );
        let requests = fetcher.requests();
        assert!(requests.contains(&ApiRequest::Plot {
            kind: PlotKind::Run,
            session_id: "abc123".to_string()
        }));
        assert!(requests.contains(&ApiRequest::Plot {
            kind: PlotKind::Speed,
            session_id: "abc123".to_string()
        }));
    }

    #[test]
    fn no_session_means_no_fetches() {
        let fetcher = RecordingFetcher::default();
        let vm = DetailsViewModel::new(None, DetailsVariant::AccelGps, true, &fetcher);
        assert!(fetcher.requests().is_empty());
        assert_eq!(vm.gps, FetchState::NotStarted);
        assert_eq!(vm.imu, FetchState::NotStarted);
        assert_eq!(vm.primary_plot, FetchState::NotStarted);
        assert_eq!(vm.secondary_plot, FetchState::NotStarted);

        let fetcher = RecordingFetcher::default();
        let _vm = DetailsViewModel::new(Some(""), DetailsVariant::AccelGps, true, &fetcher);
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn imu_table_adds_a_fourth_fetch() {
        let fetcher = RecordingFetcher::default();
        let vm = DetailsViewModel::new(Some("abc123"), DetailsVariant::AccelGps, true, &fetcher);
        assert_eq!(fetcher.requests().len(), 4);
        assert!(vm.imu.is_loading());
    }

    #[test]
    fn fields_resolve_independently_of_delivery_order() {
        let fetcher = RecordingFetcher::default();
        let mut vm =
            DetailsViewModel::new(Some("abc123"), DetailsVariant::AccelGps, false, &fetcher);

        // secondary plot arrives first
        vm.apply(&FetchEvent {
            request: ApiRequest::Plot {
                kind: PlotKind::Gps,
                session_id: "abc123".to_string(),
            },
            result: Ok(ApiResponse::Plot {
                kind: PlotKind::Gps,
                config: PlotConfig::default(),
            }),
        });
        assert!(vm.secondary_plot.value().is_some());
        assert!(vm.gps.is_loading());
        assert!(vm.primary_plot.is_loading());

        // gps data fails while the primary plot is still in flight
        vm.apply(&FetchEvent {
            request: ApiRequest::GpsData {
                session_id: "abc123".to_string(),
            },
            result: Err("timeout".to_string()),
        });
        assert_eq!(vm.gps.error(), Some("timeout"));
        assert!(vm.primary_plot.is_loading());
        assert!(vm.secondary_plot.value().is_some());
    }

    #[test]
    fn stale_session_events_are_dropped() {
        let fetcher = RecordingFetcher::default();
        let mut vm =
            DetailsViewModel::new(Some("new-session"), DetailsVariant::AccelGps, false, &fetcher);

        let applied = vm.apply(&FetchEvent {
            request: ApiRequest::GpsData {
                session_id: "old-session".to_string(),
            },
            result: Ok(ApiResponse::GpsData(vec![GpsSample {
                session_id: "old-session".to_string(),
                ..Default::default()
            }])),
        });
        assert!(!applied);
        assert!(vm.gps.is_loading());
    }
}
