//! The dashboard application shell.
//!
//! One egui window: sessions down the left, the selected session's plots
//! and sample tables in the center, recorder settings in a floating
//! window. Fetch completions arrive on an mpsc channel and are drained at
//! the top of every frame.

pub mod details;
pub mod nav;
pub mod sessions;
pub mod settings;

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use egui::{Color32, RichText, Visuals, style::Widgets};
use egui_extras::{Column, TableBuilder};
use itertools::Itertools;
use log::{debug, error};

use crate::client::ApiClient;
use crate::client::types::{GpsSample, ImuSample, PlotConfig};
use crate::config::AppConfig;
use crate::fetch::{FetchEvent, FetchState, HttpFetcher};
use crate::plot::PlotAdapter;
use crate::route::RouteParams;

use details::DetailsViewModel;
use nav::NavState;
use sessions::SessionsViewModel;
use settings::SettingsViewModel;

// consume a few fetch events per frame and then yield to keep the UI responsive
const MAX_EVENTS_PER_REFRESH: usize = 10;
const MAX_TIME_PER_REFRESH_MS: u128 = 50;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

pub struct DashboardApp {
    fetcher: HttpFetcher,
    events: Receiver<FetchEvent>,
    route: RouteParams,
    nav: NavState,
    sessions: SessionsViewModel,
    details: DetailsViewModel,
    settings: SettingsViewModel,
    primary_plot: PlotAdapter,
    secondary_plot: PlotAdapter,
    show_settings: bool,
    last_viewport_width: Option<f32>,
    app_config: AppConfig,
}

impl DashboardApp {
    pub fn new(
        client: ApiClient,
        app_config: AppConfig,
        initial_session: Option<String>,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_MAROON,
            faint_bg_color: PALETTE_BLACK,
            extreme_bg_color: PALETTE_BROWN,
            panel_fill: PALETTE_BLACK,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let (events_tx, events_rx) = mpsc::channel::<FetchEvent>();
        let fetcher = HttpFetcher::new(client, events_tx).with_repaint(cc.egui_ctx.clone());

        let route = RouteParams::new(initial_session.filter(|id| !id.is_empty()));
        let nav = NavState::new(&route);
        let sessions = SessionsViewModel::new(&fetcher);
        let details = DetailsViewModel::new(
            route.session_id().as_deref(),
            app_config.details_variant,
            app_config.show_imu_table,
            &fetcher,
        );
        let settings = SettingsViewModel::new(&fetcher);

        Self {
            fetcher,
            events: events_rx,
            route,
            nav,
            sessions,
            details,
            settings,
            primary_plot: PlotAdapter::new("details-plot-primary"),
            secondary_plot: PlotAdapter::new("details-plot-secondary"),
            show_settings: false,
            last_viewport_width: None,
            app_config,
        }
    }

    fn drain_events(&mut self) {
        let start_refresh = Instant::now();
        let mut processed = 0;
        while let Ok(event) = self.events.try_recv() {
            let routed = self.sessions.apply(&event)
                || self.details.apply(&event)
                || self.settings.apply(&event);
            if !routed {
                debug!("dropping stale fetch event: {:?}", event.request);
            }
            processed += 1;
            if processed >= MAX_EVENTS_PER_REFRESH
                || start_refresh.elapsed().as_millis() >= MAX_TIME_PER_REFRESH_MS
            {
                break;
            }
        }
    }

    /// Rebuilds the details view-model when navigation changed. The old
    /// view-model and its chart adapters are dropped; late responses for
    /// the previous session are rejected by the new one.
    fn sync_route(&mut self) {
        let selected = self.nav.session_id();
        if selected.as_deref() != self.details.session_id() {
            self.details = DetailsViewModel::new(
                selected.as_deref(),
                self.app_config.details_variant,
                self.app_config.show_imu_table,
                &self.fetcher,
            );
            self.primary_plot = PlotAdapter::new("details-plot-primary");
            self.secondary_plot = PlotAdapter::new("details-plot-secondary");
        }
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        let backend = self.app_config.backend_url.clone();
        let mut toggle_settings = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Paddock");
                ui.label(RichText::new(backend).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        toggle_settings = true;
                    }
                });
            });
        });
        if toggle_settings {
            self.show_settings = !self.show_settings;
        }
    }

    fn sessions_panel(&mut self, ctx: &egui::Context) {
        let selected = self.nav.session_id();
        let mut clicked: Option<String> = None;
        egui::SidePanel::left("sessions")
            .default_width(220.)
            .show(ctx, |ui| {
                ui.heading("Sessions");
                ui.separator();
                match &self.sessions.sessions {
                    FetchState::NotStarted => {}
                    FetchState::Loading => {
                        ui.spinner();
                    }
                    FetchState::Failed(message) => {
                        ui.colored_label(PALETTE_ORANGE, message);
                    }
                    FetchState::Loaded(sessions) => {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            for session in sessions {
                                let label = match &session.description {
                                    Some(description) if !description.is_empty() => {
                                        format!("{} ({description})", session.id)
                                    }
                                    _ => session.id.clone(),
                                };
                                let is_selected =
                                    selected.as_deref() == Some(session.id.as_str());
                                if ui.selectable_label(is_selected, label).clicked() {
                                    clicked = Some(session.id.clone());
                                }
                            }
                        });
                    }
                }
            });
        if let Some(id) = clicked {
            self.route.set_session_id(Some(id));
        }
    }

    fn details_panel(&mut self, ctx: &egui::Context) {
        let DashboardApp {
            details,
            primary_plot,
            secondary_plot,
            nav,
            app_config,
            ..
        } = self;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session_id) = nav.session_id() else {
                ui.label(RichText::new("Select a session").weak());
                return;
            };
            ui.heading(format!("Session {session_id}"));
            ui.add_space(4.);
            ui.columns(2, |columns| {
                plot_slot(&mut columns[0], primary_plot, &details.primary_plot);
                plot_slot(&mut columns[1], secondary_plot, &details.secondary_plot);
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("details-tables")
                .show(ui, |ui| {
                    ui.strong("GPS data");
                    match &details.gps {
                        FetchState::NotStarted => {}
                        FetchState::Loading => {
                            ui.spinner();
                        }
                        FetchState::Failed(message) => {
                            ui.colored_label(PALETTE_ORANGE, message);
                        }
                        FetchState::Loaded(samples) => gps_table(ui, samples),
                    }
                    if app_config.show_imu_table {
                        ui.add_space(8.);
                        ui.strong("IMU data");
                        match &details.imu {
                            FetchState::NotStarted => {}
                            FetchState::Loading => {
                                ui.spinner();
                            }
                            FetchState::Failed(message) => {
                                ui.colored_label(PALETTE_ORANGE, message);
                            }
                            FetchState::Loaded(samples) => imu_table(ui, samples),
                        }
                    }
                });
        });
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let DashboardApp {
            settings,
            fetcher,
            show_settings,
            ..
        } = self;
        let mut open = *show_settings;
        egui::Window::new("Recorder settings")
            .open(&mut open)
            .resizable(true)
            .show(ctx, |ui| {
                match &settings.profiles {
                    FetchState::NotStarted => {}
                    FetchState::Loading => {
                        ui.spinner();
                        return;
                    }
                    FetchState::Failed(message) => {
                        ui.colored_label(PALETTE_ORANGE, message);
                        return;
                    }
                    FetchState::Loaded(profiles) => {
                        let profile_names = profiles.iter().sorted().cloned().collect_vec();
                        let mut load_clicked = false;
                        let mut save_clicked = false;
                        ui.horizontal(|ui| {
                            egui::ComboBox::from_id_salt("profile-select")
                                .selected_text(if settings.selected_profile.is_empty() {
                                    "select profile".to_string()
                                } else {
                                    settings.selected_profile.clone()
                                })
                                .show_ui(ui, |ui| {
                                    for name in &profile_names {
                                        ui.selectable_value(
                                            &mut settings.selected_profile,
                                            name.clone(),
                                            name,
                                        );
                                    }
                                });
                            if ui.button("Load").clicked() {
                                load_clicked = true;
                            }
                            if ui.button("Save and activate").clicked() {
                                save_clicked = true;
                            }
                        });
                        if load_clicked {
                            settings.last_error = None;
                            settings.load_fields(fetcher);
                        }
                        if save_clicked {
                            settings.last_error = None;
                            if let Err(e) = settings.save_fields(fetcher) {
                                settings.last_error = Some(e.to_string());
                            }
                        }
                    }
                }
                match &settings.profile {
                    FetchState::Loading => {
                        ui.spinner();
                    }
                    FetchState::Failed(message) => {
                        ui.colored_label(PALETTE_ORANGE, message);
                    }
                    _ => {}
                }
                ui.add(
                    egui::TextEdit::multiline(&mut settings.editor_text)
                        .code_editor()
                        .desired_rows(16)
                        .desired_width(f32::INFINITY),
                );
                if let Some(message) = &settings.last_error {
                    ui.colored_label(PALETTE_ORANGE, message);
                }
            });
        *show_settings = open;
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.sync_route();

        // bind the latest plot configs; unchanged configs are a no-op
        self.primary_plot
            .set_config(self.details.primary_plot.value());
        self.secondary_plot
            .set_config(self.details.secondary_plot.value());

        // window-level resizes propagate to both charts
        let viewport_width = ctx.input(|i| i.screen_rect().width());
        if let Some(last) = self.last_viewport_width
            && last != viewport_width
        {
            self.primary_plot.on_viewport_resize();
            self.secondary_plot.on_viewport_resize();
        }
        self.last_viewport_width = Some(viewport_width);

        if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.app_config.window_position = outer_rect.min.into();
        }

        self.top_panel(ctx);
        self.sessions_panel(ctx);
        self.details_panel(ctx);
        self.settings_window(ctx);
    }
}

fn plot_slot(ui: &mut egui::Ui, adapter: &mut PlotAdapter, state: &FetchState<PlotConfig>) {
    match state {
        FetchState::NotStarted => {
            ui.label(RichText::new("no plot").weak());
        }
        FetchState::Loading => {
            ui.spinner();
        }
        FetchState::Failed(message) => {
            ui.colored_label(PALETTE_ORANGE, message);
        }
        FetchState::Loaded(_) => adapter.show(ui),
    }
}

fn gps_table(ui: &mut egui::Ui, samples: &[GpsSample]) {
    ui.push_id("gps-table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(70.), 7)
            .header(18., |mut header| {
                for title in ["timestamp", "time", "lat", "lon", "speed", "track", "alt"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(16., samples.len(), |mut row| {
                    let sample = &samples[row.index()];
                    row.col(|ui| {
                        ui.label(format!("{:.3}", sample.timestamp));
                    });
                    row.col(|ui| {
                        ui.label(sample.time.clone().unwrap_or_else(|| "-".to_string()));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(sample.lat, 6));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(sample.lon, 6));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(sample.speed, 2));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(sample.track, 1));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(sample.alt, 1));
                    });
                });
            });
    });
}

fn imu_table(ui: &mut egui::Ui, samples: &[ImuSample]) {
    ui.push_id("imu-table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(70.), 7)
            .header(18., |mut header| {
                for title in [
                    "timestamp", "roll", "pitch", "yaw", "x accel", "y accel", "z accel",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(16., samples.len(), |mut row| {
                    let sample = &samples[row.index()];
                    row.col(|ui| {
                        ui.label(format!("{:.3}", sample.timestamp));
                    });
                    for value in [
                        sample.r,
                        sample.p,
                        sample.y,
                        sample.x_accel,
                        sample.y_accel,
                        sample.z_accel,
                    ] {
                        row.col(|ui| {
                            ui.label(fmt_opt(value, 4));
                        });
                    }
                });
            });
    });
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_opt_formats_present_values() {
        assert_eq!(fmt_opt(Some(35.123456789), 6), "35.123457");
        assert_eq!(fmt_opt(Some(31.25), 2), "31.25");
        assert_eq!(fmt_opt(None, 2), "-");
    }
}
