//! Binds a server-rendered `{data, layout}` plot configuration to a
//! native egui_plot chart.
//!
//! The adapter owns all per-chart state: feeding it a config that deep-
//! compares equal to the bound one is a no-op, a changed config rebuilds
//! the plotted series exactly once, and width changes only trigger a
//! resize pass after the chart has been initialized. Dropping the adapter
//! releases everything; nothing global is registered.

use egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::debug;

use crate::client::types::PlotConfig;

pub struct PlotAdapter {
    id: String,
    config: Option<PlotConfig>,
    series: Vec<PreparedSeries>,
    title: Option<String>,
    initialized: bool,
    last_width: Option<f32>,
    redraws: usize,
    resizes: usize,
}

struct PreparedSeries {
    name: String,
    points: Vec<[f64; 2]>,
}

impl PlotAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: None,
            series: Vec::new(),
            title: None,
            initialized: false,
            last_width: None,
            redraws: 0,
            resizes: 0,
        }
    }

    /// Feed the latest configuration. An absent config is a no-op and any
    /// previously bound chart stays up; a changed config rebuilds the
    /// plotted series and counts one redraw.
    pub fn set_config(&mut self, config: Option<&PlotConfig>) {
        let Some(config) = config else {
            return;
        };
        if self.initialized && self.config.as_ref() == Some(config) {
            return;
        }
        self.series = prepare_series(config);
        self.title = config.layout.title.clone();
        self.config = Some(config.clone());
        self.initialized = true;
        self.redraws += 1;
    }

    /// Report the host width observed this frame. A change from the
    /// previously observed width triggers a resize pass; the first
    /// observation only records the baseline.
    pub fn observe_width(&mut self, width: f32) {
        if let Some(last) = self.last_width
            && last != width
        {
            self.resize();
        }
        self.last_width = Some(width);
    }

    /// Surrounding-window resize notification, guarded the same way as a
    /// host width change.
    pub fn on_viewport_resize(&mut self) {
        self.resize();
    }

    fn resize(&mut self) {
        if !(self.initialized && self.config.is_some()) {
            return;
        }
        self.resizes += 1;
        debug!("plot {} resized ({} total)", self.id, self.resizes);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn show(&mut self, ui: &mut Ui) {
        self.observe_width(ui.available_width());
        if !self.initialized {
            return;
        }
        if let Some(title) = &self.title {
            ui.label(RichText::new(title.clone()).strong());
        }
        Plot::new(self.id.clone())
            .legend(Legend::default())
            .height(240.)
            .show(ui, |plot_ui| {
                for series in &self.series {
                    plot_ui.line(Line::new(
                        series.name.clone(),
                        PlotPoints::new(series.points.clone()),
                    ));
                }
            });
    }
}

// Points where the backend emitted null on either axis are skipped.
fn prepare_series(config: &PlotConfig) -> Vec<PreparedSeries> {
    config
        .data
        .iter()
        .enumerate()
        .map(|(index, trace)| {
            let points = trace
                .x
                .iter()
                .zip(trace.y.iter())
                .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
                .collect();
            PreparedSeries {
                name: trace
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("trace {index}")),
                points,
            }
        })
        .collect()
}
