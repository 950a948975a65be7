use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chart::ChartSpec;
use crate::config::DashboardConfig;
use crate::data::loader;
use crate::data::model::HouseholdDataset;
use crate::dispatch::{self, DistrictChart};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<HouseholdDataset>,

    /// Current value of the state dropdown.
    pub state_value: String,

    /// Current value of the summary dropdown; empty until the user picks one.
    pub view_value: String,

    /// The four per-state charts, in panel order (cached).
    pub district_charts: Vec<(DistrictChart, ChartSpec)>,

    /// The national summary chart, if a view is selected (cached).
    pub summary_chart: Option<ChartSpec>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last dispatch failure of each refresh, so a later success can retract it.
    district_error: Option<String>,
    summary_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

/// Everything the dashboard currently shows, for export.
#[derive(Serialize)]
struct ExportedCharts<'a> {
    state: &'a str,
    view: &'a str,
    summary: Option<&'a ChartSpec>,
    districts: Vec<&'a ChartSpec>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            state_value: config.initial_state.label().to_string(),
            view_value: String::new(),
            district_charts: Vec::new(),
            summary_chart: None,
            status_message: None,
            district_error: None,
            summary_error: None,
        }
    }

    /// Load the configured dataset; a failure leaves the dashboard empty
    /// with the error in the status line.
    pub fn load_initial(&mut self, config: &DashboardConfig) {
        if !config.dataset_path.exists() {
            log::warn!(
                "Dataset {} not found; use File → Open… to pick one",
                config.dataset_path.display()
            );
            self.status_message = Some(format!(
                "Dataset {} not found",
                config.dataset_path.display()
            ));
            return;
        }
        self.load_path(&config.dataset_path);
    }

    /// Load a dataset from disk, reporting failures in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} contains no district rows", path.display());
                }
                log::info!(
                    "Loaded {} districts from {} covering {:?}",
                    dataset.len(),
                    path.display(),
                    dataset
                        .states_present()
                        .iter()
                        .map(|s| s.label())
                        .collect::<Vec<_>>()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and rebuild every chart.
    pub fn set_dataset(&mut self, dataset: HouseholdDataset) {
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_district_charts();
        self.refresh_summary_chart();
    }

    /// State dropdown changed.
    pub fn select_state(&mut self, value: &str) {
        if self.state_value != value {
            self.state_value = value.to_string();
            self.refresh_district_charts();
        }
    }

    /// Summary dropdown changed.
    pub fn select_view(&mut self, value: &str) {
        if self.view_value != value {
            self.view_value = value.to_string();
            self.refresh_summary_chart();
        }
    }

    /// Recompute the four per-state charts from `state_value`.
    pub fn refresh_district_charts(&mut self) {
        let Some(ds) = &self.dataset else {
            self.district_charts.clear();
            return;
        };
        log::debug!("Rebuilding district charts for {:?}", self.state_value);

        let built: Result<Vec<_>, _> = DistrictChart::ALL
            .iter()
            .map(|&kind| dispatch::district_chart(ds, kind, &self.state_value).map(|c| (kind, c)))
            .collect();
        match built {
            Ok(charts) => {
                self.district_charts = charts;
                let stale = self.district_error.take();
                self.retract_status(stale);
            }
            Err(e) => {
                log::error!("{e}");
                self.district_charts.clear();
                let msg = format!("Error: {e}");
                self.district_error = Some(msg.clone());
                self.status_message = Some(msg);
            }
        }
    }

    /// Recompute the summary chart from `view_value`.
    pub fn refresh_summary_chart(&mut self) {
        let Some(ds) = &self.dataset else {
            self.summary_chart = None;
            return;
        };
        log::debug!("Rebuilding summary chart for {:?}", self.view_value);

        match dispatch::summary_chart(ds, &self.view_value) {
            Ok(chart) => {
                self.summary_chart = chart;
                let stale = self.summary_error.take();
                self.retract_status(stale);
            }
            Err(e) => {
                log::error!("{e}");
                self.summary_chart = None;
                let msg = format!("Error: {e}");
                self.summary_error = Some(msg.clone());
                self.status_message = Some(msg);
            }
        }
    }

    /// Clear the status line if it still shows `stale`; newer messages stay.
    fn retract_status(&mut self, stale: Option<String>) {
        if stale.is_some() && self.status_message == stale {
            self.status_message = None;
        }
    }

    /// Write every chart currently on screen as pretty-printed JSON.
    pub fn export_charts(&self, path: &Path) -> Result<()> {
        let exported = ExportedCharts {
            state: &self.state_value,
            view: &self.view_value,
            summary: self.summary_chart.as_ref(),
            districts: self.district_charts.iter().map(|(_, c)| c).collect(),
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &exported)
            .context("writing chart JSON")?;
        log::info!("Exported charts to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, MalaysianState};

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(
            HouseholdDataset::new(vec![
                record(MalaysianState::Johor, "Segamat", 5000.0, 2.0, 0.3),
                record(MalaysianState::Perak, "Kinta", 6000.0, 1.0, 0.4),
            ])
            .unwrap(),
        );
        state
    }

    #[test]
    fn loading_builds_district_charts_but_no_summary() {
        let state = loaded();
        assert_eq!(state.state_value, "Johor");
        assert_eq!(state.district_charts.len(), 4);
        assert_eq!(state.district_charts[0].0, DistrictChart::IncomeByDistrict);
        assert!(state.summary_chart.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn selecting_a_state_rebuilds_its_charts() {
        let mut state = loaded();
        state.select_state("Perak");
        assert_eq!(
            state.district_charts[0].1.title,
            "Income Mean vs Perak Districts"
        );
    }

    #[test]
    fn unknown_state_clears_charts_and_reports() {
        let mut state = loaded();
        state.select_state("Gotham");
        assert!(state.district_charts.is_empty());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("Gotham")));
    }

    #[test]
    fn valid_state_after_unknown_one_clears_the_error() {
        let mut state = loaded();
        state.select_state("Gotham");
        assert!(state.status_message.is_some());
        state.select_state("Johor");
        assert_eq!(state.district_charts.len(), 4);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn recovering_one_chart_keeps_the_other_error() {
        let mut state = loaded();
        state.select_view("Median");
        state.select_state("Gotham");
        state.select_view("Avg");
        assert!(state.summary_chart.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("Gotham")));
    }

    #[test]
    fn summary_view_toggles_the_top_chart() {
        let mut state = loaded();
        state.select_view("Gvp");
        assert!(state.summary_chart.is_some());
        state.select_view("");
        assert!(state.summary_chart.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn no_dataset_means_no_charts() {
        let mut state = AppState::default();
        state.select_view("Avg");
        state.refresh_district_charts();
        assert!(state.summary_chart.is_none());
        assert!(state.district_charts.is_empty());
    }

    #[test]
    fn export_writes_json() {
        let mut state = loaded();
        state.select_view("Avg");
        let path = std::env::temp_dir().join(format!("hies-export-{}.json", std::process::id()));
        state.export_charts(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["state"], "Johor");
        assert_eq!(json["districts"].as_array().unwrap().len(), 4);
        assert!(json["summary"]["title"].is_string());
    }
}
