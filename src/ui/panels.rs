use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::MalaysianState;
use crate::dispatch::SummaryView;
use crate::state::AppState;
use crate::ui::plot;

const CHART_HEIGHT: f32 = 320.0;
const SUMMARY_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} districts loaded across {} states",
                ds.len(),
                ds.states_present().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dashboard body
// ---------------------------------------------------------------------------

/// Heading, the two dropdowns and all five chart panels.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(
                    RichText::new("Household Income Statistics in Different States of Malaysia")
                        .size(32.0)
                        .strong(),
                );
            });
            ui.label(RichText::new("Select a state...").strong().size(18.0));

            ui.horizontal(|ui: &mut Ui| {
                state_selector(ui, state);
                view_selector(ui, state);
            });
            ui.separator();

            if state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a district table to begin  (File → Open…)");
                });
                return;
            }

            plot::chart_panel(ui, "summary_chart", state.summary_chart.as_ref(), SUMMARY_HEIGHT);
            ui.separator();

            for pair in state.district_charts.chunks(2) {
                ui.columns(pair.len(), |cols: &mut [Ui]| {
                    for (col, (kind, spec)) in cols.iter_mut().zip(pair) {
                        col.label(RichText::new(kind.caption()).strong().size(16.0));
                        let id = format!("district_chart_{kind:?}");
                        plot::chart_panel(col, &id, Some(spec), CHART_HEIGHT);
                    }
                });
                ui.add_space(8.0);
            }
        });
}

fn state_selector(ui: &mut Ui, state: &mut AppState) {
    let mut selected = state.state_value.clone();
    egui::ComboBox::from_id_salt("state")
        .width(180.0)
        .selected_text(&selected)
        .show_ui(ui, |ui: &mut Ui| {
            for st in MalaysianState::ALL {
                ui.selectable_value(&mut selected, st.label().to_string(), st.label());
            }
        });
    state.select_state(&selected);
}

fn view_selector(ui: &mut Ui, state: &mut AppState) {
    let mut selected = state.view_value.clone();
    let shown = match selected.parse::<SummaryView>() {
        Ok(view) => RichText::new(view.label()),
        Err(_) => RichText::new("Select the data to view...").weak(),
    };
    egui::ComboBox::from_id_salt("data")
        .width(260.0)
        .selected_text(shown)
        .show_ui(ui, |ui: &mut Ui| {
            for view in SummaryView::ALL {
                ui.selectable_value(&mut selected, view.key().to_string(), view.label());
            }
        });
    state.select_view(&selected);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open district table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .set_file_name("hies_charts.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_charts(&path) {
            log::error!("Failed to export charts: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
