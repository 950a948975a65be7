use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi};

use crate::chart::{BarMode, ChartSpec, Mark, XValue};
use crate::color::to_color32;

/// Fraction of a category slot covered by its bars.
const SLOT_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Chart panel: title + plot + data table
// ---------------------------------------------------------------------------

/// Render one chart spec, or an empty frame when there is nothing to show.
pub fn chart_panel(ui: &mut Ui, id: &str, spec: Option<&ChartSpec>, height: f32) {
    let Some(spec) = spec else {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.weak("No chart selected");
            });
        });
        return;
    };

    if spec.title_centered {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.strong(&spec.title);
        });
    } else {
        ui.strong(&spec.title);
    }

    if spec.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak("No districts recorded for this selection");
        });
    }

    let categories = spec.categories.clone();
    let mut plot = Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);
    if matches!(spec.mark, Mark::Bar { .. }) {
        plot = plot
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| category_label(&categories, mark.value));
    }

    plot.show(ui, |plot_ui| match spec.mark {
        Mark::Bar { mode } => draw_bars(plot_ui, spec, mode),
        Mark::Line => draw_lines(plot_ui, spec),
    });

    ui.push_id(id, |ui: &mut Ui| {
        egui::CollapsingHeader::new("Data")
            .default_open(false)
            .show(ui, |ui: &mut Ui| data_table(ui, spec));
    });
}

/// Axis label for a category slot; blank between slots.
fn category_label(categories: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

fn draw_bars(plot_ui: &mut PlotUi, spec: &ChartSpec, mode: BarMode) {
    let n_series = spec.series.len().max(1) as f64;
    let bar_width = match mode {
        BarMode::Relative => SLOT_WIDTH,
        BarMode::Group => SLOT_WIDTH / n_series,
    };

    for (j, series) in spec.series.iter().enumerate() {
        let offset = match mode {
            BarMode::Relative => 0.0,
            BarMode::Group => (j as f64 - (n_series - 1.0) / 2.0) * bar_width,
        };
        let color = to_color32(series.color);
        let bars: Vec<Bar> = series
            .points
            .iter()
            .filter_map(|p| {
                let XValue::Category(cat) = &p.x else {
                    return None;
                };
                let slot = spec.categories.iter().position(|c| c == cat)?;
                Some(
                    Bar::new(slot as f64 + offset, p.y)
                        .width(bar_width)
                        .name(cat)
                        .fill(color),
                )
            })
            .collect();

        plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(color));
    }
}

fn draw_lines(plot_ui: &mut PlotUi, spec: &ChartSpec) {
    for series in &spec.series {
        let points: PlotPoints = series
            .points
            .iter()
            .filter_map(|p| match p.x {
                XValue::Number(x) => Some([x, p.y]),
                XValue::Category(_) => None,
            })
            .collect();

        plot_ui.line(
            Line::new(points)
                .name(&series.name)
                .color(to_color32(series.color))
                .width(2.0),
        );
    }
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, spec: &ChartSpec) {
    let rows = spec.table_rows();
    let series_heading = spec.legend_title.as_deref().unwrap_or("series");

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong(&spec.x_label);
            });
            header.col(|ui: &mut Ui| {
                ui.strong(series_heading);
            });
            header.col(|ui: &mut Ui| {
                ui.strong(&spec.y_label);
            });
        })
        .body(|mut body| {
            for row in &rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui: &mut Ui| {
                        ui.label(&row.x);
                    });
                    table_row.col(|ui: &mut Ui| {
                        ui.label(&row.series);
                    });
                    table_row.col(|ui: &mut Ui| {
                        ui.label(format!("{}", row.y));
                    });
                });
            }
        });
}
