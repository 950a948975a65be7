use std::fmt;

use serde::{Serialize, Serializer};

use crate::color::{self, Qualitative, Rgb8};
use crate::data::aggregate::{DistrictValue, PovertyPoint, StateStat};
use crate::data::model::MalaysianState;

// ---------------------------------------------------------------------------
// Chart specification – what the UI layer renders
// ---------------------------------------------------------------------------

/// A renderer-independent description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub title_centered: bool,
    pub mark: Mark,
    pub x_label: String,
    pub y_label: String,
    /// Heading of the legend (the column the series are coloured by).
    pub legend_title: Option<String>,
    /// x-axis categories in display order; empty for numeric x axes.
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Mark {
    Bar { mode: BarMode },
    Line,
}

/// How bars of different series sharing a category are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// Series occupy the full slot (each category has one series).
    Relative,
    /// Series are placed side by side within the slot.
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    #[serde(serialize_with = "serialize_rgb")]
    pub color: Rgb8,
    pub points: Vec<Datum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub x: XValue,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Category(String),
    Number(f64),
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Category(c) => write!(f, "{c}"),
            XValue::Number(v) => write!(f, "{v}"),
        }
    }
}

fn serialize_rgb<S: Serializer>(c: &Rgb8, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&color::to_hex(*c))
}

/// A flattened `(x, series, y)` row for tabular display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub x: String,
    pub series: String,
    pub y: f64,
}

impl ChartSpec {
    /// Every plotted value, series by series.
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.series
            .iter()
            .flat_map(|s| {
                s.points.iter().map(|p| TableRow {
                    x: p.x.to_string(),
                    series: s.name.clone(),
                    y: p.y,
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Generic builders
// ---------------------------------------------------------------------------

/// Bar per district, each district its own colour and legend entry.
pub fn district_bars(
    rows: &[DistrictValue],
    y_label: &str,
    scheme: Qualitative,
    title: String,
) -> ChartSpec {
    let series = rows
        .iter()
        .enumerate()
        .map(|(i, row)| Series {
            name: row.district.clone(),
            color: scheme.nth(i),
            points: vec![Datum {
                x: XValue::Category(row.district.clone()),
                y: row.value,
            }],
        })
        .collect();

    ChartSpec {
        title,
        title_centered: true,
        mark: Mark::Bar {
            mode: BarMode::Relative,
        },
        x_label: "district".to_string(),
        y_label: y_label.to_string(),
        legend_title: Some("district".to_string()),
        categories: rows.iter().map(|r| r.district.clone()).collect(),
        series,
    }
}

/// Single-colour line over poverty rate.
pub fn poverty_line(
    points: &[PovertyPoint],
    y_label: &str,
    color: Rgb8,
    title: String,
) -> ChartSpec {
    ChartSpec {
        title,
        title_centered: true,
        mark: Mark::Line,
        x_label: "poverty".to_string(),
        y_label: y_label.to_string(),
        legend_title: None,
        categories: Vec::new(),
        series: vec![Series {
            name: y_label.to_string(),
            color,
            points: points
                .iter()
                .map(|p| Datum {
                    x: XValue::Number(p.poverty),
                    y: p.value,
                })
                .collect(),
        }],
    }
}

/// Grouped bars: states along x, one coloured series per statistic.
pub fn state_grouped_bars(stats: &[StateStat], scheme: Qualitative, title: String) -> ChartSpec {
    let mut categories: Vec<String> = Vec::new();
    let mut series: Vec<Series> = Vec::new();

    for stat in stats {
        let label = stat.state.label();
        if !categories.iter().any(|c| c == label) {
            categories.push(label.to_string());
        }
        let idx = match series.iter().position(|s| s.name == stat.stat) {
            Some(idx) => idx,
            None => {
                series.push(Series {
                    name: stat.stat.to_string(),
                    color: scheme.nth(series.len()),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[idx].points.push(Datum {
            x: XValue::Category(label.to_string()),
            y: stat.value,
        });
    }

    ChartSpec {
        title,
        title_centered: true,
        mark: Mark::Bar {
            mode: BarMode::Group,
        },
        x_label: "state".to_string(),
        y_label: "Value".to_string(),
        legend_title: Some("Stats".to_string()),
        categories,
        series,
    }
}

// ---------------------------------------------------------------------------
// Dashboard charts
// ---------------------------------------------------------------------------

pub fn income_by_district(rows: &[DistrictValue], state: MalaysianState) -> ChartSpec {
    district_bars(
        rows,
        "income_mean",
        Qualitative::Plotly,
        format!("Income Mean vs {state} Districts"),
    )
}

pub fn poverty_vs_income(points: &[PovertyPoint], state: MalaysianState) -> ChartSpec {
    poverty_line(
        points,
        "income_mean",
        line_color("red"),
        format!("Poverty Rate vs Income Mean for {state}"),
    )
}

pub fn expenditure_by_district(rows: &[DistrictValue], state: MalaysianState) -> ChartSpec {
    district_bars(
        rows,
        "expenditure_mean",
        Qualitative::Set2,
        format!("Expenditure Mean vs {state} Districts"),
    )
}

pub fn poverty_vs_expenditure(points: &[PovertyPoint], state: MalaysianState) -> ChartSpec {
    poverty_line(
        points,
        "expenditure_mean",
        line_color("green"),
        format!("Poverty Rate vs Expenditure Mean for {state}"),
    )
}

pub fn state_averages(stats: &[StateStat]) -> ChartSpec {
    state_grouped_bars(
        stats,
        Qualitative::Plotly,
        "Income & Expenditure Statistics for Different States in Malaysia".to_string(),
    )
}

pub fn gini_vs_poverty(stats: &[StateStat]) -> ChartSpec {
    state_grouped_bars(
        stats,
        Qualitative::Set1,
        "Gini Coefficient vs Poverty Rate Comparison for Different States in Malaysia".to_string(),
    )
}

fn line_color(name: &str) -> Rgb8 {
    color::named(name).unwrap_or(Qualitative::Plotly.nth(0))
}
