use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{DistrictRecord, HouseholdDataset, MalaysianState};

// ---------------------------------------------------------------------------
// Reshaped tables handed to the chart builders
// ---------------------------------------------------------------------------

/// One bar of a per-district chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictValue {
    pub district: String,
    pub value: f64,
}

/// One vertex of a poverty-rate line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PovertyPoint {
    pub poverty: f64,
    pub value: f64,
}

/// A state-level statistic after the wide-to-long reshape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateStat {
    pub state: MalaysianState,
    pub stat: &'static str,
    pub value: f64,
}

/// Numeric column of [`DistrictRecord`] that the aggregations can project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    IncomeMean,
    IncomeMedian,
    ExpenditureMean,
    Poverty,
    Gini,
}

impl Metric {
    /// Column name as it appears in the input table.
    pub fn column(self) -> &'static str {
        match self {
            Metric::IncomeMean => "income_mean",
            Metric::IncomeMedian => "income_median",
            Metric::ExpenditureMean => "expenditure_mean",
            Metric::Poverty => "poverty",
            Metric::Gini => "gini",
        }
    }

    pub fn of(self, rec: &DistrictRecord) -> f64 {
        match self {
            Metric::IncomeMean => rec.income_mean,
            Metric::IncomeMedian => rec.income_median,
            Metric::ExpenditureMean => rec.expenditure_mean,
            Metric::Poverty => rec.poverty,
            Metric::Gini => rec.gini,
        }
    }
}

/// Statistics shown by the "Avg" summary view, rounded to whole ringgit.
pub const AVERAGE_METRICS: [Metric; 3] = [
    Metric::IncomeMean,
    Metric::IncomeMedian,
    Metric::ExpenditureMean,
];

/// Statistics shown by the "Gvp" summary view, rounded to 3 decimals.
pub const INEQUALITY_METRICS: [Metric; 2] = [Metric::Gini, Metric::Poverty];

// ---------------------------------------------------------------------------
// District-level transforms
// ---------------------------------------------------------------------------

/// `(district, metric)` for every district of `state`, in table order.
pub fn metric_by_district(
    dataset: &HouseholdDataset,
    state: MalaysianState,
    metric: Metric,
) -> Vec<DistrictValue> {
    dataset
        .in_state(state)
        .map(|rec| DistrictValue {
            district: rec.district.clone(),
            value: metric.of(rec),
        })
        .collect()
}

/// `(poverty, metric)` for every district of `state`, sorted by poverty rate.
///
/// The sort is stable, so districts with equal poverty keep table order.
pub fn metric_by_poverty(
    dataset: &HouseholdDataset,
    state: MalaysianState,
    metric: Metric,
) -> Vec<PovertyPoint> {
    let mut points: Vec<PovertyPoint> = dataset
        .in_state(state)
        .map(|rec| PovertyPoint {
            poverty: rec.poverty,
            value: metric.of(rec),
        })
        .collect();
    points.sort_by(|a, b| a.poverty.total_cmp(&b.poverty));
    points
}

pub fn income_by_district(dataset: &HouseholdDataset, state: MalaysianState) -> Vec<DistrictValue> {
    metric_by_district(dataset, state, Metric::IncomeMean)
}

pub fn poverty_vs_income(dataset: &HouseholdDataset, state: MalaysianState) -> Vec<PovertyPoint> {
    metric_by_poverty(dataset, state, Metric::IncomeMean)
}

pub fn expenditure_by_district(
    dataset: &HouseholdDataset,
    state: MalaysianState,
) -> Vec<DistrictValue> {
    metric_by_district(dataset, state, Metric::ExpenditureMean)
}

pub fn poverty_vs_expenditure(
    dataset: &HouseholdDataset,
    state: MalaysianState,
) -> Vec<PovertyPoint> {
    metric_by_poverty(dataset, state, Metric::ExpenditureMean)
}

// ---------------------------------------------------------------------------
// National transforms: group-by, join, melt
// ---------------------------------------------------------------------------

/// Group key ordering: states sort by label, the way a dataframe group-by
/// orders string keys.
pub type Grouped = BTreeMap<&'static str, (MalaysianState, f64)>;

/// Round half-to-even at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Per-state arithmetic mean of `metric`, rounded to `decimals`.
pub fn group_mean(dataset: &HouseholdDataset, metric: Metric, decimals: i32) -> Grouped {
    let mut sums: BTreeMap<&'static str, (MalaysianState, f64, usize)> = BTreeMap::new();
    for rec in dataset.records() {
        let entry = sums
            .entry(rec.state.label())
            .or_insert((rec.state, 0.0, 0));
        entry.1 += metric.of(rec);
        entry.2 += 1;
    }
    sums.into_iter()
        .map(|(key, (state, sum, n))| (key, (state, round_to(sum / n as f64, decimals))))
        .collect()
}

/// A state with one optional cell per joined column.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub state: MalaysianState,
    pub values: Vec<Option<f64>>,
}

/// Full outer join of per-state columns on the state key.
pub fn outer_join(columns: &[Grouped]) -> Vec<WideRow> {
    let mut rows: BTreeMap<&'static str, WideRow> = BTreeMap::new();
    for (col_idx, column) in columns.iter().enumerate() {
        for (key, (state, value)) in column {
            let row = rows.entry(*key).or_insert_with(|| WideRow {
                state: *state,
                values: vec![None; columns.len()],
            });
            row.values[col_idx] = Some(*value);
        }
    }
    rows.into_values().collect()
}

/// Wide → long: one row per (state, stat), stat-major.  Missing cells are
/// dropped.
pub fn melt(rows: &[WideRow], stat_names: &[&'static str]) -> Vec<StateStat> {
    stat_names
        .iter()
        .copied()
        .enumerate()
        .flat_map(|(col_idx, stat)| {
            rows.iter().filter_map(move |row| {
                row.values.get(col_idx).copied().flatten().map(|value| StateStat {
                    state: row.state,
                    stat,
                    value,
                })
            })
        })
        .collect()
}

fn state_summary(dataset: &HouseholdDataset, metrics: &[Metric], decimals: i32) -> Vec<StateStat> {
    let columns: Vec<Grouped> = metrics
        .iter()
        .map(|&m| group_mean(dataset, m, decimals))
        .collect();
    let names: Vec<&'static str> = metrics.iter().map(|m| m.column()).collect();
    melt(&outer_join(&columns), &names)
}

/// Mean income, median income and expenditure per state (0 decimals).
pub fn state_averages(dataset: &HouseholdDataset) -> Vec<StateStat> {
    state_summary(dataset, &AVERAGE_METRICS, 0)
}

/// Mean Gini coefficient and poverty rate per state (3 decimals).
pub fn gini_vs_poverty(dataset: &HouseholdDataset) -> Vec<StateStat> {
    state_summary(dataset, &INEQUALITY_METRICS, 3)
}
