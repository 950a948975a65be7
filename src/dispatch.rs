use std::fmt;
use std::str::FromStr;

use crate::chart::{self, ChartSpec};
use crate::data::aggregate;
use crate::data::model::{HouseholdDataset, MalaysianState};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Per-state charts
// ---------------------------------------------------------------------------

/// The four charts driven by the state dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistrictChart {
    IncomeByDistrict,
    PovertyVsIncome,
    ExpenditureByDistrict,
    PovertyVsExpenditure,
}

impl DistrictChart {
    pub const ALL: [DistrictChart; 4] = [
        DistrictChart::IncomeByDistrict,
        DistrictChart::PovertyVsIncome,
        DistrictChart::ExpenditureByDistrict,
        DistrictChart::PovertyVsExpenditure,
    ];

    /// Caption shown beside the chart panel.
    pub fn caption(self) -> &'static str {
        match self {
            DistrictChart::IncomeByDistrict => "Income Mean vs Districts",
            DistrictChart::PovertyVsIncome => "Poverty Rate vs Income Mean",
            DistrictChart::ExpenditureByDistrict => "Expenditure vs Districts",
            DistrictChart::PovertyVsExpenditure => "Poverty Rate vs Expenditure",
        }
    }

    /// Build this chart for an already-parsed state.
    pub fn build(self, dataset: &HouseholdDataset, state: MalaysianState) -> ChartSpec {
        match self {
            DistrictChart::IncomeByDistrict => {
                chart::income_by_district(&aggregate::income_by_district(dataset, state), state)
            }
            DistrictChart::PovertyVsIncome => {
                chart::poverty_vs_income(&aggregate::poverty_vs_income(dataset, state), state)
            }
            DistrictChart::ExpenditureByDistrict => chart::expenditure_by_district(
                &aggregate::expenditure_by_district(dataset, state),
                state,
            ),
            DistrictChart::PovertyVsExpenditure => chart::poverty_vs_expenditure(
                &aggregate::poverty_vs_expenditure(dataset, state),
                state,
            ),
        }
    }
}

/// Resolve a state dropdown value and build `kind` for it.
pub fn district_chart(
    dataset: &HouseholdDataset,
    kind: DistrictChart,
    state_name: &str,
) -> Result<ChartSpec, DashboardError> {
    let state: MalaysianState = state_name.parse()?;
    Ok(kind.build(dataset, state))
}

// ---------------------------------------------------------------------------
// National summary chart
// ---------------------------------------------------------------------------

/// Views offered by the summary dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryView {
    /// Average income and expenditure per state.
    Avg,
    /// Gini coefficient vs poverty rate per state.
    Gvp,
}

impl SummaryView {
    pub const ALL: [SummaryView; 2] = [SummaryView::Avg, SummaryView::Gvp];

    /// Dropdown value.
    pub fn key(self) -> &'static str {
        match self {
            SummaryView::Avg => "Avg",
            SummaryView::Gvp => "Gvp",
        }
    }

    /// Dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            SummaryView::Avg => "Average Statistics per State",
            SummaryView::Gvp => "Gini & Poverty Rate per State",
        }
    }

    pub fn build(self, dataset: &HouseholdDataset) -> ChartSpec {
        match self {
            SummaryView::Avg => chart::state_averages(&aggregate::state_averages(dataset)),
            SummaryView::Gvp => chart::gini_vs_poverty(&aggregate::gini_vs_poverty(dataset)),
        }
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SummaryView {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryView::ALL
            .iter()
            .copied()
            .find(|v| v.key() == s)
            .ok_or_else(|| DashboardError::UnknownView(s.to_string()))
    }
}

/// Resolve a summary dropdown value.  An empty selection has no chart.
pub fn summary_chart(
    dataset: &HouseholdDataset,
    view: &str,
) -> Result<Option<ChartSpec>, DashboardError> {
    if view.is_empty() {
        return Ok(None);
    }
    let view: SummaryView = view.parse()?;
    Ok(Some(view.build(dataset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BarMode, Mark, XValue};
    use crate::data::model::record;

    fn dataset() -> HouseholdDataset {
        HouseholdDataset::new(vec![
            record(MalaysianState::Johor, "Johor Bahru", 5000.0, 2.0, 0.30),
            record(MalaysianState::Johor, "Kota Tinggi", 7000.0, 1.0, 0.40),
            record(MalaysianState::Sabah, "Tawau", 4000.0, 12.0, 0.39),
        ])
        .unwrap()
    }

    #[test]
    fn every_state_and_chart_has_a_branch() {
        let ds = dataset();
        for state in MalaysianState::ALL {
            for kind in DistrictChart::ALL {
                let spec = district_chart(&ds, kind, state.label()).unwrap();
                assert!(spec.title.contains(state.label()));
            }
        }
    }

    #[test]
    fn lookup_picks_the_matching_builder() {
        let ds = dataset();
        let line = district_chart(&ds, DistrictChart::PovertyVsIncome, "Johor").unwrap();
        assert_eq!(line.mark, Mark::Line);
        assert_eq!(line.series[0].points[0].x, XValue::Number(1.0));
        assert_eq!(line.series[0].points[0].y, 7000.0);

        let bars = district_chart(&ds, DistrictChart::ExpenditureByDistrict, "Sabah").unwrap();
        assert_eq!(bars.mark, Mark::Bar { mode: BarMode::Relative });
        assert_eq!(bars.categories, vec!["Tawau"]);
    }

    #[test]
    fn unknown_state_is_reported() {
        let err = district_chart(&dataset(), DistrictChart::IncomeByDistrict, "Atlantis")
            .unwrap_err();
        assert_eq!(err, DashboardError::UnknownState("Atlantis".into()));
    }

    #[test]
    fn empty_summary_selection_has_no_chart() {
        assert_eq!(summary_chart(&dataset(), "").unwrap(), None);
    }

    #[test]
    fn unknown_summary_view_is_reported() {
        let err = summary_chart(&dataset(), "Median").unwrap_err();
        assert_eq!(err, DashboardError::UnknownView("Median".into()));
    }

    #[test]
    fn avg_view_averages_johor_income() {
        let spec = summary_chart(&dataset(), "Avg").unwrap().unwrap();
        assert_eq!(
            spec.title,
            "Income & Expenditure Statistics for Different States in Malaysia"
        );
        let income = spec
            .series
            .iter()
            .find(|s| s.name == "income_mean")
            .unwrap();
        let johor = income
            .points
            .iter()
            .find(|p| p.x == XValue::Category("Johor".into()))
            .unwrap();
        assert_eq!(johor.y, 6000.0);
        assert_eq!(spec.series.len(), 3);
    }

    #[test]
    fn gvp_view_compares_gini_and_poverty() {
        let spec = summary_chart(&dataset(), "Gvp").unwrap().unwrap();
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["gini", "poverty"]);
        assert_eq!(spec.series[0].points[0].y, 0.35);
        assert_eq!(spec.categories, vec!["Johor", "Sabah"]);
    }
}
