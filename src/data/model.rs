use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// MalaysianState – the 16 states and federal territories
// ---------------------------------------------------------------------------

/// A Malaysian state or federal territory as labelled in the HIES tables.
///
/// Declaration order is the order shown in the state dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MalaysianState {
    Johor,
    Kedah,
    Kelantan,
    Melaka,
    NegeriSembilan,
    Pahang,
    PulauPinang,
    Perak,
    Perlis,
    Selangor,
    Terengganu,
    Sabah,
    Sarawak,
    KualaLumpur,
    Labuan,
    Putrajaya,
}

impl MalaysianState {
    pub const ALL: [MalaysianState; 16] = [
        MalaysianState::Johor,
        MalaysianState::Kedah,
        MalaysianState::Kelantan,
        MalaysianState::Melaka,
        MalaysianState::NegeriSembilan,
        MalaysianState::Pahang,
        MalaysianState::PulauPinang,
        MalaysianState::Perak,
        MalaysianState::Perlis,
        MalaysianState::Selangor,
        MalaysianState::Terengganu,
        MalaysianState::Sabah,
        MalaysianState::Sarawak,
        MalaysianState::KualaLumpur,
        MalaysianState::Labuan,
        MalaysianState::Putrajaya,
    ];

    /// Label exactly as it appears in the source table.
    pub fn label(self) -> &'static str {
        match self {
            MalaysianState::Johor => "Johor",
            MalaysianState::Kedah => "Kedah",
            MalaysianState::Kelantan => "Kelantan",
            MalaysianState::Melaka => "Melaka",
            MalaysianState::NegeriSembilan => "Negeri Sembilan",
            MalaysianState::Pahang => "Pahang",
            MalaysianState::PulauPinang => "Pulau Pinang",
            MalaysianState::Perak => "Perak",
            MalaysianState::Perlis => "Perlis",
            MalaysianState::Selangor => "Selangor",
            MalaysianState::Terengganu => "Terengganu",
            MalaysianState::Sabah => "Sabah",
            MalaysianState::Sarawak => "Sarawak",
            MalaysianState::KualaLumpur => "W.P. Kuala Lumpur",
            MalaysianState::Labuan => "W.P. Labuan",
            MalaysianState::Putrajaya => "W.P. Putrajaya",
        }
    }
}

impl fmt::Display for MalaysianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MalaysianState {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MalaysianState::ALL
            .iter()
            .copied()
            .find(|st| st.label() == trimmed)
            .ok_or_else(|| DashboardError::UnknownState(s.to_string()))
    }
}

impl TryFrom<String> for MalaysianState {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MalaysianState> for String {
    fn from(state: MalaysianState) -> Self {
        state.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// DistrictRecord – one row of the HIES district table
// ---------------------------------------------------------------------------

/// Household statistics for a single administrative district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    pub state: MalaysianState,
    pub district: String,
    /// Mean monthly gross household income (RM).
    pub income_mean: f64,
    /// Median monthly gross household income (RM).
    pub income_median: f64,
    /// Mean monthly household consumption expenditure (RM).
    pub expenditure_mean: f64,
    /// Absolute poverty rate, in percent.
    pub poverty: f64,
    /// Gini coefficient, 0 = perfect equality.
    pub gini: f64,
}

impl DistrictRecord {
    fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("income_mean", self.income_mean),
            ("income_median", self.income_median),
            ("expenditure_mean", self.expenditure_mean),
            ("poverty", self.poverty),
            ("gini", self.gini),
        ]
    }
}

// ---------------------------------------------------------------------------
// HouseholdDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The validated, immutable district table.
#[derive(Debug, Clone, Default)]
pub struct HouseholdDataset {
    records: Vec<DistrictRecord>,
}

impl HouseholdDataset {
    /// Validate and wrap the loaded rows, keeping file order.
    ///
    /// Rejects duplicate (state, district) pairs and numeric fields that are
    /// negative or not finite.
    pub fn new(records: Vec<DistrictRecord>) -> Result<Self, DashboardError> {
        let mut seen: HashSet<(MalaysianState, &str)> = HashSet::with_capacity(records.len());
        for rec in &records {
            if !seen.insert((rec.state, rec.district.as_str())) {
                return Err(DashboardError::DuplicateDistrict {
                    state: rec.state.to_string(),
                    district: rec.district.clone(),
                });
            }
            for (field, value) in rec.numeric_fields() {
                if !value.is_finite() || value < 0.0 {
                    return Err(DashboardError::InvalidValue {
                        district: rec.district.clone(),
                        field,
                        value,
                    });
                }
            }
        }
        Ok(HouseholdDataset { records })
    }

    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    /// Rows belonging to `state`, in file order.
    pub fn in_state(&self, state: MalaysianState) -> impl Iterator<Item = &DistrictRecord> {
        self.records.iter().filter(move |r| r.state == state)
    }

    /// States with at least one district, in dropdown order.
    pub fn states_present(&self) -> Vec<MalaysianState> {
        let present: HashSet<MalaysianState> = self.records.iter().map(|r| r.state).collect();
        MalaysianState::ALL
            .iter()
            .copied()
            .filter(|st| present.contains(st))
            .collect()
    }

    /// Number of districts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(
    state: MalaysianState,
    district: &str,
    income_mean: f64,
    poverty: f64,
    gini: f64,
) -> DistrictRecord {
    DistrictRecord {
        state,
        district: district.to_string(),
        income_mean,
        income_median: income_mean * 0.8,
        expenditure_mean: income_mean * 0.6,
        poverty,
        gini,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_parses_back_to_its_state() {
        for st in MalaysianState::ALL {
            assert_eq!(st.label().parse::<MalaysianState>(), Ok(st));
        }
        assert_eq!(
            " W.P. Labuan ".parse::<MalaysianState>(),
            Ok(MalaysianState::Labuan)
        );
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "Singapore".parse::<MalaysianState>(),
            Err(DashboardError::UnknownState("Singapore".into()))
        );
        assert!("johor".parse::<MalaysianState>().is_err());
    }

    #[test]
    fn duplicate_district_is_rejected() {
        let rows = vec![
            record(MalaysianState::Johor, "Batu Pahat", 5000.0, 2.0, 0.3),
            record(MalaysianState::Johor, "Batu Pahat", 6000.0, 3.0, 0.4),
        ];
        let err = HouseholdDataset::new(rows).unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateDistrict { .. }));
    }

    #[test]
    fn same_district_name_in_two_states_is_allowed() {
        let rows = vec![
            record(MalaysianState::Johor, "Central", 5000.0, 2.0, 0.3),
            record(MalaysianState::Sabah, "Central", 4000.0, 9.0, 0.4),
        ];
        assert_eq!(HouseholdDataset::new(rows).unwrap().len(), 2);
    }

    #[test]
    fn negative_or_nan_values_are_rejected() {
        let mut bad = record(MalaysianState::Perlis, "Perlis", 4000.0, 3.0, 0.3);
        bad.poverty = -1.0;
        let err = HouseholdDataset::new(vec![bad.clone()]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidValue { field: "poverty", .. }
        ));

        bad.poverty = 1.0;
        bad.gini = f64::NAN;
        assert!(HouseholdDataset::new(vec![bad]).is_err());
    }

    #[test]
    fn states_present_follow_dropdown_order() {
        let ds = HouseholdDataset::new(vec![
            record(MalaysianState::Sabah, "Tawau", 5000.0, 9.0, 0.4),
            record(MalaysianState::Johor, "Kluang", 6000.0, 2.0, 0.3),
        ])
        .unwrap();
        assert_eq!(
            ds.states_present(),
            vec![MalaysianState::Johor, MalaysianState::Sabah]
        );
        assert_eq!(ds.in_state(MalaysianState::Sabah).count(), 1);
    }
}
