use std::collections::{BTreeMap, BTreeSet};

use crate::engine::domain::{
    Baseline, BaselineValue, BehavioralScore, CohortSelection, CompetencyRecord, Employee,
    EmployeeId, PerformanceRecord, PositionId, PsychProfile, ReadingValue, TalentSnapshot,
    VariableFamily, VariableReading,
};
use crate::engine::{MatchRequest, VariableCatalog, VariableWeight, WeightConfig};

pub(super) fn id(value: &str) -> EmployeeId {
    EmployeeId::from(value)
}

pub(super) fn employee(employee_id: &str, position: Option<i64>) -> Employee {
    Employee {
        employee_id: id(employee_id),
        full_name: format!("Employee {employee_id}"),
        position_id: position.map(PositionId),
    }
}

pub(super) fn rating(employee_id: &str, year: i32, rating: i32) -> PerformanceRecord {
    PerformanceRecord {
        employee_id: id(employee_id),
        year,
        rating,
    }
}

pub(super) fn competency(employee_id: &str, pillar: &str, year: i32, score: f64) -> CompetencyRecord {
    CompetencyRecord {
        employee_id: id(employee_id),
        pillar_code: pillar.to_string(),
        year,
        score,
    }
}

pub(super) fn behavioral(employee_id: &str, scale: &str, score: f64) -> BehavioralScore {
    BehavioralScore {
        employee_id: id(employee_id),
        scale_code: scale.to_string(),
        score,
    }
}

pub(super) fn psych(
    employee_id: &str,
    scales: &[(&str, f64)],
    attributes: &[(&str, &str)],
) -> PsychProfile {
    PsychProfile {
        employee_id: id(employee_id),
        scales: scales
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect(),
        attributes: attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    }
}

pub(super) fn numeric_reading(employee_id: &str, variable: &str, value: f64) -> VariableReading {
    VariableReading {
        employee_id: id(employee_id),
        variable: variable.to_string(),
        family: VariableFamily::Continuous,
        value: ReadingValue::Numeric(value),
    }
}

pub(super) fn numeric_baseline(variable: &str, value: f64, reverse: bool) -> Baseline {
    Baseline {
        variable: variable.to_string(),
        family: if reverse {
            VariableFamily::ContinuousReverse
        } else {
            VariableFamily::Continuous
        },
        value: BaselineValue::Numeric(value),
        reverse,
        sample_size: 1,
    }
}

pub(super) fn selection(manual: &[&str], role: Option<i64>, min_rating: i32) -> CohortSelection {
    CohortSelection {
        manual_ids: manual.iter().map(|value| id(value)).collect::<BTreeSet<_>>(),
        role_id: role.map(PositionId),
        min_rating,
    }
}

pub(super) fn request(selection: CohortSelection, limit: usize) -> MatchRequest {
    MatchRequest { selection, limit }
}

pub(super) fn weights(variables: &[(&str, &str, f64)], groups: &[(&str, f64)]) -> WeightConfig {
    WeightConfig::new(
        variables
            .iter()
            .map(|(variable, group, weight)| VariableWeight {
                variable: variable.to_string(),
                group: group.to_string(),
                weight: *weight,
            })
            .collect(),
        groups
            .iter()
            .map(|(group, weight)| (group.to_string(), *weight))
            .collect::<BTreeMap<_, _>>(),
    )
    .expect("valid weight config")
}

pub(super) fn catalog() -> VariableCatalog {
    VariableCatalog::default()
}

/// Five employees across two positions with a mix of ratings.
///
/// | id | position | latest rating |
/// |----|----------|---------------|
/// | E1 | 10       | 5             |
/// | E2 | 10       | 4 (was 5)     |
/// | E3 | 20       | 5             |
/// | E4 | 20       | 3             |
/// | E5 | none     | 5             |
pub(super) fn roster_snapshot() -> TalentSnapshot {
    TalentSnapshot {
        employees: vec![
            employee("E1", Some(10)),
            employee("E2", Some(10)),
            employee("E3", Some(20)),
            employee("E4", Some(20)),
            employee("E5", None),
        ],
        performance: vec![
            rating("E1", 2024, 5),
            rating("E2", 2023, 5),
            rating("E2", 2024, 4),
            rating("E3", 2024, 5),
            rating("E4", 2024, 3),
            rating("E5", 2024, 5),
        ],
        ..TalentSnapshot::default()
    }
}
