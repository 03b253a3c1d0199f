//! Benchmark-cohort scoring engine.
//!
//! A run resolves the cohort, derives per-variable baselines from it, scores
//! every employee against those baselines, rolls variable rates up through
//! group weights, and ranks the result. The engine keeps no state between
//! runs and never touches storage.

mod baseline;
mod cohort;
mod config;
pub mod domain;
mod extract;
mod match_rate;
mod rank;
mod rollup;

#[cfg(test)]
mod tests;

pub use config::{VariableCatalog, VariableWeight, WeightConfig, WeightConfigError};
pub use domain::{
    Baseline, BaselineValue, BehavioralScore, Cohort, CohortSelection, CohortSource,
    CohortSummary, CompetencyRecord, Employee, EmployeeId, GroupScore, MatchReport,
    PerformanceRecord, Position, PositionId, PsychProfile, RankedMatch, ReadingValue,
    TalentSnapshot, VariableFamily, VariableMatch, VariableReading,
};

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rank::ScoredEmployee;

/// Cohort selection plus the number of ranked rows wanted back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub selection: CohortSelection,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchRequestError {
    #[error("result limit must be at least 1")]
    ZeroLimit,
}

/// Stateless scorer holding the variable catalog.
#[derive(Debug, Clone, Default)]
pub struct TalentMatchEngine {
    catalog: VariableCatalog,
}

impl TalentMatchEngine {
    pub fn new(catalog: VariableCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Score the whole roster against the cohort described by `request`.
    ///
    /// Missing or zero baselines and empty cohorts are not errors; they shrink
    /// or empty the ranked rows.
    pub fn run(
        &self,
        snapshot: &TalentSnapshot,
        weights: &WeightConfig,
        request: &MatchRequest,
    ) -> Result<MatchReport, MatchRequestError> {
        if request.limit == 0 {
            return Err(MatchRequestError::ZeroLimit);
        }

        let cohort = cohort::resolve_cohort(snapshot, &request.selection);
        let extraction = extract::extract_readings(snapshot, &self.catalog);
        let baselines = baseline::compute_baselines(&extraction.readings, &cohort);
        debug!(
            cohort = cohort.len(),
            readings = extraction.readings.len(),
            baselines = baselines.len(),
            "baselines computed"
        );

        let mut by_employee: BTreeMap<&EmployeeId, Vec<&VariableReading>> = BTreeMap::new();
        for reading in &extraction.readings {
            by_employee
                .entry(&reading.employee_id)
                .or_default()
                .push(reading);
        }
        let employees: Vec<_> = by_employee.into_iter().collect();

        let index = weights.variable_index();
        let rollups: Vec<_> = employees
            .par_iter()
            .map(|(employee_id, readings)| {
                let matches = match_rate::score_employee(readings, &baselines);
                (*employee_id, rollup::rollup(&matches, &index, weights))
            })
            .collect();

        let names: BTreeMap<&EmployeeId, &str> = snapshot
            .employees
            .iter()
            .map(|employee| (&employee.employee_id, employee.full_name.as_str()))
            .collect();

        let scored: Vec<ScoredEmployee> = rollups
            .into_iter()
            .filter_map(|(employee_id, rollup)| {
                let final_score = rollup.final_score?;
                let full_name = names.get(employee_id)?;
                Some(ScoredEmployee {
                    employee_id: employee_id.clone(),
                    full_name: full_name.to_string(),
                    final_score,
                    groups: rollup.groups,
                })
            })
            .collect();
        let scored_employees = scored.len();

        Ok(MatchReport {
            cohort: CohortSummary {
                source: cohort.source,
                size: cohort.len(),
            },
            competency_year: extraction.competency_year,
            baselines: baselines.into_values().collect(),
            group_weight_total: weights.group_weight_total(),
            scored_employees,
            rows: rank::rank(scored, request.limit),
        })
    }
}
