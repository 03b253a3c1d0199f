//! Service composing a snapshot source with the scoring engine.

pub mod router;
mod source;

pub use router::match_router;
pub use source::{CsvDirectorySource, SnapshotSource, SourceError, StaticSource};

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::MatchConfig;
use crate::engine::{
    CohortSelection, EmployeeId, MatchReport, MatchRequest, MatchRequestError, Position,
    PositionId, TalentMatchEngine, VariableCatalog,
};

const GROUP_WEIGHT_TOLERANCE: f64 = 1e-6;

/// Values applied when a query leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDefaults {
    pub min_rating: i32,
    pub limit: usize,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            min_rating: MatchConfig::DEFAULT_MIN_RATING,
            limit: MatchConfig::DEFAULT_RESULT_LIMIT,
        }
    }
}

impl From<&MatchConfig> for MatchDefaults {
    fn from(config: &MatchConfig) -> Self {
        Self {
            min_rating: config.min_rating,
            limit: config.result_limit,
        }
    }
}

/// Caller-facing match request; omitted fields fall back to [`MatchDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub manual_ids: Vec<String>,
    #[serde(default)]
    pub position_id: Option<i64>,
    #[serde(default)]
    pub min_rating: Option<i32>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl MatchQuery {
    pub fn into_request(self, defaults: MatchDefaults) -> MatchRequest {
        let manual_ids: BTreeSet<EmployeeId> = self
            .manual_ids
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(EmployeeId::from)
            .collect();

        MatchRequest {
            selection: CohortSelection {
                manual_ids,
                role_id: self.position_id.map(PositionId),
                min_rating: self.min_rating.unwrap_or(defaults.min_rating),
            },
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

/// Candidate for manual benchmark selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighPerformerView {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub label: String,
}

pub struct TalentMatchService<S> {
    source: Arc<S>,
    engine: Arc<TalentMatchEngine>,
    defaults: MatchDefaults,
}

impl<S> TalentMatchService<S>
where
    S: SnapshotSource + 'static,
{
    pub fn new(source: Arc<S>, catalog: VariableCatalog, defaults: MatchDefaults) -> Self {
        Self {
            source,
            engine: Arc::new(TalentMatchEngine::new(catalog)),
            defaults,
        }
    }

    pub fn defaults(&self) -> MatchDefaults {
        self.defaults
    }

    /// Load the current snapshot and rank every employee against the cohort.
    pub fn run(&self, query: MatchQuery) -> Result<MatchReport, MatchServiceError> {
        let request = query.into_request(self.defaults);
        let snapshot = self.source.snapshot()?;
        let weights = self.source.weights()?;

        let group_total = weights.group_weight_total();
        if (group_total - 1.0).abs() > GROUP_WEIGHT_TOLERANCE {
            warn!(
                group_weight_total = group_total,
                "group weights do not sum to 1; final scores are not bounded to 0..=100"
            );
        }

        let report = self.engine.run(&snapshot, &weights, &request)?;
        info!(
            cohort = report.cohort.size,
            baselines = report.baselines.len(),
            scored = report.scored_employees,
            returned = report.rows.len(),
            "talent match completed"
        );
        Ok(report)
    }

    pub fn positions(&self) -> Result<Vec<Position>, MatchServiceError> {
        Ok(self.source.snapshot()?.positions)
    }

    /// Employees rated at least `min_rating` in any review year, by name.
    pub fn high_performers(
        &self,
        min_rating: Option<i32>,
    ) -> Result<Vec<HighPerformerView>, MatchServiceError> {
        let snapshot = self.source.snapshot()?;
        let min_rating = min_rating.unwrap_or(self.defaults.min_rating);

        Ok(snapshot
            .high_performers(min_rating)
            .into_iter()
            .map(|employee| HighPerformerView {
                employee_id: employee.employee_id.clone(),
                full_name: employee.full_name.clone(),
                label: format!("{} – {}", employee.employee_id, employee.full_name),
            })
            .collect())
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Request(#[from] MatchRequestError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        CompetencyRecord, Employee, PerformanceRecord, TalentSnapshot, VariableWeight,
        WeightConfig,
    };
    use std::collections::BTreeMap;

    pub(crate) fn sample_snapshot() -> TalentSnapshot {
        let employee = |id: &str, name: &str, position: i64| Employee {
            employee_id: EmployeeId::from(id),
            full_name: name.to_string(),
            position_id: Some(PositionId(position)),
        };
        let review = |id: &str, year: i32, rating: i32| PerformanceRecord {
            employee_id: EmployeeId::from(id),
            year,
            rating,
        };
        let score = |id: &str, value: f64| CompetencyRecord {
            employee_id: EmployeeId::from(id),
            pillar_code: "QDD".to_string(),
            year: 2025,
            score: value,
        };

        TalentSnapshot {
            employees: vec![
                employee("E1", "Sari Dewi", 1),
                employee("E2", "Budi Santoso", 1),
                employee("E3", "Andi Pratama", 2),
            ],
            positions: vec![
                Position {
                    position_id: PositionId(1),
                    name: "Data Analyst".to_string(),
                },
                Position {
                    position_id: PositionId(2),
                    name: "Brand Executive".to_string(),
                },
            ],
            performance: vec![
                review("E1", 2024, 5),
                review("E2", 2023, 5),
                review("E2", 2024, 3),
                review("E3", 2024, 4),
            ],
            competencies: vec![score("E1", 4.0), score("E2", 3.0), score("E3", 5.0)],
            ..TalentSnapshot::default()
        }
    }

    pub(crate) fn sample_weights(group_weight: f64) -> WeightConfig {
        let mut groups = BTreeMap::new();
        groups.insert("competency".to_string(), group_weight);
        WeightConfig::new(
            vec![VariableWeight {
                variable: "QDD".to_string(),
                group: "competency".to_string(),
                weight: 1.0,
            }],
            groups,
        )
        .expect("valid weights")
    }

    fn service() -> TalentMatchService<StaticSource> {
        TalentMatchService::new(
            Arc::new(StaticSource::new(sample_snapshot(), sample_weights(1.0))),
            VariableCatalog::default(),
            MatchDefaults::default(),
        )
    }

    struct OfflineSource;

    impl SnapshotSource for OfflineSource {
        fn snapshot(&self) -> Result<TalentSnapshot, SourceError> {
            Err(SourceError::Unavailable("database offline".to_string()))
        }

        fn weights(&self) -> Result<WeightConfig, SourceError> {
            Err(SourceError::Unavailable("database offline".to_string()))
        }
    }

    #[test]
    fn query_defaults_fill_missing_fields() {
        let request = MatchQuery {
            manual_ids: vec![" E1 ".to_string(), String::new()],
            ..MatchQuery::default()
        }
        .into_request(MatchDefaults {
            min_rating: 4,
            limit: 25,
        });

        assert_eq!(request.limit, 25);
        assert_eq!(request.selection.min_rating, 4);
        assert_eq!(request.selection.role_id, None);
        let ids: Vec<_> = request.selection.manual_ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["E1"]);
    }

    #[test]
    fn run_uses_fallback_cohort_by_default() {
        let report = service().run(MatchQuery::default()).expect("run succeeds");

        // Only E1 has a latest rating of 5, so the baseline is E1's score.
        assert_eq!(report.cohort.size, 1);
        let ids: Vec<_> = report.rows.iter().map(|row| row.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E3", "E1", "E2"]);
        assert_eq!(report.rows[0].final_score, 125.0);
    }

    #[test]
    fn run_rejects_zero_limit() {
        let error = service()
            .run(MatchQuery {
                limit: Some(0),
                ..MatchQuery::default()
            })
            .expect_err("zero limit");

        assert!(matches!(
            error,
            MatchServiceError::Request(MatchRequestError::ZeroLimit)
        ));
    }

    #[test]
    fn run_propagates_source_errors() {
        let service = TalentMatchService::new(
            Arc::new(OfflineSource),
            VariableCatalog::default(),
            MatchDefaults::default(),
        );

        match service.run(MatchQuery::default()) {
            Err(MatchServiceError::Source(SourceError::Unavailable(_))) => {}
            other => panic!("expected unavailable source, got {other:?}"),
        }
    }

    #[test]
    fn unnormalized_group_weights_still_score() {
        let service = TalentMatchService::new(
            Arc::new(StaticSource::new(sample_snapshot(), sample_weights(2.0))),
            VariableCatalog::default(),
            MatchDefaults::default(),
        );

        let report = service.run(MatchQuery::default()).expect("run succeeds");

        assert_eq!(report.group_weight_total, 2.0);
        assert_eq!(report.rows[0].final_score, 250.0);
    }

    #[test]
    fn high_performers_consider_any_year() {
        let candidates = service().high_performers(None).expect("lookup succeeds");

        let labels: Vec<_> = candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["E2 – Budi Santoso", "E1 – Sari Dewi"]);
    }

    #[test]
    fn positions_come_from_snapshot() {
        let positions = service().positions().expect("lookup succeeds");
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].name, "Data Analyst");
    }
}
