use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Roster identifier for an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a role/position in the organization chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub i64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub position_id: Option<PositionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: PositionId,
    pub name: String,
}

/// One yearly performance review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub employee_id: EmployeeId,
    pub year: i32,
    pub rating: i32,
}

/// Score for one competency pillar in one review year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyRecord {
    pub employee_id: EmployeeId,
    pub pillar_code: String,
    pub year: i32,
    pub score: f64,
}

/// Psychometric test results: numeric scales plus type classifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychProfile {
    pub employee_id: EmployeeId,
    pub scales: BTreeMap<String, f64>,
    pub attributes: BTreeMap<String, String>,
}

/// Score on a single behavioral preference scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralScore {
    pub employee_id: EmployeeId,
    pub scale_code: String,
    pub score: f64,
}

/// Read-only view of the assessment tables for one scoring run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentSnapshot {
    pub employees: Vec<Employee>,
    pub positions: Vec<Position>,
    pub performance: Vec<PerformanceRecord>,
    pub competencies: Vec<CompetencyRecord>,
    pub psych_profiles: Vec<PsychProfile>,
    pub behavioral_scores: Vec<BehavioralScore>,
}

impl TalentSnapshot {
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees
            .iter()
            .find(|employee| &employee.employee_id == id)
    }

    /// Rating from each employee's most recent review year. Several reviews in
    /// the same year resolve to the highest rating of that year.
    pub fn latest_ratings(&self) -> BTreeMap<EmployeeId, i32> {
        let mut latest: BTreeMap<EmployeeId, (i32, i32)> = BTreeMap::new();
        for record in &self.performance {
            latest
                .entry(record.employee_id.clone())
                .and_modify(|(year, rating)| {
                    if record.year > *year || (record.year == *year && record.rating > *rating) {
                        *year = record.year;
                        *rating = record.rating;
                    }
                })
                .or_insert((record.year, record.rating));
        }

        latest
            .into_iter()
            .map(|(id, (_, rating))| (id, rating))
            .collect()
    }

    /// Most recent competency review year present anywhere in the snapshot.
    pub fn latest_competency_year(&self) -> Option<i32> {
        self.competencies.iter().map(|record| record.year).max()
    }

    /// Roster entries with at least one review at or above `min_rating`, in
    /// any year, ordered by name.
    pub fn high_performers(&self, min_rating: i32) -> Vec<&Employee> {
        let qualified: BTreeSet<&EmployeeId> = self
            .performance
            .iter()
            .filter(|record| record.rating >= min_rating)
            .map(|record| &record.employee_id)
            .collect();

        let mut employees: Vec<&Employee> = self
            .employees
            .iter()
            .filter(|employee| qualified.contains(&employee.employee_id))
            .collect();
        employees.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });
        employees
    }
}

/// Scoring rule family a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableFamily {
    Continuous,
    ContinuousReverse,
    Categorical,
}

impl VariableFamily {
    pub fn label(&self) -> &'static str {
        match self {
            VariableFamily::Continuous => "continuous",
            VariableFamily::ContinuousReverse => "continuous_reverse",
            VariableFamily::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Numeric(f64),
    Category(String),
}

/// A single raw observation of a talent variable for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableReading {
    pub employee_id: EmployeeId,
    pub variable: String,
    pub family: VariableFamily,
    pub value: ReadingValue,
}

/// Benchmark request: explicit picks, an optional role, and the rating bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortSelection {
    #[serde(default)]
    pub manual_ids: BTreeSet<EmployeeId>,
    #[serde(default)]
    pub role_id: Option<PositionId>,
    pub min_rating: i32,
}

/// Which branch of cohort resolution produced the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CohortSource {
    Explicit { manual: usize, role: usize },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub source: CohortSource,
    pub members: BTreeSet<EmployeeId>,
}

impl Cohort {
    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaselineValue {
    Numeric(f64),
    Category(String),
}

/// Cohort reference value for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub variable: String,
    pub family: VariableFamily,
    pub value: BaselineValue,
    pub reverse: bool,
    pub sample_size: usize,
}

/// Match rate of one reading; `rate` is `None` when the baseline is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMatch {
    pub variable: String,
    pub family: VariableFamily,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: String,
    pub match_rate: f64,
    pub weight: f64,
}

/// One row of the ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub rank: usize,
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub final_score: f64,
    pub groups: Vec<GroupScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub source: CohortSource,
    pub size: usize,
}

/// Result of a scoring run along with the context needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub cohort: CohortSummary,
    pub competency_year: Option<i32>,
    pub baselines: Vec<Baseline>,
    pub group_weight_total: f64,
    pub scored_employees: usize,
    pub rows: Vec<RankedMatch>,
}

impl MatchReport {
    pub fn top(&self) -> Option<&RankedMatch> {
        self.rows.first()
    }
}
