use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::engine::{
    BehavioralScore, CompetencyRecord, Employee, EmployeeId, PerformanceRecord, Position,
    PositionId, PsychProfile, VariableCatalog, VariableWeight,
};

use super::TableError;

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Data rows start on line 2, after the header.
fn line_of(index: usize) -> usize {
    index + 2
}

/// `NaN` and infinities parse as `f64` but are not usable scores.
fn finite(value: f64, line: usize, column: &str) -> Result<f64, TableError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TableError::InvalidNumber {
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    employee_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fullname: Option<String>,
    #[serde(default)]
    position_id: Option<i64>,
}

pub(crate) fn parse_employees<R: Read>(input: R) -> Result<Vec<Employee>, TableError> {
    let mut employees = Vec::new();
    for row in reader(input).deserialize::<EmployeeRow>() {
        let row = row?;
        employees.push(Employee {
            full_name: row.fullname.unwrap_or_else(|| row.employee_id.clone()),
            employee_id: EmployeeId(row.employee_id),
            position_id: row.position_id.map(PositionId),
        });
    }
    Ok(employees)
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    position_id: i64,
    name: String,
}

pub(crate) fn parse_positions<R: Read>(input: R) -> Result<Vec<Position>, TableError> {
    let mut positions = Vec::new();
    for row in reader(input).deserialize::<PositionRow>() {
        let row = row?;
        positions.push(Position {
            position_id: PositionId(row.position_id),
            name: row.name,
        });
    }
    positions.sort_by_key(|position| position.position_id);
    Ok(positions)
}

#[derive(Debug, Deserialize)]
struct PerformanceRow {
    employee_id: String,
    year: i32,
    #[serde(default)]
    rating: Option<i32>,
}

pub(crate) fn parse_performance<R: Read>(input: R) -> Result<Vec<PerformanceRecord>, TableError> {
    let mut records = Vec::new();
    for row in reader(input).deserialize::<PerformanceRow>() {
        let row = row?;
        if let Some(rating) = row.rating {
            records.push(PerformanceRecord {
                employee_id: EmployeeId(row.employee_id),
                year: row.year,
                rating,
            });
        }
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CompetencyRow {
    employee_id: String,
    pillar_code: String,
    year: i32,
    #[serde(default)]
    score: Option<f64>,
}

pub(crate) fn parse_competencies<R: Read>(input: R) -> Result<Vec<CompetencyRecord>, TableError> {
    let mut records = Vec::new();
    for (index, row) in reader(input).deserialize::<CompetencyRow>().enumerate() {
        let row = row?;
        if let Some(score) = row.score {
            records.push(CompetencyRecord {
                score: finite(score, line_of(index), "score")?,
                employee_id: EmployeeId(row.employee_id),
                pillar_code: row.pillar_code,
                year: row.year,
            });
        }
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BehavioralRow {
    employee_id: String,
    scale_code: String,
    #[serde(default)]
    score: Option<f64>,
}

pub(crate) fn parse_behavioral<R: Read>(input: R) -> Result<Vec<BehavioralScore>, TableError> {
    let mut records = Vec::new();
    for (index, row) in reader(input).deserialize::<BehavioralRow>().enumerate() {
        let row = row?;
        if let Some(score) = row.score {
            records.push(BehavioralScore {
                score: finite(score, line_of(index), "score")?,
                employee_id: EmployeeId(row.employee_id),
                scale_code: row.scale_code,
            });
        }
    }
    Ok(records)
}

/// Psych profiles have one column per scale, so the catalog decides which
/// columns are read and whether they are numeric or categorical.
pub(crate) fn parse_psych_profiles<R: Read>(
    input: R,
    catalog: &VariableCatalog,
) -> Result<Vec<PsychProfile>, TableError> {
    let mut csv_reader = reader(input);
    let headers = csv_reader.headers()?.clone();
    let id_column = headers
        .iter()
        .position(|header| header == "employee_id")
        .ok_or_else(|| TableError::MissingColumn("employee_id".to_string()))?;

    let mut profiles = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut profile = PsychProfile {
            employee_id: EmployeeId(record.get(id_column).unwrap_or_default().to_string()),
            ..PsychProfile::default()
        };

        for (header, value) in headers.iter().zip(record.iter()) {
            if value.is_empty() {
                continue;
            }
            if catalog.is_categorical(header) {
                profile
                    .attributes
                    .insert(header.to_string(), value.to_string());
            } else if catalog.is_psychometric(header) {
                let score = value
                    .parse::<f64>()
                    .ok()
                    .filter(|score| score.is_finite())
                    .ok_or_else(|| TableError::InvalidNumber {
                        line: line_of(index),
                        column: header.to_string(),
                        value: value.to_string(),
                    })?;
                profile.scales.insert(header.to_string(), score);
            }
        }

        profiles.push(profile);
    }
    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct VariableWeightRow {
    tv_name: String,
    tgv_name: String,
    tv_weight: f64,
}

pub(crate) fn parse_variable_weights<R: Read>(
    input: R,
) -> Result<Vec<VariableWeight>, TableError> {
    let mut weights = Vec::new();
    for (index, row) in reader(input).deserialize::<VariableWeightRow>().enumerate() {
        let row = row?;
        weights.push(VariableWeight {
            weight: finite(row.tv_weight, line_of(index), "tv_weight")?,
            variable: row.tv_name,
            group: row.tgv_name,
        });
    }
    Ok(weights)
}

#[derive(Debug, Deserialize)]
struct GroupWeightRow {
    tgv_name: String,
    tgv_weight: f64,
}

pub(crate) fn parse_group_weights<R: Read>(input: R) -> Result<Vec<(String, f64)>, TableError> {
    let mut weights = Vec::new();
    for (index, row) in reader(input).deserialize::<GroupWeightRow>().enumerate() {
        let row = row?;
        let weight = finite(row.tgv_weight, line_of(index), "tgv_weight")?;
        weights.push((row.tgv_name, weight));
    }
    Ok(weights)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
