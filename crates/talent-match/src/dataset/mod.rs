//! CSV exports of the assessment tables, loaded into a [`TalentSnapshot`].
//!
//! A snapshot directory holds one headered CSV file per source table. Fields
//! are trimmed and empty values count as missing.

mod parser;

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::engine::{TalentSnapshot, VariableCatalog, WeightConfig, WeightConfigError};

pub const EMPLOYEES_FILE: &str = "employees.csv";
pub const POSITIONS_FILE: &str = "dim_positions.csv";
pub const PERFORMANCE_FILE: &str = "performance_yearly.csv";
pub const COMPETENCIES_FILE: &str = "competencies_yearly.csv";
pub const PSYCH_PROFILES_FILE: &str = "profiles_psych.csv";
pub const BEHAVIORAL_FILE: &str = "papi_scores.csv";
pub const VARIABLE_WEIGHTS_FILE: &str = "talent_variables_mapping.csv";
pub const GROUP_WEIGHTS_FILE: &str = "talent_group_weights.csv";

/// Failure reading a single table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("snapshot directory {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("required table {0} is missing")]
    MissingTable(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid data in {path}: {source}")]
    Table { path: PathBuf, source: TableError },
    #[error(transparent)]
    Weights(#[from] WeightConfigError),
}

/// Load every assessment table from `dir`. The positions table is optional.
pub fn load_snapshot(dir: &Path, catalog: &VariableCatalog) -> Result<TalentSnapshot, DatasetError> {
    ensure_directory(dir)?;

    let snapshot = TalentSnapshot {
        employees: read_table(dir, EMPLOYEES_FILE, parser::parse_employees)?,
        positions: read_optional_table(dir, POSITIONS_FILE, parser::parse_positions)?
            .unwrap_or_default(),
        performance: read_table(dir, PERFORMANCE_FILE, parser::parse_performance)?,
        competencies: read_table(dir, COMPETENCIES_FILE, parser::parse_competencies)?,
        psych_profiles: read_table(dir, PSYCH_PROFILES_FILE, |input| {
            parser::parse_psych_profiles(input, catalog)
        })?,
        behavioral_scores: read_table(dir, BEHAVIORAL_FILE, parser::parse_behavioral)?,
    };

    info!(
        dir = %dir.display(),
        employees = snapshot.employees.len(),
        competencies = snapshot.competencies.len(),
        psych_profiles = snapshot.psych_profiles.len(),
        behavioral_scores = snapshot.behavioral_scores.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Load the variable→group and group weight tables from `dir`.
pub fn load_weights(dir: &Path) -> Result<WeightConfig, DatasetError> {
    ensure_directory(dir)?;

    let variables = read_table(dir, VARIABLE_WEIGHTS_FILE, parser::parse_variable_weights)?;
    let group_rows = read_table(dir, GROUP_WEIGHTS_FILE, parser::parse_group_weights)?;
    let groups = WeightConfig::groups_from_rows(group_rows)?;
    let config = WeightConfig::new(variables, groups)?;

    debug!(
        variables = config.variables().len(),
        groups = config.groups().len(),
        "weights loaded"
    );
    Ok(config)
}

fn ensure_directory(dir: &Path) -> Result<(), DatasetError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DatasetError::MissingDirectory(dir.to_path_buf()))
    }
}

fn read_table<T, F>(dir: &Path, name: &str, parse: F) -> Result<T, DatasetError>
where
    F: FnOnce(File) -> Result<T, TableError>,
{
    read_optional_table(dir, name, parse)?
        .ok_or_else(|| DatasetError::MissingTable(dir.join(name)))
}

fn read_optional_table<T, F>(dir: &Path, name: &str, parse: F) -> Result<Option<T>, DatasetError>
where
    F: FnOnce(File) -> Result<T, TableError>,
{
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(&path).map_err(|source| DatasetError::Io {
        path: path.clone(),
        source,
    })?;
    parse(file)
        .map(Some)
        .map_err(|source| DatasetError::Table { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn psych_columns_follow_catalog() {
        let csv = "employee_id,iq,gtq,mbti,disc,notes\n\
E1,120,,intj, DI ,likes chess\n\
E2,,30,,,\n";
        let profiles = parser::parse_psych_profiles(Cursor::new(csv), &VariableCatalog::default())
            .expect("parse");

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].scales.get("iq"), Some(&120.0));
        assert!(!profiles[0].scales.contains_key("gtq"));
        assert_eq!(profiles[0].attributes.get("disc").map(String::as_str), Some("DI"));
        assert!(!profiles[0].attributes.contains_key("notes"));
        assert!(profiles[1].attributes.is_empty());
        assert_eq!(profiles[1].scales.get("gtq"), Some(&30.0));
    }

    #[test]
    fn psych_rejects_non_numeric_scale() {
        let csv = "employee_id,iq\nE1,high\n";
        let error = parser::parse_psych_profiles(Cursor::new(csv), &VariableCatalog::default())
            .expect_err("invalid number");

        match error {
            TableError::InvalidNumber { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "iq");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn psych_requires_employee_id_column() {
        let csv = "id,iq\nE1,100\n";
        let error = parser::parse_psych_profiles(Cursor::new(csv), &VariableCatalog::default())
            .expect_err("missing column");
        assert!(matches!(error, TableError::MissingColumn(column) if column == "employee_id"));
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        let csv = "employee_id,pillar_code,year,score\nE1,GDR,2024,4\nE2,GDR,2024,NaN\n";
        match parser::parse_competencies(Cursor::new(csv)) {
            Err(TableError::InvalidNumber { line, column, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "score");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }

        let csv = "employee_id,scale_code,score\nE1,Papi_K,inf\n";
        assert!(matches!(
            parser::parse_behavioral(Cursor::new(csv)),
            Err(TableError::InvalidNumber { line: 2, .. })
        ));

        let csv = "employee_id,iq\nE1,-inf\n";
        assert!(matches!(
            parser::parse_psych_profiles(Cursor::new(csv), &VariableCatalog::default()),
            Err(TableError::InvalidNumber { .. })
        ));

        let csv = "tgv_name,tgv_weight\nCompetency,NaN\n";
        assert!(matches!(
            parser::parse_group_weights(Cursor::new(csv)),
            Err(TableError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn rows_without_scores_are_skipped() {
        let csv = "employee_id,scale_code,score\nE1,Papi_K,\nE1,Papi_N,6\n";
        let records = parser::parse_behavioral(Cursor::new(csv)).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scale_code, "Papi_N");
    }

    #[test]
    fn employees_without_position_parse() {
        let csv = "employee_id,fullname,position_id\nE1,Rina Wulandari,\nE2, ,3\n";
        let employees = parser::parse_employees(Cursor::new(csv)).expect("parse");
        assert_eq!(employees[0].position_id, None);
        assert_eq!(employees[0].full_name, "Rina Wulandari");
        assert_eq!(employees[1].full_name, "E2");
    }

    #[test]
    fn missing_directory_is_reported() {
        let error = load_snapshot(
            Path::new("./does-not-exist"),
            &VariableCatalog::default(),
        )
        .expect_err("missing dir");
        assert!(matches!(error, DatasetError::MissingDirectory(_)));
    }
}
