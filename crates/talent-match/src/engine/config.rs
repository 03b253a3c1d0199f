use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Which source fields become talent variables, and how they are scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCatalog {
    /// Numeric psychometric scales read from each psych profile.
    pub psychometric_scales: Vec<String>,
    /// Behavioral scale codes scored around the baseline instead of against it.
    pub reverse_scales: BTreeSet<String>,
    /// Type classifications compared by exact (normalized) value.
    pub categorical_attributes: Vec<String>,
    /// Competency review year to use; `None` resolves to the latest year in the snapshot.
    #[serde(default)]
    pub competency_year: Option<i32>,
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self {
            psychometric_scales: ["iq", "gtq", "tiki", "faxtor", "pauli"]
                .into_iter()
                .map(String::from)
                .collect(),
            reverse_scales: ["Papi_I", "Papi_K", "Papi_Z", "Papi_T"]
                .into_iter()
                .map(String::from)
                .collect(),
            categorical_attributes: ["mbti", "disc"].into_iter().map(String::from).collect(),
            competency_year: None,
        }
    }
}

impl VariableCatalog {
    pub fn is_reverse(&self, scale_code: &str) -> bool {
        self.reverse_scales.contains(scale_code)
    }

    pub fn is_categorical(&self, field: &str) -> bool {
        self.categorical_attributes
            .iter()
            .any(|attribute| attribute == field)
    }

    pub fn is_psychometric(&self, field: &str) -> bool {
        self.psychometric_scales.iter().any(|scale| scale == field)
    }
}

/// Contribution of a talent variable to one talent group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableWeight {
    pub variable: String,
    pub group: String,
    pub weight: f64,
}

/// Two-level weighting: variables into groups, groups into the final score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightConfig {
    variables: Vec<VariableWeight>,
    groups: BTreeMap<String, f64>,
}

impl WeightConfig {
    pub fn new(
        variables: Vec<VariableWeight>,
        groups: BTreeMap<String, f64>,
    ) -> Result<Self, WeightConfigError> {
        for entry in &variables {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(WeightConfigError::InvalidVariableWeight {
                    variable: entry.variable.clone(),
                    group: entry.group.clone(),
                    weight: entry.weight,
                });
            }
        }

        for (group, weight) in &groups {
            if !weight.is_finite() {
                return Err(WeightConfigError::InvalidGroupWeight {
                    group: group.clone(),
                    weight: *weight,
                });
            }
        }

        Ok(Self { variables, groups })
    }

    /// Build group weights from rows, rejecting a group listed twice.
    pub fn groups_from_rows<I>(rows: I) -> Result<BTreeMap<String, f64>, WeightConfigError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut groups = BTreeMap::new();
        for (group, weight) in rows {
            if groups.insert(group.clone(), weight).is_some() {
                return Err(WeightConfigError::DuplicateGroup(group));
            }
        }
        Ok(groups)
    }

    pub fn variables(&self) -> &[VariableWeight] {
        &self.variables
    }

    pub fn groups(&self) -> &BTreeMap<String, f64> {
        &self.groups
    }

    pub fn group_weight(&self, group: &str) -> Option<f64> {
        self.groups.get(group).copied()
    }

    /// Sum of all group weights. Nothing requires this to be 1.
    pub fn group_weight_total(&self) -> f64 {
        self.groups.values().sum()
    }

    /// Mappings keyed by variable name; a variable may feed several groups.
    pub fn variable_index(&self) -> BTreeMap<&str, Vec<&VariableWeight>> {
        let mut index: BTreeMap<&str, Vec<&VariableWeight>> = BTreeMap::new();
        for entry in &self.variables {
            index.entry(entry.variable.as_str()).or_default().push(entry);
        }
        index
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightConfigError {
    #[error("variable '{variable}' in group '{group}' has invalid weight {weight}")]
    InvalidVariableWeight {
        variable: String,
        group: String,
        weight: f64,
    },
    #[error("group '{group}' has invalid weight {weight}")]
    InvalidGroupWeight { group: String, weight: f64 },
    #[error("group '{0}' is weighted more than once")]
    DuplicateGroup(String),
}
