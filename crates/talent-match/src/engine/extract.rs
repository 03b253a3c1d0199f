use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::config::VariableCatalog;
use super::domain::{EmployeeId, ReadingValue, TalentSnapshot, VariableFamily, VariableReading};

/// Readings gathered for a run along with the competency year they came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extraction {
    pub(crate) competency_year: Option<i32>,
    pub(crate) readings: Vec<VariableReading>,
}

/// Flatten the snapshot into family-tagged readings.
///
/// A variable name is bound to the first family it is seen with; readings of
/// the same name under another family are dropped. Each employee keeps at most
/// one reading per variable: the first row in table order wins.
pub(crate) fn extract_readings(snapshot: &TalentSnapshot, catalog: &VariableCatalog) -> Extraction {
    let competency_year = catalog
        .competency_year
        .or_else(|| snapshot.latest_competency_year());
    let mut collector = ReadingCollector::default();

    if let Some(year) = competency_year {
        for record in snapshot.competencies.iter().filter(|r| r.year == year) {
            collector.push(VariableReading {
                employee_id: record.employee_id.clone(),
                variable: record.pillar_code.clone(),
                family: VariableFamily::Continuous,
                value: ReadingValue::Numeric(record.score),
            });
        }
    }

    for profile in &snapshot.psych_profiles {
        for scale in &catalog.psychometric_scales {
            if let Some(score) = profile.scales.get(scale) {
                collector.push(VariableReading {
                    employee_id: profile.employee_id.clone(),
                    variable: scale.clone(),
                    family: VariableFamily::Continuous,
                    value: ReadingValue::Numeric(*score),
                });
            }
        }
    }

    for record in &snapshot.behavioral_scores {
        let family = if catalog.is_reverse(&record.scale_code) {
            VariableFamily::ContinuousReverse
        } else {
            VariableFamily::Continuous
        };
        collector.push(VariableReading {
            employee_id: record.employee_id.clone(),
            variable: record.scale_code.clone(),
            family,
            value: ReadingValue::Numeric(record.score),
        });
    }

    for profile in &snapshot.psych_profiles {
        for attribute in &catalog.categorical_attributes {
            let Some(value) = profile
                .attributes
                .get(attribute)
                .and_then(|raw| normalize_category(raw))
            else {
                continue;
            };
            collector.push(VariableReading {
                employee_id: profile.employee_id.clone(),
                variable: attribute.clone(),
                family: VariableFamily::Categorical,
                value: ReadingValue::Category(value),
            });
        }
    }

    Extraction {
        competency_year,
        readings: collector.readings,
    }
}

/// Trim and upper-case a type classification; blank values are missing.
pub(crate) fn normalize_category(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[derive(Default)]
struct ReadingCollector {
    families: HashMap<String, VariableFamily>,
    seen: HashSet<(EmployeeId, String)>,
    readings: Vec<VariableReading>,
}

impl ReadingCollector {
    fn push(&mut self, reading: VariableReading) {
        let bound = *self
            .families
            .entry(reading.variable.clone())
            .or_insert(reading.family);

        if bound != reading.family {
            debug!(
                variable = %reading.variable,
                expected = bound.label(),
                found = reading.family.label(),
                "dropping reading with conflicting variable family"
            );
            return;
        }

        if !self
            .seen
            .insert((reading.employee_id.clone(), reading.variable.clone()))
        {
            debug!(
                employee_id = %reading.employee_id,
                variable = %reading.variable,
                "dropping duplicate reading"
            );
            return;
        }

        self.readings.push(reading);
    }
}
