use std::collections::BTreeMap;

use super::domain::{
    Baseline, BaselineValue, Cohort, ReadingValue, VariableFamily, VariableReading,
};

/// Cohort readings of one variable, split by value kind.
struct Samples<'a> {
    family: VariableFamily,
    numbers: Vec<f64>,
    categories: Vec<&'a str>,
}

/// Compute per-variable baselines from the cohort's readings only.
///
/// Variables with no cohort readings get no entry.
pub(crate) fn compute_baselines(
    readings: &[VariableReading],
    cohort: &Cohort,
) -> BTreeMap<String, Baseline> {
    let mut samples: BTreeMap<&str, Samples<'_>> = BTreeMap::new();

    for reading in readings.iter().filter(|r| cohort.contains(&r.employee_id)) {
        let entry = samples
            .entry(reading.variable.as_str())
            .or_insert_with(|| Samples {
                family: reading.family,
                numbers: Vec::new(),
                categories: Vec::new(),
            });
        match &reading.value {
            ReadingValue::Numeric(value) => entry.numbers.push(*value),
            ReadingValue::Category(value) => entry.categories.push(value.as_str()),
        }
    }

    samples
        .into_iter()
        .filter_map(|(variable, samples)| {
            let (value, sample_size) = match samples.family {
                VariableFamily::Continuous | VariableFamily::ContinuousReverse => {
                    let size = samples.numbers.len();
                    (median(samples.numbers).map(BaselineValue::Numeric)?, size)
                }
                VariableFamily::Categorical => {
                    let size = samples.categories.len();
                    let mode = mode(&samples.categories)?;
                    (BaselineValue::Category(mode.to_string()), size)
                }
            };

            Some((
                variable.to_string(),
                Baseline {
                    variable: variable.to_string(),
                    family: samples.family,
                    value,
                    reverse: samples.family == VariableFamily::ContinuousReverse,
                    sample_size,
                },
            ))
        })
        .collect()
}

/// Exact 50th percentile; even-sized samples average the two middle values.
pub(crate) fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Most frequent value; ties go to the lexicographically smallest value.
pub(crate) fn mode<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_default() += 1;
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
