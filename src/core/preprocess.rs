//! Passenger preprocessing: missing-value fill and categorical encoding.
//!
//! Fill values are computed once over the full training batch and travel
//! inside the model artifact, so a single served record is filled with the
//! same medians/mode the model was trained with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::model::{FeatureVector, PassengerRecord, Port};
use crate::utils::error::{PredictorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillValues {
    pub age_median: f64,
    pub fare_median: f64,
    pub embarked_mode: Port,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    fill: FillValues,
}

impl Preprocessor {
    /// Learn fill values from a training batch.
    pub fn fit<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a PassengerRecord>,
    {
        let mut ages = Vec::new();
        let mut fares = Vec::new();
        let mut ports: HashMap<Port, usize> = HashMap::new();
        let mut rows = 0usize;

        for record in records {
            rows += 1;
            if let Some(age) = record.age {
                ages.push(age);
            }
            if let Some(fare) = record.fare {
                fares.push(fare);
            }
            if let Some(port) = record.embarked {
                *ports.entry(port).or_insert(0) += 1;
            }
        }

        if rows == 0 {
            return Err(PredictorError::data_format(
                "cannot fit preprocessor on an empty dataset",
            ));
        }

        let age_median = median(&mut ages)
            .ok_or_else(|| PredictorError::data_format("column 'Age' has no observed values"))?;
        let fare_median = median(&mut fares)
            .ok_or_else(|| PredictorError::data_format("column 'Fare' has no observed values"))?;
        let embarked_mode = mode(&ports).ok_or_else(|| {
            PredictorError::data_format("column 'Embarked' has no observed values")
        })?;

        tracing::debug!(
            rows,
            missing_age = rows - ages.len(),
            missing_fare = rows - fares.len(),
            age_median,
            fare_median,
            embarked_mode = %embarked_mode,
            "Fitted preprocessor"
        );

        Ok(Self {
            fill: FillValues {
                age_median,
                fare_median,
                embarked_mode,
            },
        })
    }

    pub fn from_fill_values(fill: FillValues) -> Self {
        Self { fill }
    }

    pub fn fill_values(&self) -> &FillValues {
        &self.fill
    }

    pub fn transform(&self, record: &PassengerRecord) -> FeatureVector {
        [
            f64::from(record.pclass),
            f64::from(record.sex.code()),
            record.age.unwrap_or(self.fill.age_median),
            f64::from(record.sib_sp),
            f64::from(record.parch),
            record.fare.unwrap_or(self.fill.fare_median),
            f64::from(record.embarked.unwrap_or(self.fill.embarked_mode).code()),
        ]
    }

    pub fn transform_batch(&self, records: &[PassengerRecord]) -> Vec<FeatureVector> {
        records.iter().map(|r| self.transform(r)).collect()
    }
}

/// Median of the observed values; even counts average the two middle values.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent port; ties go to the alphabetically first code.
fn mode(counts: &HashMap<Port, usize>) -> Option<Port> {
    let mut ports = Port::ALL;
    ports.sort_by_key(|p| p.letter());

    let mut best: Option<(Port, usize)> = None;
    for port in ports {
        let count = counts.get(&port).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((port, count)),
        }
    }
    best.map(|(port, _)| port)
}
