//! CSV reader for the labeled passenger dataset.

use serde::Deserialize;

use crate::domain::model::{Dataset, LabeledRecord, PassengerRecord, Port, Sex};
use crate::utils::error::{PredictorError, Result};

/// Columns that must be present in the training CSV.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Survived", "Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked",
];

#[derive(Debug, Deserialize)]
struct RawPassengerRow {
    #[serde(rename = "Survived")]
    survived: i64,
    #[serde(rename = "Pclass")]
    pclass: i64,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Age")]
    age: Option<f64>,
    #[serde(rename = "SibSp")]
    sib_sp: i64,
    #[serde(rename = "Parch")]
    parch: i64,
    #[serde(rename = "Fare")]
    fare: Option<f64>,
    #[serde(rename = "Embarked")]
    embarked: Option<String>,
}

impl RawPassengerRow {
    fn into_labeled(self) -> Result<LabeledRecord> {
        let survived = match self.survived {
            0 => false,
            1 => true,
            other => {
                return Err(PredictorError::data_format(format!(
                    "Survived must be 0 or 1, got {}",
                    other
                )))
            }
        };

        if !(1..=3).contains(&self.pclass) {
            return Err(PredictorError::data_format(format!(
                "Pclass must be 1, 2 or 3, got {}",
                self.pclass
            )));
        }

        let sex = Sex::parse_label(&self.sex)?;
        let embarked = match self.embarked.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(Port::parse_label(label)?),
        };

        Ok(LabeledRecord {
            passenger: PassengerRecord {
                pclass: self.pclass as u8,
                sex,
                age: non_negative("Age", self.age)?,
                sib_sp: count("SibSp", self.sib_sp)?,
                parch: count("Parch", self.parch)?,
                fare: non_negative("Fare", self.fare)?,
                embarked,
            },
            survived,
        })
    }
}

fn non_negative(column: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(PredictorError::data_format(format!(
            "{} must be a non-negative number, got {}",
            column, v
        ))),
        other => Ok(other),
    }
}

fn count(column: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PredictorError::data_format(format!("{} must be a non-negative count, got {}", column, value))
    })
}

/// Parse the labeled CSV. Missing cells in Age, Fare and Embarked are kept
/// as missing values; every other problem fails the whole dataset.
pub fn read_dataset(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PredictorError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let dropped_columns: Vec<String> = headers
        .iter()
        .filter(|h| !REQUIRED_COLUMNS.contains(h))
        .map(str::to_string)
        .collect();
    if !dropped_columns.is_empty() {
        tracing::debug!("Dropping unused columns: {}", dropped_columns.join(", "));
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawPassengerRow>().enumerate() {
        // 第 1 行是表頭
        let line = idx + 2;
        let row = row.map_err(|e| PredictorError::data_format(format!("line {}: {}", line, e)))?;
        let record = row
            .into_labeled()
            .map_err(|e| PredictorError::data_format(format!("line {}: {}", line, e)))?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(PredictorError::data_format("dataset contains no rows"));
    }

    Ok(Dataset {
        records,
        dropped_columns,
    })
}
