use serde::{Deserialize, Serialize};

use crate::domain::model::{PassengerRecord, Port, Sex};
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{validate_finite, validate_range};

pub const MAX_AGE: f64 = 150.0;

/// A categorical request field given either as its label or its integer code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Code(i64),
    Label(String),
}

/// Body of `POST /predict`. Field names follow the dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassengerRequest {
    #[serde(rename = "Pclass")]
    pub pclass: i64,
    #[serde(rename = "Sex")]
    pub sex: CategoryValue,
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    #[serde(rename = "SibSp")]
    pub sib_sp: i64,
    #[serde(rename = "Parch")]
    pub parch: i64,
    #[serde(rename = "Fare", default)]
    pub fare: Option<f64>,
    #[serde(rename = "Embarked", default)]
    pub embarked: Option<CategoryValue>,
}

impl PassengerRequest {
    /// Check ranges and decode categories. Missing Age, Fare and Embarked
    /// stay `None` and are filled later from the artifact.
    pub fn to_record(&self) -> Result<PassengerRecord> {
        validate_range("Pclass", self.pclass, 1, 3)?;

        let sex = match &self.sex {
            CategoryValue::Code(code) => Sex::from_code(*code)?,
            CategoryValue::Label(label) => Sex::parse_label(label)?,
        };

        if let Some(age) = self.age {
            validate_finite("Age", age)?;
            validate_range("Age", age, 0.0, MAX_AGE)?;
        }

        if let Some(fare) = self.fare {
            validate_finite("Fare", fare)?;
            validate_range("Fare", fare, 0.0, f64::MAX)?;
        }

        let embarked = match &self.embarked {
            None => None,
            Some(CategoryValue::Code(code)) => Some(Port::from_code(*code)?),
            Some(CategoryValue::Label(label)) => Some(Port::parse_label(label)?),
        };

        Ok(PassengerRecord {
            pclass: self.pclass as u8,
            sex,
            age: self.age,
            sib_sp: count_field("SibSp", self.sib_sp)?,
            parch: count_field("Parch", self.parch)?,
            fare: self.fare,
            embarked,
        })
    }
}

fn count_field(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PredictorError::validation(field, format!("Value {} must be a non-negative count", value))
    })
}
