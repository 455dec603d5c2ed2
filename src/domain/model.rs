use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::utils::error::{PredictorError, Result};

/// Column order shared by training and serving. Stored in every artifact.
pub const FEATURE_NAMES: [&str; 7] = ["Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked"];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Encoded passenger, in `FEATURE_NAMES` order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Encoding: male → 0, female → 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> u8 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Sex::Male),
            1 => Ok(Sex::Female),
            other => Err(PredictorError::invalid_category("Sex", other)),
        }
    }

    pub fn parse_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(PredictorError::invalid_category("Sex", label)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Boarding port. Encoding: S → 0, C → 1, Q → 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    #[serde(rename = "S")]
    Southampton,
    #[serde(rename = "C")]
    Cherbourg,
    #[serde(rename = "Q")]
    Queenstown,
}

impl Port {
    pub const ALL: [Port; 3] = [Port::Southampton, Port::Cherbourg, Port::Queenstown];

    pub fn code(self) -> u8 {
        match self {
            Port::Southampton => 0,
            Port::Cherbourg => 1,
            Port::Queenstown => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Port::Southampton => 'S',
            Port::Cherbourg => 'C',
            Port::Queenstown => 'Q',
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Port::Southampton),
            1 => Ok(Port::Cherbourg),
            2 => Ok(Port::Queenstown),
            other => Err(PredictorError::invalid_category("Embarked", other)),
        }
    }

    pub fn parse_label(label: &str) -> Result<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Port::Southampton),
            "C" => Ok(Port::Cherbourg),
            "Q" => Ok(Port::Queenstown),
            _ => Err(PredictorError::invalid_category("Embarked", label)),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A passenger before fill/encoding. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerRecord {
    pub pclass: u8,
    pub sex: Sex,
    pub age: Option<f64>,
    pub sib_sp: u32,
    pub parch: u32,
    pub fare: Option<f64>,
    pub embarked: Option<Port>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub passenger: PassengerRecord,
    pub survived: bool,
}

/// Labeled rows as read from the training CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<LabeledRecord>,
    /// Identifier / free-text columns (Name, Ticket, Cabin, ...) that were not used
    pub dropped_columns: Vec<String>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.survived).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(serialize_with = "bool_as_int")]
    pub survived: bool,
    /// Share of tree votes for survival.
    pub probability: f64,
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}
