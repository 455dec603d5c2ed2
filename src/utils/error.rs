use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Invalid category for '{field}': '{value}'")]
    InvalidCategory { field: String, value: String },

    #[error("Data format error: {message}")]
    DataFormat { message: String },

    #[error("Dataset is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Model unavailable at '{path}': {reason}")]
    ModelUnavailable { path: String, reason: String },

    #[error("Training error: {message}")]
    Training { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error on '{field}': {message}")]
    Config { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Data,
    Model,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_category(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidCategory {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }

    pub fn model_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ModelUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::InvalidCategory { .. } => ErrorCategory::Validation,
            Self::DataFormat { .. }
            | Self::MissingColumn { .. }
            | Self::Csv(_)
            | Self::Serialization(_) => ErrorCategory::Data,
            Self::ModelUnavailable { .. } | Self::Training { .. } => ErrorCategory::Model,
            Self::Io(_) => ErrorCategory::System,
            Self::Config { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::InvalidCategory { .. } => ErrorSeverity::Low,
            Self::ModelUnavailable { .. } | Self::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 請求端錯誤 (4xx)
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Check the request fields against the documented schema",
            Self::InvalidCategory { .. } => {
                "Use Sex = male/female (0/1) and Embarked = S/C/Q (0/1/2)"
            }
            Self::DataFormat { .. } | Self::Csv(_) => {
                "Inspect the dataset rows for malformed values"
            }
            Self::MissingColumn { .. } => {
                "The dataset needs Survived, Pclass, Sex, Age, SibSp, Parch, Fare and Embarked columns"
            }
            Self::ModelUnavailable { .. } => {
                "Run `titanic-predictor train` to produce an artifact, then restart the service"
            }
            Self::Training { .. } => "Check the training parameters and dataset size",
            Self::Io(_) => "Check file permissions and that the target directory exists",
            Self::Serialization(_) => "The artifact file may be corrupt; retrain the model",
            Self::Config { .. } => "Fix the configuration value and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Data => format!("Dataset problem: {}", self),
            ErrorCategory::Model => format!("Model problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
