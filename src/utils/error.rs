use thiserror::Error;

#[derive(Error, Debug)]
pub enum CepError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Lookup service answered with status {status}")]
    LookupStatusError { status: u16 },

    #[error("No address registered for CEP {cep}")]
    AddressNotFound { cep: String },

    #[error("Invalid postal code: {value:?}")]
    InvalidPostalCode { value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Lookup,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CepError::ApiError(_) => ErrorCategory::Network,
            CepError::LookupStatusError { .. }
            | CepError::AddressNotFound { .. }
            | CepError::SerializationError(_) => ErrorCategory::Lookup,
            CepError::InvalidPostalCode { .. } => ErrorCategory::Input,
            CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CepError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CepError::AddressNotFound { .. } => ErrorSeverity::Low,
            CepError::ApiError(_) | CepError::LookupStatusError { .. } => ErrorSeverity::Medium,
            CepError::InvalidPostalCode { .. }
            | CepError::SerializationError(_)
            | CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            CepError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 查詢失敗時表單一律視為「沒有資料」
    pub fn is_lookup_unavailable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Lookup
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CepError::ApiError(_) => "Check the network connection and the lookup base URL",
            CepError::LookupStatusError { .. } => "The lookup service may be down, try again later",
            CepError::AddressNotFound { .. } => "Double-check the CEP digits",
            CepError::SerializationError(_) => {
                "The lookup service returned an unexpected body, verify the base URL"
            }
            CepError::InvalidPostalCode { .. } => "Provide exactly 8 digits, e.g. 01001-000",
            CepError::ConfigError { .. }
            | CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
            CepError::IoError(_) => "Check that the file exists and is readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CepError::ApiError(_) => "Could not reach the address lookup service".to_string(),
            CepError::LookupStatusError { status } => {
                format!("Address lookup service is unavailable (HTTP {})", status)
            }
            CepError::AddressNotFound { cep } => format!("CEP {} was not found", cep),
            CepError::InvalidPostalCode { value } => {
                format!("'{}' is not a valid CEP", value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;
