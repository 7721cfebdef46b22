//! Unified application error model and mapping helpers.
//! This module provides the common error enum used across the HTTP layer and
//! the core (binder, access evaluator, cascade engine, services), along with
//! the HTTP status mapping consumed by the response boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Field name -> list of human-readable problems for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    NotFound { code: String, message: String },
    Forbidden { code: String, message: String },
    Unauthenticated { code: String, message: String },
    Validation { code: String, message: String, errors: FieldErrors },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::NotFound { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Unauthenticated { code, .. }
            | AppError::Validation { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::Unauthenticated { message, .. }
            | AppError::Validation { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn unauthenticated<S: Into<String>>(code: S, msg: S) -> Self { AppError::Unauthenticated { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    pub fn validation<S: Into<String>>(code: S, msg: S, errors: FieldErrors) -> Self {
        AppError::Validation { code: code.into(), message: msg.into(), errors }
    }

    /// Single-field validation failure shorthand.
    pub fn invalid_field(field: &str, problem: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![problem.to_string()]);
        AppError::Validation {
            code: "validation_failed".into(),
            message: format!("{}: {}", field, problem),
            errors,
        }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::NotFound { .. } => 404,
            AppError::Forbidden { .. } => 403,
            AppError::Unauthenticated { .. } => 401,
            AppError::Validation { .. } => 400,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<crate::store::StoreError> for AppError {
    fn from(err: crate::store::StoreError) -> Self {
        AppError::Internal { code: "store_error".into(), message: err.to_string() }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal".into(), message: err.to_string() }
    }
}
