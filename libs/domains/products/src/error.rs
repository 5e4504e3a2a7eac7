use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use validator::ValidationErrors;

/// Product fields in input order: (Rust name, JSON name).
const FIELD_ORDER: [(&str, &str); 4] = [
    ("name", "nome"),
    ("description", "descricao"),
    ("price", "preco"),
    ("stock_quantity", "quantidadeEstoque"),
];

/// One failed field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// JSON key of the offending field
    pub field: &'static str,
    pub message: String,
}

/// Validation failures ordered as the fields appear in the product body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// `heading` followed by one `\n- message;` line per failure.
    pub fn summary(&self, heading: &str) -> String {
        self.0.iter().fold(heading.to_string(), |mut acc, e| {
            acc.push_str("\n- ");
            acc.push_str(&e.message);
            acc.push(';');
            acc
        })
    }

    /// `{field: message}`, keeping the first message per field.
    pub fn to_field_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for e in &self.0 {
            map.entry(e.field.to_string())
                .or_insert_with(|| Value::String(e.message.clone()));
        }
        map
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let by_field = errors.field_errors();
        let mut ordered = Vec::new();

        for (rust_name, json_name) in FIELD_ORDER {
            let Some(field_errors) = by_field.get(rust_name).or_else(|| by_field.get(json_name)) else {
                continue;
            };
            for e in field_errors.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                ordered.push(FieldError {
                    field: json_name,
                    message,
                });
            }
        }

        Self(ordered)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Produto não encontrado com id: {0}")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A search or count matched nothing
    #[error("Nenhum resultado encontrado")]
    NoResults,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Name pattern that cannot be compiled for in-memory matching
    #[error("Padrão de busca inválido: {0}")]
    InvalidPattern(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ProductError::ConstraintViolation(msg)
            }
            _ => ProductError::Database(err),
        }
    }
}

/// How validation failures are laid out in the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLayout {
    /// Message is `heading` plus one line per failure; details is the message list
    Summary(&'static str),
    /// Details is a `{field: message}` object
    FieldMap,
}

pub const INSERT_ERRORS_HEADING: &str = "Erros ao inserir produto:";

impl ProductError {
    pub fn into_app_error(self, layout: ValidationLayout) -> AppError {
        match self {
            ProductError::NotFound(_) | ProductError::NoResults => AppError::NotFound(self.to_string()),
            ProductError::Validation(errors) => match layout {
                ValidationLayout::Summary(heading) => AppError::Validation {
                    message: errors.summary(heading),
                    details: Value::from(errors.messages()),
                },
                ValidationLayout::FieldMap => AppError::Validation {
                    message: "Dados do produto inválidos".to_string(),
                    details: Value::Object(errors.to_field_map()),
                },
            },
            ProductError::ConstraintViolation(msg) => AppError::ConstraintViolation(msg),
            ProductError::InvalidPattern(_) => AppError::BadRequest(self.to_string()),
            ProductError::Database(err) => AppError::Database(err),
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        err.into_app_error(ValidationLayout::Summary(INSERT_ERRORS_HEADING))
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
