//! Extractors whose rejections render as [`AppError`](crate::errors::AppError)
//! envelopes instead of axum's plain-text defaults.

pub mod json;
pub mod path;
pub mod query;

pub use json::JsonBody;
pub use path::{IdPath, ParsedPath};
pub use query::QueryParams;
