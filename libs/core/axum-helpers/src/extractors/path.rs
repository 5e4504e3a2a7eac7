use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::str::FromStr;

/// Single path parameter parsed with `FromStr`.
///
/// A segment that does not parse yields a 400 envelope naming the raw value.
///
/// ```ignore
/// async fn get_product(ParsedPath(id): IdPath) -> String {
///     format!("product {id}")
/// }
///
/// let app = Router::new().route("/buscarPorId/{id}", get(get_product));
/// ```
pub struct ParsedPath<T>(pub T);

/// Numeric record identifier.
pub type IdPath = ParsedPath<i64>;

impl<T, S> FromRequestParts<S> for ParsedPath<T>
where
    T: FromStr + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidPathParam(e.body_text()))?;

        raw.parse()
            .map(ParsedPath)
            .map_err(|_| AppError::InvalidPathParam(format!("'{}' is not a valid value", raw)))
    }
}
