//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{FieldErrors, ProductError, ProductResult};
use crate::models::{Product, ProductDraft, ProductInput, ProductPatch};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service validates input, turns absent records into
/// [`ProductError::NotFound`] and delegates persistence to the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Check a product body against the field rules.
fn validate(input: ProductInput) -> ProductResult<ProductDraft> {
    input
        .validate()
        .map_err(|e| ProductError::Validation(FieldErrors::from(&e)))?;

    match input {
        ProductInput {
            name: Some(name),
            description,
            price: Some(price),
            stock_quantity: Some(stock_quantity),
        } => Ok(ProductDraft {
            name,
            description,
            price,
            stock_quantity,
        }),
        // `required` rules reject these before we get here
        _ => Err(ProductError::Validation(FieldErrors::default())),
    }
}

/// Wrap a plain search term as a substring pattern; terms that already carry
/// `%` are used as given.
///
/// A dangling trailing `\` is doubled so it matches itself instead of
/// escaping nothing.
fn name_pattern(name: &str) -> String {
    let mut term = name.to_string();
    let trailing = term.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        term.push('\\');
    }

    if term.contains('%') {
        term
    } else {
        format!("%{term}%")
    }
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let draft = validate(input)?;
        self.repository.insert(draft).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Replace every mutable field of an existing product.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ProductInput) -> ProductResult<Product> {
        let draft = validate(input)?;
        let mut product = self.get_by_id(id).await?;
        product.apply(draft);
        self.repository.update(product).await
    }

    /// Change only the fields present in `patch`, then re-check the merged
    /// record against the same rules as a full update.
    #[instrument(skip(self, patch))]
    pub async fn partial_update(&self, id: i64, patch: ProductPatch) -> ProductResult<Product> {
        let mut product = self.get_by_id(id).await?;
        let draft = validate(patch.merge_into(&product))?;
        product.apply(draft);
        self.repository.update(product).await
    }

    /// Remove a product, returning what was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ProductResult<Product> {
        let product = self.get_by_id(id).await?;
        self.repository.delete(&product).await?;
        Ok(product)
    }

    /// Case-insensitive name search. An empty result is not an error here.
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        self.repository.find_by_name_like(&name_pattern(name)).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name_below_price(
        &self,
        name: &str,
        price: f64,
    ) -> ProductResult<Vec<Product>> {
        self.repository
            .find_by_name_like_and_price_below(&name_pattern(name), price)
            .await
    }

    /// Number of products whose stock is at or below `threshold`.
    #[instrument(skip(self))]
    pub async fn count_low_stock(&self, threshold: i32) -> ProductResult<u64> {
        self.repository.count_by_stock_at_most(threshold).await
    }

    #[instrument(skip(self))]
    pub async fn delete_low_stock(&self, threshold: i32) -> ProductResult<u64> {
        self.repository.delete_by_stock_at_most(threshold).await
    }
}
