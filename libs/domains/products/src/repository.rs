use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductDraft};

/// Repository trait for Product persistence
///
/// Name patterns use SQL `LIKE` syntax (`%` any run, `_` one character) and
/// match case-insensitively in every implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by id
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Persist a new product and return it with its assigned id
    async fn insert(&self, draft: ProductDraft) -> ProductResult<Product>;

    /// Overwrite an existing product; `NotFound` if its id is gone
    async fn update(&self, product: Product) -> ProductResult<Product>;

    async fn delete(&self, product: &Product) -> ProductResult<()>;

    async fn find_by_name_like(&self, pattern: &str) -> ProductResult<Vec<Product>>;

    /// Name pattern match with price strictly below `price`
    async fn find_by_name_like_and_price_below(
        &self,
        pattern: &str,
        price: f64,
    ) -> ProductResult<Vec<Product>>;

    /// Number of products with stock quantity <= `threshold`
    async fn count_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64>;

    /// Remove every product with stock quantity <= `threshold`, returning how many went
    async fn delete_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64>;
}

#[derive(Default)]
struct Store {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn insert(&self, draft: ProductDraft) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.next_id += 1;

        let product = Product {
            id: store.next_id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock_quantity: draft.stock_quantity,
        };
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        let slot = store
            .products
            .get_mut(&product.id)
            .ok_or(ProductError::NotFound(product.id))?;
        *slot = product.clone();

        tracing::info!(product_id = product.id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, product: &Product) -> ProductResult<()> {
        let mut store = self.store.write().await;
        if store.products.remove(&product.id).is_some() {
            tracing::info!(product_id = product.id, "Deleted product");
        }
        Ok(())
    }

    async fn find_by_name_like(&self, pattern: &str) -> ProductResult<Vec<Product>> {
        let re = like_regex(pattern)?;
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| re.is_match(&p.name))
            .cloned()
            .collect())
    }

    async fn find_by_name_like_and_price_below(
        &self,
        pattern: &str,
        price: f64,
    ) -> ProductResult<Vec<Product>> {
        let re = like_regex(pattern)?;
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| p.price < price && re.is_match(&p.name))
            .cloned()
            .collect())
    }

    async fn count_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| p.stock_quantity <= threshold)
            .count() as u64)
    }

    async fn delete_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64> {
        let mut store = self.store.write().await;
        let before = store.products.len();
        store.products.retain(|_, p| p.stock_quantity > threshold);
        let removed = (before - store.products.len()) as u64;

        tracing::info!(threshold, removed, "Deleted low-stock products");
        Ok(removed)
    }
}

/// Translate a SQL `LIKE` pattern into an anchored case-insensitive regex.
///
/// `\` escapes the next character; a trailing `\` is taken literally.
pub(crate) fn like_regex(pattern: &str) -> ProductResult<Regex> {
    let mut translated = String::from("(?is)^");
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        let wildcard = match c {
            '%' => ".*",
            '_' => ".",
            '\\' => {
                literal.push(chars.next().unwrap_or('\\'));
                continue;
            }
            other => {
                literal.push(other);
                continue;
            }
        };
        translated.push_str(&regex::escape(&literal));
        literal.clear();
        translated.push_str(wildcard);
    }
    translated.push_str(&regex::escape(&literal));
    translated.push('$');

    Regex::new(&translated).map_err(|e| ProductError::InvalidPattern(e.to_string()))
}
