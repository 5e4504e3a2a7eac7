use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, ProductDraft},
    repository::ProductRepository,
};

/// PostgreSQL-backed ProductRepository
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `produto` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), database::DatabaseError> {
        database::postgres::create_table_if_missing(&self.db, entity::Entity).await
    }
}

// Case-insensitive LIKE that behaves the same on any collation.
fn name_like(pattern: &str) -> Condition {
    Condition::all().add(Expr::cust_with_values(
        "LOWER(\"nome\") LIKE LOWER($1)",
        [pattern.to_string()],
    ))
}

fn into_products(models: Vec<entity::Model>) -> Vec<Product> {
    models.into_iter().map(Product::from).collect()
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(into_products(models))
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn insert(&self, draft: ProductDraft) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = draft.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active_model: entity::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => ProductError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(product_id = model.id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, product: &Product) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(product.id)
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = product.id, "Deleted product");
        }
        Ok(())
    }

    async fn find_by_name_like(&self, pattern: &str) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(name_like(pattern))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(into_products(models))
    }

    async fn find_by_name_like_and_price_below(
        &self,
        pattern: &str,
        price: f64,
    ) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(name_like(pattern))
            .filter(entity::Column::Price.lt(price))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(into_products(models))
    }

    async fn count_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64> {
        let count = entity::Entity::find()
            .filter(entity::Column::StockQuantity.lte(threshold))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn delete_by_stock_at_most(&self, threshold: i32) -> ProductResult<u64> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::StockQuantity.lte(threshold))
            .exec(&self.db)
            .await?;

        tracing::info!(threshold, removed = result.rows_affected, "Deleted low-stock products");
        Ok(result.rows_affected)
    }
}
