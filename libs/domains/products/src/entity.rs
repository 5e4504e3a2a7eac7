use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{Product, ProductDraft};

/// Sea-ORM entity for the `produto` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "produto")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "nome", column_type = "Text")]
    pub name: String,
    #[sea_orm(column_name = "descricao", column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "preco")]
    pub price: f64,
    #[sea_orm(column_name = "quantidadeestoque")]
    pub stock_quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock_quantity: model.stock_quantity,
        }
    }
}

// Insert: the database assigns the id.
impl From<ProductDraft> for ActiveModel {
    fn from(draft: ProductDraft) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            description: Set(draft.description),
            price: Set(draft.price),
            stock_quantity: Set(draft.stock_quantity),
        }
    }
}

// Update: every column is written back.
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock_quantity: Set(product.stock_quantity),
        }
    }
}
