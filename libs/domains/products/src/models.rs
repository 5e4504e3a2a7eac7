use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A persisted product. Only the repository hands these out, so `id` is
/// always the one assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "quantidadeEstoque")]
    pub stock_quantity: i32,
}

impl Product {
    /// Overwrite every mutable field, keeping the id.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.stock_quantity = draft.stock_quantity;
    }
}

/// Full product body for insert and replace.
///
/// Fields are optional so a missing or `null` required field is reported as
/// a validation message instead of a deserialization failure. Any `id` in the
/// body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[serde(rename = "nome", default)]
    #[validate(
        required(message = "O nome não pode ser nulo"),
        length(min = 2, message = "O nome deve ter pelo menos dois caracteres")
    )]
    pub name: Option<String>,

    #[serde(rename = "descricao", default)]
    pub description: Option<String>,

    #[serde(rename = "preco", default)]
    #[validate(
        required(message = "O preço não pode ser nulo"),
        range(min = 0.0, message = "O preço deve ser pelo menos 0")
    )]
    pub price: Option<f64>,

    #[serde(rename = "quantidadeEstoque", default)]
    #[validate(
        required(message = "A quantidade não pode ser nulo"),
        range(min = 0, message = "A quantidade deve ser no minimo 0")
    )]
    pub stock_quantity: Option<i32>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            description: product.description.clone(),
            price: Some(product.price),
            stock_quantity: Some(product.stock_quantity),
        }
    }
}

/// Partial update body.
///
/// Outer `None` means the key was absent and the field is kept; `Some(None)`
/// means an explicit `null`, which clears the field (and fails validation for
/// required ones).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "nome", default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(rename = "descricao", default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(rename = "preco", default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
    #[serde(rename = "quantidadeEstoque", default, deserialize_with = "present")]
    pub stock_quantity: Option<Option<i32>>,
}

impl ProductPatch {
    /// The record that would result from applying this patch to `current`.
    pub fn merge_into(self, current: &Product) -> ProductInput {
        let mut merged = ProductInput::from(current);
        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(description) = self.description {
            merged.description = description;
        }
        if let Some(price) = self.price {
            merged.price = price;
        }
        if let Some(stock_quantity) = self.stock_quantity {
            merged.stock_quantity = stock_quantity;
        }
        merged
    }
}

// Runs only when the key is present, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated, fully populated set of product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
}

/// `?nome=` for name search.
#[derive(Debug, Clone, Deserialize)]
pub struct NameQuery {
    pub nome: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caneta() -> Product {
        Product {
            id: 1,
            name: "Caneta".to_string(),
            description: Some("Azul".to_string()),
            price: 2.5,
            stock_quantity: 10,
        }
    }

    #[test]
    fn test_product_serializes_with_portuguese_keys() {
        let value = serde_json::to_value(caneta()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "nome": "Caneta",
                "descricao": "Azul",
                "preco": 2.5,
                "quantidadeEstoque": 10
            })
        );
    }

    #[test]
    fn test_input_tolerates_missing_and_null_fields() {
        let input: ProductInput = serde_json::from_value(json!({"nome": null, "preco": 1.0})).unwrap();
        assert_eq!(input.name, None);
        assert_eq!(input.price, Some(1.0));
        assert_eq!(input.stock_quantity, None);
    }

    #[test]
    fn test_input_validation_rules() {
        let valid = ProductInput {
            name: Some("Lápis".to_string()),
            description: None,
            price: Some(0.0),
            stock_quantity: Some(0),
        };
        assert!(valid.validate().is_ok());

        let short = ProductInput {
            name: Some("L".to_string()),
            ..valid.clone()
        };
        assert!(short.validate().is_err());

        let negative = ProductInput {
            stock_quantity: Some(-1),
            ..valid
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let patch: ProductPatch =
            serde_json::from_value(json!({"preco": 10.5, "descricao": null})).unwrap();

        assert_eq!(patch.price, Some(Some(10.5)));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.name, None);
        assert_eq!(patch.stock_quantity, None);
    }

    #[test]
    fn test_patch_merge_keeps_untouched_fields() {
        let patch: ProductPatch = serde_json::from_value(json!({"preco": 10.5})).unwrap();
        let merged = patch.merge_into(&caneta());

        assert_eq!(merged.name.as_deref(), Some("Caneta"));
        assert_eq!(merged.description.as_deref(), Some("Azul"));
        assert_eq!(merged.price, Some(10.5));
        assert_eq!(merged.stock_quantity, Some(10));
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut product = caneta();
        product.apply(ProductDraft {
            name: "Caderno".to_string(),
            description: None,
            price: 15.0,
            stock_quantity: 3,
        });

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Caderno");
        assert_eq!(product.description, None);
    }
}
