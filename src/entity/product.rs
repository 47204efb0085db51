use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{ValidationError, WireObject};

pub const NAME_MAX: usize = 100;

/// Catalog product. Referenced by sales; deleting one removes its sales.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "crate::entity::serialize_price")]
    pub price: Decimal,
    pub description: String,
    pub stock: i64,
}

/// Validated create payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub stock: i64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub stock: Option<i64>,
}

pub fn parse_create(payload: Value) -> Result<NewProduct, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let name = wire.require_str("name", NAME_MAX);
    let price = wire.require_price("price");
    let description = wire.require_text("description");
    let stock = wire.require_int("stock");
    wire.finish()?;
    Ok(NewProduct {
        name,
        price,
        description,
        stock,
    })
}

pub fn parse_update(payload: Value) -> Result<ProductPatch, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let patch = ProductPatch {
        name: wire.opt_str("name", NAME_MAX),
        price: wire.opt_price("price"),
        description: wire.opt_text("description"),
        stock: wire.opt_int("stock"),
    };
    wire.finish()?;
    Ok(patch)
}
