use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::product::Product;
use super::{ValidationError, WireObject};

pub const NAME_MAX: usize = 100;

/// Sale row as stored: references its product by id. Reads go out as
/// [`SaleWire`] with the product expanded.
#[derive(Debug, Clone)]
pub struct Sale {
    pub id: i64,
    pub name: String,
    pub product_id: i64,
    pub quantity: i64,
    pub date: NaiveDate,
}

/// Read form: the referenced product rides along in full, reflecting its
/// current state at read time.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWire {
    pub id: i64,
    pub name: String,
    pub product: Product,
    pub quantity: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub name: String,
    pub product_id: i64,
    pub quantity: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct SalePatch {
    pub name: Option<String>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub date: Option<NaiveDate>,
}

const NESTED_PRODUCT: &str = "Writes take a product id under \"product_id\", not a nested object.";

pub fn parse_create(payload: Value) -> Result<NewSale, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    if wire.has("product") {
        wire.error("product", NESTED_PRODUCT);
    }
    let name = wire.require_str("name", NAME_MAX);
    let product_id = wire.require_int("product_id");
    let quantity = wire.require_int("quantity");
    let date = wire.require_date("date");
    wire.finish()?;
    Ok(NewSale {
        name,
        product_id,
        quantity,
        date,
    })
}

pub fn parse_update(payload: Value) -> Result<SalePatch, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    if wire.has("product") {
        wire.error("product", NESTED_PRODUCT);
    }
    let patch = SalePatch {
        name: wire.opt_str("name", NAME_MAX),
        product_id: wire.opt_int("product_id"),
        quantity: wire.opt_int("quantity"),
        date: wire.opt_date("date"),
    };
    wire.finish()?;
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_reject_the_nested_product_form() {
        let err = parse_create(json!({
            "name": "Summer deal",
            "product": { "id": 1 },
            "quantity": 2,
            "date": "2026-08-06"
        }))
        .unwrap_err();
        assert!(err.fields.contains_key("product"));
        // product_id is still required alongside the rejection
        assert!(err.fields.contains_key("product_id"));
    }

    #[test]
    fn create_parses_the_flat_form() {
        let sale = parse_create(json!({
            "name": "Summer deal",
            "product_id": 3,
            "quantity": 2,
            "date": "2026-08-06"
        }))
        .unwrap();
        assert_eq!(sale.product_id, 3);
        assert_eq!(sale.date.to_string(), "2026-08-06");
    }
}
