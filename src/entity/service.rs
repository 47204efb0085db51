use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{ValidationError, WireObject};

pub const NAME_MAX: usize = 100;

/// Offered service: like a product but with nothing held in stock.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "crate::entity::serialize_price")]
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

pub fn parse_create(payload: Value) -> Result<NewService, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let name = wire.require_str("name", NAME_MAX);
    let price = wire.require_price("price");
    let description = wire.require_text("description");
    wire.finish()?;
    Ok(NewService {
        name,
        price,
        description,
    })
}

pub fn parse_update(payload: Value) -> Result<ServicePatch, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let patch = ServicePatch {
        name: wire.opt_str("name", NAME_MAX),
        price: wire.opt_price("price"),
        description: wire.opt_text("description"),
    };
    wire.finish()?;
    Ok(patch)
}
