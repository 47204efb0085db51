use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serializer;
use serde_json::{Map, Value};

pub mod job;
pub mod news;
pub mod product;
pub mod sale;
pub mod service;
pub mod user;

pub use job::JobPosting;
pub use news::NewsItem;
pub use product::Product;
pub use sale::Sale;
pub use service::Service;

/// Per-field validation failures for one wire payload.
#[derive(Debug, Clone, Default, thiserror::Error)]
#[error("invalid input")]
pub struct ValidationError {
    pub fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.into());
        Self { fields }
    }
}

/// Prices always travel as strings with exactly two fraction digits.
pub fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let mut scaled = *price;
    scaled.rescale(2);
    serializer.serialize_str(&scaled.to_string())
}

/// Incoming JSON object being picked apart field by field.
///
/// Parse failures accumulate instead of failing fast so one response reports
/// every bad field at once. Unknown fields are ignored.
pub(crate) struct WireObject {
    map: Map<String, Value>,
    errors: BTreeMap<String, String>,
}

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";

impl WireObject {
    pub fn new(payload: Value) -> Result<Self, ValidationError> {
        match payload {
            Value::Object(map) => Ok(Self {
                map,
                errors: BTreeMap::new(),
            }),
            _ => Err(ValidationError::single(
                "non_field_errors",
                "Invalid data. Expected a JSON object.",
            )),
        }
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// `true` when the payload carries `field`, parsed or not.
    pub fn has(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }

    fn require<T: Default>(
        &mut self,
        field: &str,
        parse: impl Fn(&Value) -> Result<T, String>,
    ) -> T {
        match self.map.remove(field) {
            None | Some(Value::Null) => {
                self.error(field, REQUIRED);
                T::default()
            }
            Some(value) => parse(&value).unwrap_or_else(|message| {
                self.error(field, message);
                T::default()
            }),
        }
    }

    fn optional<T>(
        &mut self,
        field: &str,
        parse: impl Fn(&Value) -> Result<T, String>,
    ) -> Option<T> {
        let value = self.map.remove(field)?;
        if value.is_null() {
            self.error(field, NOT_NULL);
            return None;
        }
        match parse(&value) {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                self.error(field, message);
                None
            }
        }
    }

    pub fn require_str(&mut self, field: &str, max_len: usize) -> String {
        self.require(field, |v| parse_str(v, max_len))
    }

    pub fn opt_str(&mut self, field: &str, max_len: usize) -> Option<String> {
        self.optional(field, |v| parse_str(v, max_len))
    }

    pub fn require_text(&mut self, field: &str) -> String {
        self.require(field, |v| parse_str(v, usize::MAX))
    }

    pub fn opt_text(&mut self, field: &str) -> Option<String> {
        self.optional(field, |v| parse_str(v, usize::MAX))
    }

    pub fn require_price(&mut self, field: &str) -> Decimal {
        self.require(field, parse_price)
    }

    pub fn opt_price(&mut self, field: &str) -> Option<Decimal> {
        self.optional(field, parse_price)
    }

    pub fn require_date(&mut self, field: &str) -> NaiveDate {
        self.require(field, parse_date)
    }

    pub fn opt_date(&mut self, field: &str) -> Option<NaiveDate> {
        self.optional(field, parse_date)
    }

    pub fn require_int(&mut self, field: &str) -> i64 {
        self.require(field, parse_int)
    }

    pub fn opt_int(&mut self, field: &str) -> Option<i64> {
        self.optional(field, parse_int)
    }
}

fn parse_str(value: &Value, max_len: usize) -> Result<String, String> {
    let Value::String(s) = value else {
        return Err("Not a valid string.".to_string());
    };
    if s.trim().is_empty() {
        return Err("This field may not be blank.".to_string());
    }
    if s.chars().count() > max_len {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            max_len
        ));
    }
    Ok(s.clone())
}

fn parse_price(value: &Value) -> Result<Decimal, String> {
    const NOT_A_NUMBER: &str = "A valid number is required.";
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_A_NUMBER.to_string()),
    };
    let price: Decimal = raw.parse().map_err(|_| NOT_A_NUMBER.to_string())?;
    let price = price.normalize();
    if price.scale() > 2 {
        return Err("Ensure that there are no more than 2 decimal places.".to_string());
    }
    let mut price = price;
    price.rescale(2);
    if price.mantissa().abs() >= 10_i128.pow(10) {
        return Err("Ensure that there are no more than 10 digits in total.".to_string());
    }
    Ok(price)
}

fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    const BAD_DATE: &str = "Date has wrong format. Use YYYY-MM-DD.";
    let Value::String(s) = value else {
        return Err(BAD_DATE.to_string());
    };
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| BAD_DATE.to_string())
}

fn parse_int(value: &Value) -> Result<i64, String> {
    const NOT_AN_INT: &str = "A valid integer is required.";
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| NOT_AN_INT.to_string()),
        Value::String(s) => s.trim().parse().map_err(|_| NOT_AN_INT.to_string()),
        _ => Err(NOT_AN_INT.to_string()),
    }
}
