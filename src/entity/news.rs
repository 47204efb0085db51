use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{ValidationError, WireObject};

pub const NAME_MAX: usize = 200;

/// Dated news item shown on the public site.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewNewsItem {
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewsItemPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub fn parse_create(payload: Value) -> Result<NewNewsItem, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let name = wire.require_str("name", NAME_MAX);
    let date = wire.require_date("date");
    let description = wire.require_text("description");
    wire.finish()?;
    Ok(NewNewsItem {
        name,
        date,
        description,
    })
}

pub fn parse_update(payload: Value) -> Result<NewsItemPatch, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let patch = NewsItemPatch {
        name: wire.opt_str("name", NAME_MAX),
        date: wire.opt_date("date"),
        description: wire.opt_text("description"),
    };
    wire.finish()?;
    Ok(patch)
}
