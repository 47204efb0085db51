use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{ValidationError, WireObject};

pub const NAME_MAX: usize = 200;

/// Open position listed on the careers page.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub id: i64,
    pub name: String,
    pub publication_date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub name: String,
    pub publication_date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobPostingPatch {
    pub name: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub description: Option<String>,
}

pub fn parse_create(payload: Value) -> Result<NewJobPosting, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let name = wire.require_str("name", NAME_MAX);
    let publication_date = wire.require_date("publication_date");
    let description = wire.require_text("description");
    wire.finish()?;
    Ok(NewJobPosting {
        name,
        publication_date,
        description,
    })
}

pub fn parse_update(payload: Value) -> Result<JobPostingPatch, ValidationError> {
    let mut wire = WireObject::new(payload)?;
    let patch = JobPostingPatch {
        name: wire.opt_str("name", NAME_MAX),
        publication_date: wire.opt_date("publication_date"),
        description: wire.opt_text("description"),
    };
    wire.finish()?;
    Ok(patch)
}
