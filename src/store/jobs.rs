use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::job::{self, JobPosting, JobPostingPatch, NewJobPosting};

use super::{Resource, Store, StoreError};

const COLUMNS: &str = "id, name, publication_date, description";

fn row_to_job_posting(row: &SqliteRow) -> Result<JobPosting, StoreError> {
    Ok(JobPosting {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        publication_date: row.try_get("publication_date")?,
        description: row.try_get("description")?,
    })
}

impl Store {
    pub async fn list_job_postings(&self) -> Result<Vec<JobPosting>, StoreError> {
        let sql = format!("SELECT {} FROM job_postings ORDER BY id", COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_job_posting).collect()
    }

    pub async fn get_job_posting(&self, id: i64) -> Result<JobPosting, StoreError> {
        let sql = format!("SELECT {} FROM job_postings WHERE id = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => row_to_job_posting(&row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn create_job_posting(&self, input: NewJobPosting) -> Result<JobPosting, StoreError> {
        let sql = format!(
            "INSERT INTO job_postings (name, publication_date, description) VALUES (?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&input.name)
            .bind(input.publication_date)
            .bind(&input.description)
            .fetch_one(self.pool())
            .await?;
        row_to_job_posting(&row)
    }

    pub async fn update_job_posting(
        &self,
        id: i64,
        patch: JobPostingPatch,
    ) -> Result<JobPosting, StoreError> {
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.publication_date.is_some() {
            sets.push("publication_date = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if sets.is_empty() {
            return self.get_job_posting(id).await;
        }

        let sql = format!("UPDATE job_postings SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(publication_date) = patch.publication_date {
            query = query.bind(publication_date);
        }
        if let Some(description) = &patch.description {
            query = query.bind(description);
        }
        let result = query.bind(id).execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_job_posting(id).await
    }

    pub async fn delete_job_posting(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for JobPosting {
    type Wire = JobPosting;

    async fn list(store: &Store) -> Result<Vec<JobPosting>, StoreError> {
        store.list_job_postings().await
    }

    async fn retrieve(store: &Store, id: i64) -> Result<JobPosting, StoreError> {
        store.get_job_posting(id).await
    }

    async fn create(store: &Store, payload: Value) -> Result<JobPosting, StoreError> {
        let input = job::parse_create(payload)?;
        store.create_job_posting(input).await
    }

    async fn update(store: &Store, id: i64, payload: Value) -> Result<JobPosting, StoreError> {
        let patch = job::parse_update(payload)?;
        store.update_job_posting(id, patch).await
    }

    async fn delete(store: &Store, id: i64) -> Result<(), StoreError> {
        store.delete_job_posting(id).await
    }
}
