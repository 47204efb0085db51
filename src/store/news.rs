use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::news::{self, NewNewsItem, NewsItem, NewsItemPatch};

use super::{Resource, Store, StoreError};

const COLUMNS: &str = "id, name, date, description";

fn row_to_news_item(row: &SqliteRow) -> Result<NewsItem, StoreError> {
    Ok(NewsItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        date: row.try_get("date")?,
        description: row.try_get("description")?,
    })
}

impl Store {
    pub async fn list_news_items(&self) -> Result<Vec<NewsItem>, StoreError> {
        let sql = format!("SELECT {} FROM news_items ORDER BY id", COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_news_item).collect()
    }

    pub async fn get_news_item(&self, id: i64) -> Result<NewsItem, StoreError> {
        let sql = format!("SELECT {} FROM news_items WHERE id = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => row_to_news_item(&row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn create_news_item(&self, input: NewNewsItem) -> Result<NewsItem, StoreError> {
        let sql = format!(
            "INSERT INTO news_items (name, date, description) VALUES (?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&input.name)
            .bind(input.date)
            .bind(&input.description)
            .fetch_one(self.pool())
            .await?;
        row_to_news_item(&row)
    }

    pub async fn update_news_item(
        &self,
        id: i64,
        patch: NewsItemPatch,
    ) -> Result<NewsItem, StoreError> {
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.date.is_some() {
            sets.push("date = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if sets.is_empty() {
            return self.get_news_item(id).await;
        }

        let sql = format!("UPDATE news_items SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(date) = patch.date {
            query = query.bind(date);
        }
        if let Some(description) = &patch.description {
            query = query.bind(description);
        }
        let result = query.bind(id).execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_news_item(id).await
    }

    pub async fn delete_news_item(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM news_items WHERE id = ?")
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
impl Resource for NewsItem {
    type Wire = NewsItem;

    async fn list(store: &Store) -> Result<Vec<NewsItem>, StoreError> {
        store.list_news_items().await
    }

    async fn retrieve(store: &Store, id: i64) -> Result<NewsItem, StoreError> {
        store.get_news_item(id).await
    }

    async fn create(store: &Store, payload: Value) -> Result<NewsItem, StoreError> {
        let input = news::parse_create(payload)?;
        store.create_news_item(input).await
    }

    async fn update(store: &Store, id: i64, payload: Value) -> Result<NewsItem, StoreError> {
        let patch = news::parse_update(payload)?;
        store.update_news_item(id, patch).await
    }

    async fn delete(store: &Store, id: i64) -> Result<(), StoreError> {
        store.delete_news_item(id).await
    }
}
