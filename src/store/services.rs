use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::service::{self, NewService, Service, ServicePatch};

use super::{decode_price, encode_price, Resource, Store, StoreError};

const COLUMNS: &str = "id, name, price, description";

fn row_to_service(row: &SqliteRow) -> Result<Service, StoreError> {
    Ok(Service {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: decode_price(row.try_get::<&str, _>("price")?)?,
        description: row.try_get("description")?,
    })
}

impl Store {
    pub async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let sql = format!("SELECT {} FROM services ORDER BY id", COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_service).collect()
    }

    pub async fn get_service(&self, id: i64) -> Result<Service, StoreError> {
        let sql = format!("SELECT {} FROM services WHERE id = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => row_to_service(&row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn create_service(&self, input: NewService) -> Result<Service, StoreError> {
        let sql = format!(
            "INSERT INTO services (name, price, description) VALUES (?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&input.name)
            .bind(encode_price(&input.price))
            .bind(&input.description)
            .fetch_one(self.pool())
            .await?;
        row_to_service(&row)
    }

    pub async fn update_service(&self, id: i64, patch: ServicePatch) -> Result<Service, StoreError> {
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.price.is_some() {
            sets.push("price = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if sets.is_empty() {
            return self.get_service(id).await;
        }

        let sql = format!("UPDATE services SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(price) = &patch.price {
            query = query.bind(encode_price(price));
        }
        if let Some(description) = &patch.description {
            query = query.bind(description);
        }
        let result = query.bind(id).execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_service(id).await
    }

    pub async fn delete_service(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
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
impl Resource for Service {
    type Wire = Service;

    async fn list(store: &Store) -> Result<Vec<Service>, StoreError> {
        store.list_services().await
    }

    async fn retrieve(store: &Store, id: i64) -> Result<Service, StoreError> {
        store.get_service(id).await
    }

    async fn create(store: &Store, payload: Value) -> Result<Service, StoreError> {
        let input = service::parse_create(payload)?;
        store.create_service(input).await
    }

    async fn update(store: &Store, id: i64, payload: Value) -> Result<Service, StoreError> {
        let patch = service::parse_update(payload)?;
        store.update_service(id, patch).await
    }

    async fn delete(store: &Store, id: i64) -> Result<(), StoreError> {
        store.delete_service(id).await
    }
}
