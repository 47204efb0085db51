use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::product::{self, NewProduct, Product, ProductPatch};

use super::{decode_price, encode_price, Resource, Store, StoreError};

const COLUMNS: &str = "id, name, price, description, stock";

pub(crate) fn row_to_product(row: &SqliteRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: decode_price(row.try_get::<&str, _>("price")?)?,
        description: row.try_get("description")?,
        stock: row.try_get("stock")?,
    })
}

impl Store {
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("SELECT {} FROM products ORDER BY id", COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_product).collect()
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = ?", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => row_to_product(&row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let sql = format!(
            "INSERT INTO products (name, price, description, stock) VALUES (?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&input.name)
            .bind(encode_price(&input.price))
            .bind(&input.description)
            .bind(input.stock)
            .fetch_one(self.pool())
            .await?;
        row_to_product(&row)
    }

    /// Partial update: only the provided fields are written.
    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product, StoreError> {
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
        if patch.stock.is_some() {
            sets.push("stock = ?");
        }
        if sets.is_empty() {
            return self.get_product(id).await;
        }

        let sql = format!("UPDATE products SET {} WHERE id = ?", sets.join(", "));
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
        if let Some(stock) = patch.stock {
            query = query.bind(stock);
        }
        let result = query.bind(id).execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_product(id).await
    }

    /// Deleting a product takes its sales with it; both deletes commit
    /// together or not at all.
    pub async fn delete_product(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;
        sqlx::query("DELETE FROM sales WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for Product {
    type Wire = Product;

    async fn list(store: &Store) -> Result<Vec<Product>, StoreError> {
        store.list_products().await
    }

    async fn retrieve(store: &Store, id: i64) -> Result<Product, StoreError> {
        store.get_product(id).await
    }

    async fn create(store: &Store, payload: Value) -> Result<Product, StoreError> {
        let input = product::parse_create(payload)?;
        store.create_product(input).await
    }

    async fn update(store: &Store, id: i64, payload: Value) -> Result<Product, StoreError> {
        let patch = product::parse_update(payload)?;
        store.update_product(id, patch).await
    }

    async fn delete(store: &Store, id: i64) -> Result<(), StoreError> {
        store.delete_product(id).await
    }
}
