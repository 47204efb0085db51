use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::entity::product::Product;
use crate::entity::sale::{self, NewSale, Sale, SalePatch, SaleWire};

use super::{decode_price, Resource, Store, StoreError};

/// Sales always read through a join so the wire form carries the product as
/// it currently stands.
const SALE_SELECT: &str = "SELECT s.id AS sale_id, s.name AS sale_name, s.quantity, s.date, \
     p.id AS product_id, p.name AS product_name, p.price AS product_price, \
     p.description AS product_description, p.stock AS product_stock \
     FROM sales s JOIN products p ON p.id = s.product_id";

fn row_to_sale_wire(row: &SqliteRow) -> Result<SaleWire, StoreError> {
    Ok(SaleWire {
        id: row.try_get("sale_id")?,
        name: row.try_get("sale_name")?,
        product: Product {
            id: row.try_get("product_id")?,
            name: row.try_get("product_name")?,
            price: decode_price(row.try_get::<&str, _>("product_price")?)?,
            description: row.try_get("product_description")?,
            stock: row.try_get("product_stock")?,
        },
        quantity: row.try_get("quantity")?,
        date: row.try_get("date")?,
    })
}

impl Store {
    pub async fn list_sales(&self) -> Result<Vec<SaleWire>, StoreError> {
        let sql = format!("{} ORDER BY s.id", SALE_SELECT);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(row_to_sale_wire).collect()
    }

    pub async fn get_sale(&self, id: i64) -> Result<SaleWire, StoreError> {
        let sql = format!("{} WHERE s.id = ?", SALE_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => row_to_sale_wire(&row),
            None => Err(StoreError::NotFound),
        }
    }

    /// The referenced product is verified inside the insert transaction, so a
    /// failed reference never leaves a row behind.
    pub async fn create_sale(&self, input: NewSale) -> Result<SaleWire, StoreError> {
        let mut tx = self.pool().begin().await?;
        let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
            .bind(input.product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if product.is_none() {
            tx.rollback().await?;
            return Err(StoreError::ForeignKey(input.product_id));
        }
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sales (name, product_id, quantity, date) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.date)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        self.get_sale(id).await
    }

    pub async fn update_sale(&self, id: i64, patch: SalePatch) -> Result<SaleWire, StoreError> {
        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.product_id.is_some() {
            sets.push("product_id = ?");
        }
        if patch.quantity.is_some() {
            sets.push("quantity = ?");
        }
        if patch.date.is_some() {
            sets.push("date = ?");
        }
        if sets.is_empty() {
            return self.get_sale(id).await;
        }

        let mut tx = self.pool().begin().await?;
        if let Some(product_id) = patch.product_id {
            let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
            if product.is_none() {
                tx.rollback().await?;
                return Err(StoreError::ForeignKey(product_id));
            }
        }

        let sql = format!("UPDATE sales SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(product_id) = patch.product_id {
            query = query.bind(product_id);
        }
        if let Some(quantity) = patch.quantity {
            query = query.bind(quantity);
        }
        if let Some(date) = patch.date {
            query = query.bind(date);
        }
        let result = query.bind(id).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }
        tx.commit().await?;
        self.get_sale(id).await
    }

    pub async fn delete_sale(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
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
impl Resource for Sale {
    type Wire = SaleWire;

    async fn list(store: &Store) -> Result<Vec<SaleWire>, StoreError> {
        store.list_sales().await
    }

    async fn retrieve(store: &Store, id: i64) -> Result<SaleWire, StoreError> {
        store.get_sale(id).await
    }

    async fn create(store: &Store, payload: Value) -> Result<SaleWire, StoreError> {
        let input = sale::parse_create(payload)?;
        store.create_sale(input).await
    }

    async fn update(store: &Store, id: i64, payload: Value) -> Result<SaleWire, StoreError> {
        let patch = sale::parse_update(payload)?;
        store.update_sale(id, patch).await
    }

    async fn delete(store: &Store, id: i64) -> Result<(), StoreError> {
        store.delete_sale(id).await
    }
}
