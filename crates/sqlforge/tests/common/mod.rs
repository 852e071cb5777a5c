#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use sqlforge::SqliteDescriber;

pub const CREATE_ORDERS_SQL: &str = r"
CREATE TABLE orders (
    order_id INTEGER NOT NULL PRIMARY KEY,
    customer_id INTEGER NOT NULL,
    status VARCHAR(20) NOT NULL,
    notes TEXT,
    total DECIMAL(10,2),
    created_at TIMESTAMP,
    payload
)
";

pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap()
}

/// An in-memory database holding the `orders` table.
pub async fn shop() -> SqliteDescriber {
    let pool = memory_pool().await;
    sqlx::query(CREATE_ORDERS_SQL).execute(&pool).await.unwrap();
    SqliteDescriber::new(pool)
}
