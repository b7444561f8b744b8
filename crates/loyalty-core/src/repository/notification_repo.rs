//! 通知仓储

use sqlx::{PgConnection, PgPool, Row};

use crate::error::Result;
use crate::models::Notification;

/// 通知仓储
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中创建通知
    pub async fn create_in_tx(
        tx: &mut PgConnection,
        customer_id: i64,
        title: &str,
        body: &str,
    ) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO notifications (customer_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .bind(title)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        Ok(row.get("id"))
    }

    /// 列出会员的通知，按时间倒序
    pub async fn list_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, customer_id, title, body, is_read, created_at
            FROM notifications
            WHERE customer_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }
}
