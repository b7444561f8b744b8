//! 积分流水仓储
//!
//! 只追加：提供插入和查询，不提供任何更新或删除。

use sqlx::{PgConnection, PgPool, Row};

use crate::error::Result;
use crate::models::PointTransaction;

/// 积分流水仓储
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中追加流水记录
    ///
    /// 余额变动与流水追加必须在同一事务内，否则账本不变量被破坏。
    pub async fn create_in_tx(tx: &mut PgConnection, entry: &PointTransaction) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO point_transactions
                (customer_id, amount, tx_type, description, ref_code, balance_after, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(entry.customer_id)
        .bind(entry.amount)
        .bind(entry.tx_type)
        .bind(&entry.description)
        .bind(&entry.ref_code)
        .bind(entry.balance_after)
        .bind(entry.created_at)
        .fetch_one(&mut *tx)
        .await?;

        Ok(row.get("id"))
    }

    /// 列出会员的流水记录，按时间倒序
    pub async fn list_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
    ) -> Result<Vec<PointTransaction>> {
        let entries = sqlx::query_as::<_, PointTransaction>(
            r#"
            SELECT id, customer_id, amount, tx_type, description, ref_code,
                   balance_after, created_at
            FROM point_transactions
            WHERE customer_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// 会员所有流水金额之和
    ///
    /// 审计用：任意时刻应等于 customers.points。
    pub async fn sum_by_customer(&self, customer_id: i64) -> Result<i64> {
        let sum: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::bigint
            FROM point_transactions
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}
