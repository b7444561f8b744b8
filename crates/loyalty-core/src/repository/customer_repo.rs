//! 会员仓储
//!
//! 提供会员账户的数据访问。余额变动只有两个入口：
//! 事务内的条件扣减与事务内的增加，均返回变动后余额。

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::Customer;

/// 会员仓储
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 根据外部标识获取会员
    pub async fn get_by_ref(&self, external_ref: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, external_ref, name, points, level, created_at, updated_at
            FROM customers
            WHERE external_ref = $1
            "#,
        )
        .bind(external_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// 根据主键获取会员
    pub async fn get(&self, id: i64) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, external_ref, name, points, level, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// 获取会员当前余额
    pub async fn get_points(&self, id: i64) -> Result<Option<i64>> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(points)
    }

    /// 在事务中带下限扣减余额
    ///
    /// 条件更新：仅当余额足够时扣减，返回扣减后的余额；
    /// 余额不足时不更新任何行，返回 None。并发扣减由此保证不会透支，
    /// 不允许退化为先读后写。
    pub async fn debit_points_in_tx(
        tx: &mut PgConnection,
        id: i64,
        amount: i64,
    ) -> Result<Option<i64>> {
        let balance_after: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE customers
            SET points = points - $2, updated_at = NOW()
            WHERE id = $1 AND points >= $2
            RETURNING points
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;

        Ok(balance_after)
    }

    /// 在事务中增加余额，返回增加后的余额
    pub async fn credit_points_in_tx(tx: &mut PgConnection, id: i64, amount: i64) -> Result<i64> {
        let balance_after: i64 = sqlx::query_scalar(
            r#"
            UPDATE customers
            SET points = points + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING points
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        Ok(balance_after)
    }
}
