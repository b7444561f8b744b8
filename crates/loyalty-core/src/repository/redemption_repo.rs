//! 兑换仓储
//!
//! 提供兑换记录的数据访问。状态只沿 PENDING → COMPLETED / EXPIRED
//! 迁移，两条路径都是条件更新，调用方通过受影响行数判断是否竞争失败。

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Row};

use crate::error::Result;
use crate::models::{Redemption, RedemptionStatus};

const REDEMPTION_COLUMNS: &str = "id, code, customer_id, reward_id, points_spent, status, \
                                  confirmed_at, created_at, updated_at";

/// 兑换历史行（联表查询结果）
#[derive(Debug, sqlx::FromRow)]
pub struct RedemptionHistoryRow {
    pub id: i64,
    pub code: String,
    pub points_spent: i64,
    pub status: RedemptionStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub reward_id: i64,
    pub reward_name: String,
    pub image_url: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub image_mime: Option<String>,
}

/// 兑换仓储
pub struct RedemptionRepository {
    pool: PgPool,
}

impl RedemptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建 PENDING 兑换记录
    ///
    /// 返回新记录 ID；兑换码与既有记录冲突（唯一约束）时返回 None，
    /// 由调用方重新生成后重试。
    pub async fn insert_pending(
        &self,
        customer_id: i64,
        reward_id: i64,
        points_spent: i64,
        code: &str,
    ) -> Result<Option<i64>> {
        let result = sqlx::query(
            r#"
            INSERT INTO redemptions (code, customer_id, reward_id, points_spent, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(customer_id)
        .bind(reward_id)
        .bind(points_spent)
        .bind(RedemptionStatus::Pending)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(row.get("id"))),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 获取兑换记录
    pub async fn get(&self, id: i64) -> Result<Option<Redemption>> {
        let redemption = sqlx::query_as::<_, Redemption>(&format!(
            "SELECT {REDEMPTION_COLUMNS} FROM redemptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(redemption)
    }

    /// 根据兑换码获取兑换记录
    ///
    /// 兑换码在查找前已由调用方归一化为大写。
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Redemption>> {
        let redemption = sqlx::query_as::<_, Redemption>(&format!(
            "SELECT {REDEMPTION_COLUMNS} FROM redemptions WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(redemption)
    }

    /// 在事务中核销 PENDING 兑换
    ///
    /// 条件更新 + 受影响行数检查，是防止重复核销的唯一幂等闸门：
    /// 并发核销同一兑换码时恰好一个调用看到 1 行，其余看到 0 行。
    pub async fn complete_pending_in_tx(
        tx: &mut PgConnection,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE redemptions
            SET status = $2, confirmed_at = $3, updated_at = NOW()
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(RedemptionStatus::Completed)
        .bind(now)
        .bind(RedemptionStatus::Pending)
        .execute(&mut *tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// 列出会员的兑换历史（含奖品信息），按创建时间倒序
    pub async fn list_history_by_customer(
        &self,
        customer_id: i64,
        limit: i64,
    ) -> Result<Vec<RedemptionHistoryRow>> {
        let rows = sqlx::query_as::<_, RedemptionHistoryRow>(
            r#"
            SELECT
                d.id, d.code, d.points_spent, d.status,
                d.confirmed_at, d.created_at,
                r.id AS reward_id,
                r.name AS reward_name,
                r.image_url, r.image_data, r.image_mime
            FROM redemptions d
            JOIN rewards r ON r.id = d.reward_id
            WHERE d.customer_id = $1
            ORDER BY d.created_at DESC, d.id DESC
            LIMIT $2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 批量过期超时未核销的兑换
    ///
    /// 后台 Worker 调用。`FOR UPDATE SKIP LOCKED` 保证多实例部署时
    /// 不会重复处理同一批记录。
    pub async fn expire_stale(&self, cutoff: DateTime<Utc>, batch_size: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE redemptions
            SET status = $1, updated_at = NOW()
            WHERE id IN (
                SELECT id FROM redemptions
                WHERE status = $2 AND created_at < $3
                ORDER BY created_at ASC
                LIMIT $4
                FOR UPDATE SKIP LOCKED
            )
            "#,
        )
        .bind(RedemptionStatus::Expired)
        .bind(RedemptionStatus::Pending)
        .bind(cutoff)
        .bind(batch_size)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
