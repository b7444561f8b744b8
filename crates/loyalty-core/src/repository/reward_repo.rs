//! 奖品仓储

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::Reward;

const REWARD_COLUMNS: &str = "id, name, description, points_required, quantity, is_active, \
                              start_time, end_time, image_url, image_data, image_mime, \
                              created_at, updated_at";

/// 奖品仓储
pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取单个奖品
    pub async fn get(&self, id: i64) -> Result<Option<Reward>> {
        let reward = sqlx::query_as::<_, Reward>(&format!(
            "SELECT {REWARD_COLUMNS} FROM rewards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reward)
    }

    /// 列出当前可见的奖品目录
    ///
    /// 只返回上架且在时间窗口内的条目，按所需积分升序。
    pub async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Reward>> {
        let rewards = sqlx::query_as::<_, Reward>(&format!(
            r#"
            SELECT {REWARD_COLUMNS}
            FROM rewards
            WHERE is_active = true
              AND (start_time IS NULL OR start_time <= $1)
              AND (end_time IS NULL OR end_time >= $1)
            ORDER BY points_required ASC, id ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rewards)
    }

    /// 在事务中扣减库存
    ///
    /// 库存在结算时消耗，与积分扣减同一事务。不限量（NULL）不变动；
    /// 已为零时不更新（发起侧的可兑换检查只是预检，结算不因库存报错）。
    pub async fn decrement_stock_in_tx(tx: &mut PgConnection, id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE rewards
            SET quantity = quantity - 1, updated_at = NOW()
            WHERE id = $1 AND quantity IS NOT NULL AND quantity > 0
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        Ok(result.rows_affected())
    }
}
