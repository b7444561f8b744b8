//! 兑换记录实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::RedemptionStatus;

/// 兑换记录
///
/// 将会员与奖品通过唯一兑换码关联起来的事务性记录。
/// `points_spent` 在发起时快照，奖品后续改价不影响已发起的兑换。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: i64,
    /// 兑换码（全局唯一，大写字母数字）
    pub code: String,
    pub customer_id: i64,
    pub reward_id: i64,
    /// 发起时快照的积分成本
    pub points_spent: i64,
    pub status: RedemptionStatus,
    /// 核销时间（仅 COMPLETED 状态有值）
    #[sqlx(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Redemption {
    /// 是否可以核销
    pub fn is_confirmable(&self) -> bool {
        self.status == RedemptionStatus::Pending
    }
}
