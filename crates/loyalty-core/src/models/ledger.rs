//! 积分流水实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TransactionType;

/// 积分流水
///
/// 只追加的账本记录：每一次余额变动恰好对应一条流水，
/// 任意时刻某会员所有流水金额之和等于其当前余额。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
    pub id: i64,
    pub customer_id: i64,
    /// 有符号变动金额（兑换为负，获得为正）
    pub amount: i64,
    pub tx_type: TransactionType,
    /// 人类可读的说明
    pub description: String,
    /// 关联的兑换码（兑换类流水）
    #[sqlx(default)]
    pub ref_code: Option<String>,
    /// 变动后的余额
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}
