//! 通知实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会员通知
///
/// 结算完成后写入的提示记录；不参与账本不变量，投递由外部系统负责。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub customer_id: i64,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
