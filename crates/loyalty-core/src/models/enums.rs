//! 状态与类型枚举

use serde::{Deserialize, Serialize};

/// 兑换状态
///
/// 生命周期：PENDING → COMPLETED（核销，恰好一次）
/// 或 PENDING → EXPIRED（后台扫描）。COMPLETED 与 EXPIRED 为终态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
pub enum RedemptionStatus {
    /// 已发起，等待店员核销
    #[default]
    Pending,
    /// 已核销，积分已扣减
    Completed,
    /// 超时未核销
    Expired,
}

impl RedemptionStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }
}

/// 积分流水类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// 获得积分（金额为正）
    Earn,
    /// 兑换扣减（金额为负）
    Redeem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_terminal() {
        assert!(!RedemptionStatus::Pending.is_terminal());
        assert!(RedemptionStatus::Completed.is_terminal());
        assert!(RedemptionStatus::Expired.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RedemptionStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&RedemptionStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionType::Redeem).unwrap(),
            "\"REDEEM\""
        );
    }
}
