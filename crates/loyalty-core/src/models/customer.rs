//! 会员实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会员账户
///
/// `points` 是本核心中唯一的共享可变资源，所有变动都必须经由
/// 结算/积分事务完成，并伴随一条积分流水。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    /// 聊天平台侧的会员标识（如 OA 用户 ID）
    pub external_ref: String,
    pub name: String,
    /// 当前积分余额，永不为负
    pub points: i64,
    /// 会员等级标签
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// 检查余额是否足以支付指定成本
    pub fn can_afford(&self, cost: i64) -> bool {
        self.points >= cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_customer(points: i64) -> Customer {
        Customer {
            id: 1,
            external_ref: "zalo-0001".to_string(),
            name: "Test Customer".to_string(),
            points,
            level: "MEMBER".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_afford_boundary() {
        // 边界：恰好等于成本时可以兑换
        assert!(create_test_customer(100).can_afford(100));
        assert!(!create_test_customer(99).can_afford(100));
        assert!(create_test_customer(150).can_afford(100));
    }
}
