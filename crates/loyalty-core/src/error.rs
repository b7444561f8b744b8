//! 积分服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

/// 积分服务错误类型
#[derive(Debug, Error)]
pub enum LoyaltyError {
    // === 会员相关错误 ===
    #[error("会员不存在: {0}")]
    CustomerNotFound(String),

    // === 奖品相关错误 ===
    #[error("奖品不存在: {0}")]
    RewardNotFound(i64),

    #[error("奖品当前不可兑换: reward_id={0}")]
    RewardUnavailable(i64),

    // === 兑换相关错误 ===
    #[error("兑换记录不存在: {0}")]
    RedemptionNotFound(i64),

    #[error("兑换码不存在: {0}")]
    CodeNotFound(String),

    #[error("兑换码已核销: {0}")]
    RedemptionAlreadyUsed(String),

    #[error("兑换码已过期: {0}")]
    RedemptionExpired(String),

    #[error("积分不足: 需要 {required}, 可用 {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("兑换码生成多次冲突，已放弃")]
    CodeGenerationExhausted,

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 积分服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LoyaltyError>;

impl LoyaltyError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_)
                | Self::Serialization(_)
                | Self::Internal(_)
                | Self::CodeGenerationExhausted
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::RewardNotFound(_) => "REWARD_NOT_FOUND",
            Self::RewardUnavailable(_) => "REWARD_UNAVAILABLE",
            Self::RedemptionNotFound(_) => "REDEMPTION_NOT_FOUND",
            Self::CodeNotFound(_) => "CODE_NOT_FOUND",
            Self::RedemptionAlreadyUsed(_) => "REDEMPTION_ALREADY_USED",
            Self::RedemptionExpired(_) => "REDEMPTION_EXPIRED",
            Self::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            Self::CodeGenerationExhausted => "CODE_GENERATION_EXHAUSTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_business_error() {
        assert!(LoyaltyError::CustomerNotFound("zalo-123".into()).is_business_error());
        assert!(
            LoyaltyError::InsufficientPoints {
                required: 100,
                available: 50
            }
            .is_business_error()
        );
        assert!(!LoyaltyError::Internal("panic".to_string()).is_business_error());
        assert!(!LoyaltyError::CodeGenerationExhausted.is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            LoyaltyError::RewardNotFound(1).error_code(),
            "REWARD_NOT_FOUND"
        );
        assert_eq!(
            LoyaltyError::InsufficientPoints {
                required: 100,
                available: 50
            }
            .error_code(),
            "INSUFFICIENT_POINTS"
        );
        assert_eq!(
            LoyaltyError::RedemptionAlreadyUsed("ABC123".into()).error_code(),
            "REDEMPTION_ALREADY_USED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LoyaltyError::InsufficientPoints {
            required: 100,
            available: 50,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));

        let err = LoyaltyError::CodeNotFound("XYZ00000".into());
        assert!(err.to_string().contains("XYZ00000"));
    }
}
