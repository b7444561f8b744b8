//! 兑换服务
//!
//! 处理兑换的完整生命周期：
//! - 发起：前置校验 + 生成唯一兑换码 + 创建 PENDING 记录
//! - 核销：单事务内完成状态翻转、积分扣减、流水追加、库存扣减与通知
//! - 查询：按 ID 查状态、按会员查历史
//! - 过期：后台批量将超时 PENDING 记录置为 EXPIRED
//!
//! ## 并发约定
//!
//! 发起阶段的余额/库存检查只是预检，真正的闸门全部在核销事务内：
//! 状态翻转和余额扣减都是条件更新，靠受影响行数而不是先读后写判定，
//! 因此并发核销同一兑换码、并发花费同一余额都不会产生双重扣减。

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::code::{generate_code, normalize_code};
use crate::error::{LoyaltyError, Result};
use crate::models::{PointTransaction, Redemption, RedemptionStatus, TransactionType};
use crate::repository::{
    CustomerRepository, LedgerRepository, NotificationRepository, RedemptionRepository,
    RewardRepository,
};
use crate::service::clamp_limit;
use crate::service::dto::{ConfirmResponse, RedeemResponse, RedemptionDto};

/// 兑换服务配置
#[derive(Debug, Clone)]
pub struct RedemptionSettings {
    /// 兑换码冲突时的最大重试次数
    pub code_max_attempts: u32,
    /// PENDING 记录的存活时长（分钟），超过后可被过期
    pub pending_ttl_minutes: i64,
}

impl Default for RedemptionSettings {
    fn default() -> Self {
        Self {
            code_max_attempts: 5,
            pending_ttl_minutes: 24 * 60,
        }
    }
}

/// 兑换服务
pub struct RedemptionService {
    customer_repo: Arc<CustomerRepository>,
    reward_repo: Arc<RewardRepository>,
    redemption_repo: Arc<RedemptionRepository>,
    pool: PgPool,
    settings: RedemptionSettings,
}

impl RedemptionService {
    pub fn new(
        customer_repo: Arc<CustomerRepository>,
        reward_repo: Arc<RewardRepository>,
        redemption_repo: Arc<RedemptionRepository>,
        pool: PgPool,
        settings: RedemptionSettings,
    ) -> Self {
        Self {
            customer_repo,
            reward_repo,
            redemption_repo,
            pool,
            settings,
        }
    }

    /// 发起兑换
    ///
    /// 前置校验顺序：会员存在 → 奖品存在 → 奖品可兑换 → 余额足够。
    /// 校验通过后生成兑换码并创建 PENDING 记录，此阶段不扣任何积分。
    #[instrument(skip(self), fields(external_ref = %external_ref, reward_id = %reward_id))]
    pub async fn request_redemption(
        &self,
        external_ref: &str,
        reward_id: i64,
    ) -> Result<RedeemResponse> {
        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        let reward = self
            .reward_repo
            .get(reward_id)
            .await?
            .ok_or(LoyaltyError::RewardNotFound(reward_id))?;

        let now = Utc::now();
        if !reward.is_redeemable(now) {
            return Err(LoyaltyError::RewardUnavailable(reward_id));
        }

        // 预检余额，给用户及时反馈；真正的扣减闸门在核销事务内
        if !customer.can_afford(reward.points_required) {
            return Err(LoyaltyError::InsufficientPoints {
                required: reward.points_required,
                available: customer.points,
            });
        }

        let (redemption_id, code) = self
            .create_with_unique_code(customer.id, reward.id, reward.points_required)
            .await?;

        info!(
            customer_id = customer.id,
            reward_id = reward.id,
            redemption_id,
            code = %code,
            "兑换发起成功"
        );

        Ok(RedeemResponse {
            redemption_id,
            code,
            reward_name: reward.name,
            points_required: reward.points_required,
            status: RedemptionStatus::Pending,
        })
    }

    /// 核销兑换码
    ///
    /// 兑换码先归一化（去空白、转大写）再查找。结算在单个事务内完成：
    /// 1. 条件翻转 PENDING → COMPLETED（0 行即竞争失败，回滚）
    /// 2. 带下限扣减会员余额（余额不足即回滚）
    /// 3. 追加 REDEEM 流水（负数金额 + 扣减后余额）
    /// 4. 扣减奖品库存（到零为止，不报错）
    /// 5. 写入核销成功通知
    #[instrument(skip(self), fields(code = %raw_code))]
    pub async fn confirm(&self, raw_code: &str) -> Result<ConfirmResponse> {
        let code = normalize_code(raw_code);
        if code.is_empty() {
            return Err(LoyaltyError::Validation("兑换码不能为空".to_string()));
        }

        let redemption = self
            .redemption_repo
            .get_by_code(&code)
            .await?
            .ok_or_else(|| LoyaltyError::CodeNotFound(code.clone()))?;

        match redemption.status {
            RedemptionStatus::Pending => {}
            RedemptionStatus::Completed => {
                return Err(LoyaltyError::RedemptionAlreadyUsed(code));
            }
            RedemptionStatus::Expired => {
                return Err(LoyaltyError::RedemptionExpired(code));
            }
        }

        let reward = self
            .reward_repo
            .get(redemption.reward_id)
            .await?
            .ok_or(LoyaltyError::RewardNotFound(redemption.reward_id))?;

        let (balance_after, confirmed_at) = self.settle(&redemption, &reward.name).await?;

        info!(
            redemption_id = redemption.id,
            customer_id = redemption.customer_id,
            points_spent = redemption.points_spent,
            balance_after,
            "兑换码核销成功"
        );

        Ok(ConfirmResponse {
            redemption_id: redemption.id,
            code,
            reward_name: reward.name,
            points_spent: redemption.points_spent,
            balance_after,
            confirmed_at,
        })
    }

    /// 查询单条兑换状态
    #[instrument(skip(self))]
    pub async fn get_status(&self, redemption_id: i64) -> Result<RedemptionDto> {
        let redemption = self
            .redemption_repo
            .get(redemption_id)
            .await?
            .ok_or(LoyaltyError::RedemptionNotFound(redemption_id))?;

        let reward = self
            .reward_repo
            .get(redemption.reward_id)
            .await?
            .ok_or(LoyaltyError::RewardNotFound(redemption.reward_id))?;

        Ok(RedemptionDto {
            redemption_id: redemption.id,
            code: redemption.code,
            reward_id: reward.id,
            reward_name: reward.name.clone(),
            reward_image: reward.display_image(),
            points_spent: redemption.points_spent,
            status: redemption.status,
            confirmed_at: redemption.confirmed_at,
            created_at: redemption.created_at,
        })
    }

    /// 查询会员兑换历史，按发起时间倒序
    #[instrument(skip(self), fields(external_ref = %external_ref))]
    pub async fn get_history(
        &self,
        external_ref: &str,
        limit: i64,
    ) -> Result<Vec<RedemptionDto>> {
        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        let rows = self
            .redemption_repo
            .list_history_by_customer(customer.id, clamp_limit(limit))
            .await?;

        Ok(rows.into_iter().map(RedemptionDto::from).collect())
    }

    /// 批量过期超时的 PENDING 兑换，返回本次处理的记录数
    ///
    /// 后台 Worker 周期性调用。过期不退积分（发起阶段未扣过）。
    pub async fn expire_stale(&self, batch_size: i64) -> Result<u64> {
        let cutoff = Utc::now() - Duration::minutes(self.settings.pending_ttl_minutes);
        let expired = self.redemption_repo.expire_stale(cutoff, batch_size).await?;

        if expired > 0 {
            info!(expired, "过期超时兑换记录");
        }

        Ok(expired)
    }

    // ==================== 私有方法 ====================

    /// 生成唯一兑换码并创建 PENDING 记录
    ///
    /// 唯一性由数据库唯一约束保证；冲突时重新生成，
    /// 超过最大重试次数后放弃。
    async fn create_with_unique_code(
        &self,
        customer_id: i64,
        reward_id: i64,
        points_spent: i64,
    ) -> Result<(i64, String)> {
        for attempt in 1..=self.settings.code_max_attempts {
            let code = generate_code();

            match self
                .redemption_repo
                .insert_pending(customer_id, reward_id, points_spent, &code)
                .await?
            {
                Some(id) => return Ok((id, code)),
                None => {
                    warn!(attempt, code = %code, "兑换码冲突，重新生成");
                }
            }
        }

        Err(LoyaltyError::CodeGenerationExhausted)
    }

    /// 结算事务
    ///
    /// 四个效果在同一事务内，任何一步失败即整体回滚。
    async fn settle(
        &self,
        redemption: &Redemption,
        reward_name: &str,
    ) -> Result<(i64, chrono::DateTime<Utc>)> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        // 1. 条件状态翻转，并发核销时只有一个调用能走到这之后
        let flipped = RedemptionRepository::complete_pending_in_tx(&mut tx, redemption.id, now)
            .await?;
        if flipped == 0 {
            drop(tx);
            // 竞争失败：重新读取以给出准确的错误
            return Err(self.classify_lost_race(&redemption.code).await?);
        }

        // 2. 带下限扣减余额，不足则回滚
        let balance_after = match CustomerRepository::debit_points_in_tx(
            &mut tx,
            redemption.customer_id,
            redemption.points_spent,
        )
        .await?
        {
            Some(balance) => balance,
            None => {
                drop(tx);
                let available = self
                    .customer_repo
                    .get_points(redemption.customer_id)
                    .await?
                    .unwrap_or(0);
                return Err(LoyaltyError::InsufficientPoints {
                    required: redemption.points_spent,
                    available,
                });
            }
        };

        // 3. 追加流水
        let entry = PointTransaction {
            id: 0,
            customer_id: redemption.customer_id,
            amount: -redemption.points_spent,
            tx_type: TransactionType::Redeem,
            description: format!("兑换奖品: {reward_name}"),
            ref_code: Some(redemption.code.clone()),
            balance_after,
            created_at: now,
        };
        LedgerRepository::create_in_tx(&mut tx, &entry).await?;

        // 4. 扣减库存（不限量或已为零时不变动）
        RewardRepository::decrement_stock_in_tx(&mut tx, redemption.reward_id).await?;

        // 5. 写入通知
        NotificationRepository::create_in_tx(
            &mut tx,
            redemption.customer_id,
            "兑换成功",
            &format!(
                "您已成功兑换「{}」，消耗 {} 积分，当前余额 {} 积分",
                reward_name, redemption.points_spent, balance_after
            ),
        )
        .await?;

        tx.commit().await?;

        Ok((balance_after, now))
    }

    /// 状态翻转竞争失败后，按最新状态给出准确错误
    async fn classify_lost_race(&self, code: &str) -> Result<LoyaltyError> {
        let latest = self.redemption_repo.get_by_code(code).await?;

        Ok(match latest.map(|r| r.status) {
            Some(RedemptionStatus::Expired) => {
                LoyaltyError::RedemptionExpired(code.to_string())
            }
            // 并发核销的另一方已成功
            _ => LoyaltyError::RedemptionAlreadyUsed(code.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RedemptionSettings::default();
        assert_eq!(settings.code_max_attempts, 5);
        assert_eq!(settings.pending_ttl_minutes, 1440);
    }

    #[test]
    fn test_redeem_response_serialization() {
        let response = RedeemResponse {
            redemption_id: 42,
            code: "AB12CD34".to_string(),
            reward_name: "Cà phê miễn phí".to_string(),
            points_required: 100,
            status: RedemptionStatus::Pending,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["redemptionId"], 42);
        assert_eq!(json["code"], "AB12CD34");
        assert_eq!(json["pointsRequired"], 100);
        assert_eq!(json["status"], "PENDING");
    }

    #[test]
    fn test_confirm_response_serialization() {
        let response = ConfirmResponse {
            redemption_id: 42,
            code: "AB12CD34".to_string(),
            reward_name: "Trà sữa".to_string(),
            points_spent: 120,
            balance_after: 30,
            confirmed_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pointsSpent"], 120);
        assert_eq!(json["balanceAfter"], 30);
        assert!(json["confirmedAt"].is_string());
    }
}
