//! 查询服务
//!
//! 只读操作：余额、奖品目录、积分流水与通知列表。

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::error::{LoyaltyError, Result};
use crate::models::{Notification, PointTransaction};
use crate::repository::{
    CustomerRepository, LedgerRepository, NotificationRepository, RewardRepository,
};
use crate::service::clamp_limit;
use crate::service::dto::{BalanceDto, RewardDto};

/// 查询服务
pub struct QueryService {
    customer_repo: Arc<CustomerRepository>,
    reward_repo: Arc<RewardRepository>,
    ledger_repo: Arc<LedgerRepository>,
    notification_repo: Arc<NotificationRepository>,
}

impl QueryService {
    pub fn new(
        customer_repo: Arc<CustomerRepository>,
        reward_repo: Arc<RewardRepository>,
        ledger_repo: Arc<LedgerRepository>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            customer_repo,
            reward_repo,
            ledger_repo,
            notification_repo,
        }
    }

    /// 查询会员余额
    #[instrument(skip(self), fields(external_ref = %external_ref))]
    pub async fn get_balance(&self, external_ref: &str) -> Result<BalanceDto> {
        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        Ok(BalanceDto {
            customer_id: customer.id,
            external_ref: customer.external_ref,
            name: customer.name,
            points: customer.points,
            level: customer.level,
        })
    }

    /// 查询当前可见的奖品目录
    ///
    /// 指定会员时附带 `affordable` 标记（余额是否足够兑换）。
    #[instrument(skip(self))]
    pub async fn list_catalog(&self, external_ref: Option<&str>) -> Result<Vec<RewardDto>> {
        let balance = match external_ref {
            Some(ext) => {
                let customer = self
                    .customer_repo
                    .get_by_ref(ext)
                    .await?
                    .ok_or_else(|| LoyaltyError::CustomerNotFound(ext.to_string()))?;
                Some(customer.points)
            }
            None => None,
        };

        let rewards = self.reward_repo.list_active(Utc::now()).await?;

        Ok(rewards
            .into_iter()
            .map(|r| {
                let image = r.display_image();
                RewardDto {
                    id: r.id,
                    name: r.name,
                    description: r.description,
                    points_required: r.points_required,
                    quantity: r.quantity,
                    image,
                    affordable: balance.map(|b| b >= r.points_required),
                }
            })
            .collect())
    }

    /// 查询会员积分流水，按时间倒序
    #[instrument(skip(self), fields(external_ref = %external_ref))]
    pub async fn list_transactions(
        &self,
        external_ref: &str,
        limit: i64,
    ) -> Result<Vec<PointTransaction>> {
        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        self.ledger_repo
            .list_by_customer(customer.id, clamp_limit(limit))
            .await
    }

    /// 查询会员通知，按时间倒序
    #[instrument(skip(self), fields(external_ref = %external_ref))]
    pub async fn list_notifications(
        &self,
        external_ref: &str,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        self.notification_repo
            .list_by_customer(customer.id, clamp_limit(limit))
            .await
    }
}
