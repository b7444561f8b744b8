//! 积分服务
//!
//! 处理积分的获得入账。扣减只发生在兑换结算里，不在这里。

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::error::{LoyaltyError, Result};
use crate::models::{PointTransaction, TransactionType};
use crate::repository::{CustomerRepository, LedgerRepository};
use crate::service::dto::EarnResponse;

/// 积分服务
pub struct PointsService {
    customer_repo: Arc<CustomerRepository>,
    pool: PgPool,
}

impl PointsService {
    pub fn new(customer_repo: Arc<CustomerRepository>, pool: PgPool) -> Self {
        Self {
            customer_repo,
            pool,
        }
    }

    /// 积分入账
    ///
    /// 余额增加与 EARN 流水在同一事务内写入，保持账本不变量。
    #[instrument(skip(self), fields(external_ref = %external_ref, amount = %amount))]
    pub async fn earn(
        &self,
        external_ref: &str,
        amount: i64,
        description: Option<&str>,
    ) -> Result<EarnResponse> {
        if amount <= 0 {
            return Err(LoyaltyError::Validation(
                "入账积分必须为正数".to_string(),
            ));
        }

        let customer = self
            .customer_repo
            .get_by_ref(external_ref)
            .await?
            .ok_or_else(|| LoyaltyError::CustomerNotFound(external_ref.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let balance_after =
            CustomerRepository::credit_points_in_tx(&mut tx, customer.id, amount).await?;

        let entry = PointTransaction {
            id: 0,
            customer_id: customer.id,
            amount,
            tx_type: TransactionType::Earn,
            description: description.unwrap_or("积分获得").to_string(),
            ref_code: None,
            balance_after,
            created_at: now,
        };
        let transaction_id = LedgerRepository::create_in_tx(&mut tx, &entry).await?;

        tx.commit().await?;

        info!(
            customer_id = customer.id,
            amount, balance_after, "积分入账成功"
        );

        Ok(EarnResponse {
            transaction_id,
            customer_id: customer.id,
            amount,
            balance_after,
        })
    }
}
