//! 兑换过期处理 Worker
//!
//! 定期扫描超时未核销的 PENDING 兑换，批量置为 EXPIRED。
//! 过期不退积分（发起阶段从未扣过），仅让兑换码失效。
//! 底层更新使用 `FOR UPDATE SKIP LOCKED`，多实例部署时不会重复处理。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use loyalty_core::RedemptionService;

/// 过期处理 Worker
///
/// 以固定间隔轮询数据库，处理超时的兑换记录。
pub struct ExpiryWorker {
    redemption_service: Arc<RedemptionService>,
    /// 轮询间隔
    poll_interval: Duration,
    /// 每批处理的最大记录数
    batch_size: i64,
}

impl ExpiryWorker {
    pub fn new(
        redemption_service: Arc<RedemptionService>,
        poll_interval_secs: u64,
        batch_size: i64,
    ) -> Self {
        Self {
            redemption_service,
            poll_interval: Duration::from_secs(poll_interval_secs),
            batch_size,
        }
    }

    /// 主循环：持续处理过期任务直到进程退出
    pub async fn run(&self) {
        info!(
            poll_interval = ?self.poll_interval,
            batch_size = self.batch_size,
            "ExpiryWorker 已启动"
        );

        loop {
            // 单批处理不完时立即继续下一批，直到本轮清空
            loop {
                match self.redemption_service.expire_stale(self.batch_size).await {
                    Ok(expired) if expired >= self.batch_size as u64 => continue,
                    Ok(_) => break,
                    Err(e) => {
                        error!(error = %e, "处理过期兑换出错");
                        break;
                    }
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loyalty_core::{CustomerRepository, RedemptionRepository, RewardRepository};
    use loyalty_core::service::RedemptionSettings;

    #[tokio::test]
    async fn test_expiry_worker_creation() {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let service = Arc::new(loyalty_core::RedemptionService::new(
            Arc::new(CustomerRepository::new(pool.clone())),
            Arc::new(RewardRepository::new(pool.clone())),
            Arc::new(RedemptionRepository::new(pool.clone())),
            pool,
            RedemptionSettings::default(),
        ));
        let worker = ExpiryWorker::new(service, 300, 1000);

        assert_eq!(worker.poll_interval.as_secs(), 300);
        assert_eq!(worker.batch_size, 1000);
    }
}
