//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use loyalty_core::{
    CustomerRepository, LedgerRepository, NotificationRepository, PointsService, QueryService,
    RedemptionRepository, RedemptionService, RewardRepository,
    service::RedemptionSettings,
};

/// Axum 应用共享状态
///
/// 服务通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    pub redemption_service: Arc<RedemptionService>,
    pub points_service: Arc<PointsService>,
    pub query_service: Arc<QueryService>,
}

impl AppState {
    /// 组装仓储和服务，创建应用状态
    pub fn new(pool: PgPool, settings: RedemptionSettings) -> Self {
        let customer_repo = Arc::new(CustomerRepository::new(pool.clone()));
        let reward_repo = Arc::new(RewardRepository::new(pool.clone()));
        let redemption_repo = Arc::new(RedemptionRepository::new(pool.clone()));
        let ledger_repo = Arc::new(LedgerRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));

        let redemption_service = Arc::new(RedemptionService::new(
            customer_repo.clone(),
            reward_repo.clone(),
            redemption_repo,
            pool.clone(),
            settings,
        ));
        let points_service = Arc::new(PointsService::new(customer_repo.clone(), pool.clone()));
        let query_service = Arc::new(QueryService::new(
            customer_repo,
            reward_repo,
            ledger_repo,
            notification_repo,
        ));

        Self {
            pool,
            redemption_service,
            points_service,
            query_service,
        }
    }
}
