//! 业务服务层

pub mod dto;
mod points_service;
mod query_service;
mod redemption_service;

pub use points_service::PointsService;
pub use query_service::QueryService;
pub use redemption_service::{RedemptionService, RedemptionSettings};

/// 分页上限，超过时静默截断
pub(crate) const MAX_PAGE_SIZE: i64 = 100;

pub(crate) fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(20), 20);
        assert_eq!(clamp_limit(10_000), MAX_PAGE_SIZE);
    }
}
