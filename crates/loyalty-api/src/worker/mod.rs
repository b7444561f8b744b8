//! 后台任务

mod expiry_worker;

pub use expiry_worker::ExpiryWorker;
