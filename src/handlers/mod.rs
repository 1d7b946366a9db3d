pub mod admin;
pub mod calculate;
pub mod checkout;
pub mod health;
pub mod metrics_handler;
