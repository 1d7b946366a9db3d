pub mod engine;
pub mod models;
pub mod recommendations;
pub mod validator;

pub use engine::{calculate, calculate_at};
pub use models::{
    ComputationError, Computed, ContractLength, PricingInput, PricingReport, PricingTier,
    SupportTier,
};
pub use validator::{validate, ValidationError, ValidationReason};
