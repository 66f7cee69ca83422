//! Household dashboard: one month at a glance.

pub mod types;

pub use types::{CardBrief, DashboardInputs, EventBrief, HouseholdDashboard, SavingsBrief};
