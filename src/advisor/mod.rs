//! Advisory client: shapes a bounded financial snapshot and exchanges it
//! with a remote text-generation service.

pub mod client;
pub mod context;

pub use client::{AdvisorClient, API_KEY_STORAGE_KEY};
pub use context::{
    AdvisoryContext, GoalSnapshot, TransactionSnapshot, MAX_RECENT_TRANSACTIONS, MAX_TOP_EXPENSES,
};
