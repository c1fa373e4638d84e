//! flowcast-core
//!
//! Forecast services for the cash-flow engine.
//! Depends on flowcast-domain. No CLI, no terminal I/O, no direct storage interactions;
//! persistence is reached through the [`storage::SnapshotSource`] trait.

pub mod billing_service;
pub mod error;
pub mod forecast_service;
pub mod format;
pub mod loan_service;
pub mod recurrence_service;
pub mod risk_service;
pub mod storage;
pub mod time;
pub mod timeline_service;

pub use billing_service::*;
pub use error::CoreError;
pub use forecast_service::*;
pub use format::*;
pub use loan_service::*;
pub use recurrence_service::*;
pub use risk_service::*;
pub use storage::{ForecastSnapshot, SnapshotSource};
pub use time::{Clock, FixedClock};
pub use timeline_service::*;
