//! flowcast-domain
//!
//! Pure domain models for the cash-flow forecast engine (ledger entries,
//! payment sources, recurring definitions, forecast events, risk reports)
//! plus the calendar primitives every schedule is built on.
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod forecast;
pub mod ledger;
pub mod recurring;
pub mod risk;
pub mod source;

pub use common::*;
pub use forecast::*;
pub use ledger::*;
pub use recurring::*;
pub use risk::*;
pub use source::*;
