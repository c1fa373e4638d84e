#![doc(test(attr(deny(warnings))))]

//! Flowcast projects a household's cash balance forward from its ledger,
//! payment sources and recurring definitions, and ships a small CLI to
//! inspect the result.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Flowcast tracing initialized.");
    });
}
