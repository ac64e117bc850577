//! # kelp-sim — in-memory ledger and session driver.
//!
//! The simulation half of the engine:
//!
//! - [`ledger`] — the coin-set ledger behind the
//!   [`LedgerService`](kelp_core::traits::LedgerService) boundary
//! - [`session`] — the single driver owning the ledger and every actor
//! - [`config`] — simulator parameters
//! - [`error`] — `SessionError`
//!
//! One session, one logical thread: operations run strictly between the
//! session's post-step refreshes, and no two transactions are ever in
//! flight at once.

pub mod config;
pub mod error;
pub mod ledger;
pub mod session;

pub use config::SimConfig;
pub use error::SessionError;
pub use ledger::{CoinRecord, Ledger};
pub use session::{ActorId, PushResult, Session, SpendConfig, SpendTarget};
