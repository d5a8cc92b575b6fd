//! `ev-core` — foundational types for the EV fleet charging simulation.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and minimal external ones (`rand`, `thiserror`, `tracing`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`                                           |
//! | [`time`]        | `Tick`, `TickClock`                                   |
//! | [`config`]      | `SimConfig`, positional argument parsing              |
//! | [`rng`]         | `SimRng` (deployment draws)                           |
//! | [`error`]       | `EvError`, `EvResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{EvError, EvResult};
pub use ids::VehicleId;
pub use rng::SimRng;
pub use time::{Tick, TickClock};
