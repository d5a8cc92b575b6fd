//! `ev-fleet` — vehicles and how a fleet is put on the road.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`kind`]       | `VehicleKind` (five fixed kinds), `VehicleSpec`, `VehicleFactory` |
//! | [`vehicle`]    | `Vehicle` run/charge state machine, `VehiclePhase`            |
//! | [`deployment`] | `Deployment` trait, `RandomDeployment`, `FixedDeployment`     |
//!
//! # Vehicle cycle
//!
//! ```text
//!   Running ──(running ≥ drive duration)──► NeedsCharge
//!      ▲                                        │ station acquired
//!      └──(charging ≥ charge duration)── Charging ◄┘
//! ```
//!
//! A vehicle only ever moves through this cycle in one direction, one
//! pipeline stage at a time.  The stages in `ev-sim` call the step functions
//! and predicates; this crate holds no threads and no locks.

pub mod deployment;
pub mod kind;
pub mod vehicle;


pub use deployment::{Deployment, FixedDeployment, RandomDeployment};
pub use kind::{VehicleFactory, VehicleKind, VehicleSpec};
pub use vehicle::{Vehicle, VehiclePhase};
