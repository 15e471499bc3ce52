//! marketpulse — market index signal engine.
//!
//! Derives trend, channel, ratio, breadth, drawdown and relative-strength
//! signals from a date-indexed panel of index levels.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
