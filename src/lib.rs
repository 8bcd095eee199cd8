//! Weekly timetable engine for class-sections.
//!
//! - [`solver::generate`] fills the master grid from a [`data::Snapshot`].
//! - [`checker::check`] validates any grid, generated or hand-edited.
//! - [`daily::clone_master`] seeds a date-scoped working copy.
//! - [`substitution::rank_substitutes`] orders stand-ins for a vacant period.
//! - [`daily`] and [`grid`] hold the in-place edits of daily copies and the
//!   master grid (absences, placements, resize, locks, removal).
//!
//! All engine calls are synchronous and touch nothing but their arguments.
//! [`server::router`] exposes each of them over HTTP.

pub mod checker;
pub mod config;
pub mod daily;
pub mod data;
pub mod error;
pub mod grid;
pub mod server;
pub mod solver;
pub mod substitution;
pub mod workload;

pub use error::{Error, Result};
