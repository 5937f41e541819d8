//! Level generation pipeline: progression curve, overlap guard, catalog and per-segment placement.
pub mod catalog;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod plan;
pub mod progression;
pub mod segment;
