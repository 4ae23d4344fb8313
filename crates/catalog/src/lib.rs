//! Catalog domain module: loanable items and rooms.
//!
//! This crate contains the durable asset records and their invariants,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod item;
pub mod room;

pub use item::{Item, ItemStatus};
pub use room::{Room, RoomStatus};
