//! Domain layer for the store admin dashboard.
//!
//! Holds the product draft and everything that mutates or translates it:
//! wire normalization, outbound form payloads, image staging, tab
//! selection, optimistic status toggling and submission checks. Nothing
//! in this crate talks to the network.

pub mod category;
pub mod draft;
pub mod error;
pub mod images;
pub mod listing;
pub mod messages;
pub mod normalize;
pub mod optimistic;
pub mod password;
pub mod payload;
pub mod routes;
pub mod settings;
pub mod submission;
pub mod tabs;
pub mod types;
mod wire;
