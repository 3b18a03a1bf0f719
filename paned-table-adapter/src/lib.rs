//! Adapter utilities for the `paned-table` crate.
//!
//! The `paned-table` crate is UI-agnostic and only coordinates state between panes. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A fixed-row-height windowing primitive (visible and overscanned row ranges)
//! - A controller routing scroll gestures and rendered-row reports through a table
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod window;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use window::FixedRowWindow;
