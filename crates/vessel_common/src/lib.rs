//! Core building blocks: allocation policies, capability-tagged cursors and the [`DynArray`](collections::DynArray) container.

#[macro_use]
extern crate scopeguard;

pub mod alloc;
pub mod iter;
pub mod collections;

pub mod prelude;
