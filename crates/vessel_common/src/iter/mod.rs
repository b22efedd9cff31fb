//! Cursors: positions in a sequence, classified by what they can do.
//!
//! Algorithms are written against the cursor traits and pick the cheapest implementation the cursor's
//! [capability tag](category) allows, e.g. [`distance`] is constant time for random access cursors and counts steps otherwise.

pub mod category;
mod cursor;
mod slice;
mod reverse;
mod insert;

pub use category::*;
pub use cursor::*;
pub use slice::*;
pub use reverse::*;
pub use insert::*;
