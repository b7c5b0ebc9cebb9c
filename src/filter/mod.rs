//! Product List Filter
//!
//! Case-insensitive substring filtering over a fixed list of item texts, as
//! driven by the storefront's search box. The pure [`filter`] function does
//! the work; [`ListFilter`] keeps the input value and the last result the
//! way the page does between keystrokes.

pub mod list;

pub use list::{filter, Display, ListFilter, VisibilitySet};
