//! Data models for the profile form.
//!
//! The wire records match the answers API's JSON contract; the domain records are what the
//! store and the views work with.

mod answers;
mod checkbox;
mod wire;

pub use answers::*;
pub use checkbox::*;
pub use wire::*;
