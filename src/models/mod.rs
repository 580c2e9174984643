//! Data models for the suggestion box.
//!
//! These models match the studio frontend interfaces exactly for seamless
//! interoperability.

mod suggestion;

pub use suggestion::*;
