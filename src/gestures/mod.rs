//! Named gesture collections and persistence

pub mod set;

pub use set::{GestureSet, GestureSetMetadata};
