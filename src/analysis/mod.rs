//! Swipe path analysis

pub mod simplify;

pub use simplify::{rho, PathSimplifier};
