//! Core checking logic

pub mod actual;
pub mod checker;
pub mod comparator;
pub mod registry;

pub use actual::ActualShapeExtractor;
pub use checker::{CheckInput, CheckReport, Checker};
pub use comparator::{compare, Comparator};
