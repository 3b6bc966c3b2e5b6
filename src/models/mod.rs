pub mod config;
pub mod diagnostic;
pub mod module;
pub mod registry;
pub mod shape;
