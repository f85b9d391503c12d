// src/services/mod.rs
pub mod client;
pub mod documents;
pub mod payload;
pub mod presenter;
pub mod suggestion;
pub mod validation;
pub mod workflow;
