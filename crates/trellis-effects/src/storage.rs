//! Storage Effect Handlers

pub mod memory;
