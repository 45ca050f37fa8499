//! Identifier newtypes.

pub mod identifiers;
