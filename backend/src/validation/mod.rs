//! Reusable validation rules applied to request payloads before any
//! persistence or token work happens.

pub mod rules;

pub use validator::Validate;
