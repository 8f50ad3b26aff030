// src/types/mod.rs
//! Domain types: the animation request, frame rates and the frames themselves.

use thiserror::Error;

mod domain_types;
mod frames;
mod request;

pub use domain_types::*;
pub use frames::*;
pub use request::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Parameter '{name}' has no values")]
    NoParameterValues { name: String },

    #[error("Duplicate parameter value: {0}")]
    DuplicateValue(String),

    #[error("Frame rate must be positive, got {0}")]
    NonPositiveFrameRate(u32),
}
