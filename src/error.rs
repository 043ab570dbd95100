//! Error types for the Astra viewport
//!
//! This module defines the error types used throughout the crate.
//! All operations are non-throwing in spirit: a failed query or mutation
//! leaves the viewport state unchanged.

use std::fmt;

/// Result type for Astra viewport operations
pub type AstraResult<T> = Result<T, AstraError>;

/// Astra viewport errors
#[derive(Debug, Clone, PartialEq)]
pub enum AstraError {
    /// Camera geometry is degenerate (zero-length or parallel direction/up)
    InvalidCamera,

    /// Frustum bounds violate `left < right`, `bottom < top` or `0 < near < far`
    InvalidFrustum,

    /// Screen port rectangle is degenerate (zero width or height)
    InvalidScreenPort,

    /// Malformed argument, rejected before any state change
    InvalidArgument(String),

    /// Mutation attempted on a locked camera field
    Locked(&'static str),
}

impl fmt::Display for AstraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstraError::InvalidCamera => write!(f, "Invalid camera: degenerate direction or up vector"),
            AstraError::InvalidFrustum => write!(f, "Invalid frustum: bounds violate left<right, bottom<top, 0<near<far"),
            AstraError::InvalidScreenPort => write!(f, "Invalid screen port: degenerate pixel rectangle"),
            AstraError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AstraError::Locked(field) => write!(f, "Camera field is locked: {}", field),
        }
    }
}

impl std::error::Error for AstraError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
