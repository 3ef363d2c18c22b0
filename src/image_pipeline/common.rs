//! Shared error handling for the AVHRR to MITIFF pipeline.

pub mod error;

pub use error::{ConversionError, Result};
