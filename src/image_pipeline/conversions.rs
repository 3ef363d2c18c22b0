//! Pipeline conversions module
//!
//! Orchestrates decode, calibration, corner reprojection and MITIFF encoding.

mod avhrr_to_mitiff;


pub use avhrr_to_mitiff::AvhrrToMitiffPipeline;
