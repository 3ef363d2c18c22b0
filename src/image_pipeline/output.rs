//! Output image model and assembly
//!
//! An [`OutputImage`] is everything the MITIFF writer needs. Fields stay typed
//! here and are rendered to header text only by the writer.

pub mod assembler;
pub mod types;

pub use assembler::assemble;
pub use types::{CalibratedChannel, ChannelList, OutputImage};
