use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Failed to decode AVHRR image: {0}")]
    DecodeError(String),
    
    #[error("Failed to encode MITIFF image: {0}")]
    EncodeError(String),
    
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),
    
    #[error("Unsupported channel id: {0}")]
    UnsupportedChannel(u8),
    
    #[error("Could not allocate output buffer: {0}")]
    ResourceError(String),
    
    #[error("Malformed image structure: {0}")]
    StructuralError(String),
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    /// Process exit status reported by the command-line tool for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConversionError::InputReadError(_) | ConversionError::DecodeError(_) => 10,
            ConversionError::ResourceError(_) => 3,
            ConversionError::OutputWriteError(_)
            | ConversionError::EncodeError(_)
            | ConversionError::IoError(_) => 4,
            ConversionError::InvalidDimensions(_, _)
            | ConversionError::UnsupportedChannel(_)
            | ConversionError::StructuralError(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_decode_and_resource_failures() {
        assert_eq!(ConversionError::DecodeError("bad".into()).exit_code(), 10);
        assert_eq!(ConversionError::InputReadError("gone".into()).exit_code(), 10);
        assert_eq!(ConversionError::ResourceError("oom".into()).exit_code(), 3);
        assert_eq!(ConversionError::UnsupportedChannel(7).exit_code(), 1);
        assert_eq!(ConversionError::EncodeError("tiff".into()).exit_code(), 4);
    }

    #[test]
    fn unsupported_channel_message_names_the_id() {
        let err = ConversionError::UnsupportedChannel(9);
        assert_eq!(err.to_string(), "Unsupported channel id: 9");
    }
}
