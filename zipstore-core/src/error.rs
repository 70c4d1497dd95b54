use alloc::format;
use alloc::string::ToString;
use core::error;
use core::fmt::{Display, Formatter, Result};

use bytemuck::PodCastError;

#[derive(Debug)]
pub enum Error {
    Cast(PodCastError),
    InvalidCrc { expected: u32, actual: u32 },
    InvalidData,
    InvalidSignature { expected: u32, actual: u32 },
    NotSupported,
    Overflow,
    TryFromInt(core::num::TryFromIntError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            Cast(err) => format!("Bytemuck: {:?}", err),
            InvalidCrc { expected, actual } => {
                format!("Invalid CRC-32: expected {:08x}, got {:08x}", expected, actual)
            }
            InvalidData => "Data Invalid".to_string(),
            InvalidSignature { expected, actual } => {
                format!("Invalid Signature: expected {:08x}, got {:08x}", expected, actual)
            }
            NotSupported => "Not Supported".to_string(),
            Overflow => "Overflow".to_string(),
            TryFromInt(err) => format!("TryFromInt: {}", err),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::TryFromInt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PodCastError> for Error {
    fn from(err: PodCastError) -> Error {
        Error::Cast(err)
    }
}

impl From<core::num::TryFromIntError> for Error {
    fn from(err: core::num::TryFromIntError) -> Error {
        Error::TryFromInt(err)
    }
}
