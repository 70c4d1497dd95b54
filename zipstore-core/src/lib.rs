#![no_std]
extern crate alloc;

use core::mem;

pub use crate::archive::ArchiveSrc;
pub use crate::crc::{crc32, Crc32, CrcTable, CRC_TABLE};
pub use crate::datetime::DosDateTime;
pub use crate::entry::CentralEntry;
pub use crate::error::Error;
pub use crate::flags::{GeneralFlags, Method};
pub use crate::header::{
    CentralHeader, EndHeader, LocalHeader, CENTRAL_SIGNATURE, END_SIGNATURE, LOCAL_SIGNATURE,
};

mod archive;
mod crc;
mod datetime;
mod entry;
mod error;
mod flags;
mod header;
#[cfg(test)]
mod test;

pub const LOCAL_HEADER_SIZE: usize = mem::size_of::<LocalHeader>();
pub const CENTRAL_HEADER_SIZE: usize = mem::size_of::<CentralHeader>();
pub const END_HEADER_SIZE: usize = mem::size_of::<EndHeader>();

/// Format version written to both the "made by" and "needed to extract"
/// fields. 1.0 is enough for stored entries.
pub const VERSION: u16 = 10;

#[cfg(test)]
mod tests {
    use core::mem;

    use crate::{
        CentralHeader, EndHeader, LocalHeader, CENTRAL_HEADER_SIZE, END_HEADER_SIZE,
        LOCAL_HEADER_SIZE,
    };

    #[test]
    fn local_header_size() {
        assert_eq!(mem::size_of::<LocalHeader>(), 30);
        assert_eq!(LOCAL_HEADER_SIZE, 30);
    }

    #[test]
    fn central_header_size() {
        assert_eq!(mem::size_of::<CentralHeader>(), 46);
        assert_eq!(CENTRAL_HEADER_SIZE, 46);
    }

    #[test]
    fn end_header_size() {
        assert_eq!(mem::size_of::<EndHeader>(), 22);
        assert_eq!(END_HEADER_SIZE, 22);
    }
}
