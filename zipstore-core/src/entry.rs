use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;

use crate::{CentralHeader, DosDateTime, Error, GeneralFlags, Method};

/// A parsed central directory record with its name
#[derive(Clone, Debug)]
pub struct CentralEntry {
    header: CentralHeader,
    name: Vec<u8>,
}

impl Display for CentralEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "name={:?} crc={:08x} offset={} size={} time={}",
            String::from_utf8_lossy(self.name_bytes()),
            self.crc32(),
            self.offset(),
            self.size(),
            self.datetime(),
        )
    }
}

impl CentralEntry {
    pub fn new(header: CentralHeader, name: Vec<u8>) -> CentralEntry {
        CentralEntry { header, name }
    }

    pub fn header(&self) -> &CentralHeader {
        &self.header
    }

    /// Raw name bytes, exactly as stored
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    pub fn crc32(&self) -> u32 {
        self.header.crc32()
    }

    /// Offset of the local header from the start of the archive
    pub fn offset(&self) -> u64 {
        u64::from(self.header.local_offset())
    }

    /// Size of the entry data
    pub fn size(&self) -> u64 {
        u64::from(self.header.uncompressed_size())
    }

    pub fn datetime(&self) -> DosDateTime {
        self.header.datetime()
    }

    pub fn method(&self) -> Method {
        self.header.method()
    }

    pub fn flags(&self) -> GeneralFlags {
        self.header.flags()
    }

    /// Only plain stored entries can be read back
    pub fn check_supported(&self) -> Result<(), Error> {
        if self.flags().contains(GeneralFlags::ENCRYPTED) || self.method() != Method::Stored {
            return Err(Error::NotSupported);
        }
        if self.header.compressed_size() != self.header.uncompressed_size() {
            return Err(Error::InvalidData);
        }
        Ok(())
    }
}
