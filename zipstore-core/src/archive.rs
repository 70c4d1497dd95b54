use alloc::vec;
use alloc::vec::Vec;

use bytemuck::PodCastError;

use crate::{
    CentralEntry, EndHeader, Error, LocalHeader, END_HEADER_SIZE, LOCAL_HEADER_SIZE,
};

/// Random access source of a finished archive.
///
/// Only archives without a trailing comment are located, which covers
/// everything the builder produces.
pub trait ArchiveSrc {
    type Err: From<Error>;

    /// Read up to `buf.len()` bytes at `offset`, returning the count read
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err>;

    /// Total length of the archive in bytes
    fn total_len(&mut self) -> Result<u64, Self::Err>;

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Err> {
        if self.read_at(offset, buf)? != buf.len() {
            return Err(Error::Cast(PodCastError::SizeMismatch).into());
        }
        Ok(())
    }

    fn end_header(&mut self) -> Result<EndHeader, Self::Err> {
        let start = self
            .total_len()?
            .checked_sub(END_HEADER_SIZE as u64)
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
        let mut data = [0; END_HEADER_SIZE];
        self.read_exact_at(start, &mut data)?;
        Ok(*EndHeader::from_bytes(&data)?)
    }

    /// Central directory records in directory order
    fn entries(&mut self) -> Result<Vec<CentralEntry>, Self::Err> {
        let end = self.end_header()?;
        let end_start = self
            .total_len()?
            .checked_sub(END_HEADER_SIZE as u64)
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
        let directory_end = u64::from(end.directory_offset())
            .checked_add(u64::from(end.directory_size()))
            .ok_or(Error::Overflow)?;
        // Directory must sit between the local records and the end record
        if directory_end > end_start {
            return Err(Error::InvalidData.into());
        }

        let size = usize::try_from(end.directory_size()).map_err(Error::TryFromInt)?;
        let mut data = vec![0; size];
        self.read_exact_at(u64::from(end.directory_offset()), &mut data)?;
        Ok(end.entries(&data)?)
    }

    /// Read the local header an entry points to and check that it agrees
    /// with the directory
    fn local_header(&mut self, entry: &CentralEntry) -> Result<LocalHeader, Self::Err> {
        let mut data = [0; LOCAL_HEADER_SIZE];
        self.read_exact_at(entry.offset(), &mut data)?;
        let header = *LocalHeader::from_bytes(&data)?;

        let mut name = vec![0; usize::from(header.name_len())];
        let name_offset = entry
            .offset()
            .checked_add(LOCAL_HEADER_SIZE as u64)
            .ok_or(Error::Overflow)?;
        self.read_exact_at(name_offset, &mut name)?;
        if name != entry.name_bytes() {
            return Err(Error::InvalidData.into());
        }
        if header.crc32() != entry.crc32() || u64::from(header.size()) != entry.size() {
            return Err(Error::InvalidData.into());
        }
        Ok(header)
    }

    /// Read from this src at a given entry's data with a given offset within
    /// that entry
    fn read_entry(
        &mut self,
        entry: &CentralEntry,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, Self::Err> {
        entry.check_supported()?;
        if offset >= entry.size() {
            return Ok(0);
        }

        let mut end = usize::try_from(entry.size() - offset).map_err(Error::TryFromInt)?;
        if end > buf.len() {
            end = buf.len();
        }

        let header = self.local_header(entry)?;
        let start = entry
            .offset()
            .checked_add(header.data_start())
            .and_then(|start| start.checked_add(offset))
            .ok_or(Error::Overflow)?;
        self.read_at(start, &mut buf[..end])
    }
}

impl<T: AsRef<[u8]>> ArchiveSrc for T {
    type Err = Error;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Error> {
        let data = self.as_ref();
        let start = usize::try_from(offset).map_err(Error::TryFromInt)?;
        if start >= data.len() {
            return Ok(0);
        }
        let end = start
            .checked_add(buf.len())
            .ok_or(Error::Overflow)?
            .min(data.len());
        let count = end - start;
        buf[..count].copy_from_slice(&data[start..end]);
        Ok(count)
    }

    fn total_len(&mut self) -> Result<u64, Error> {
        Ok(self.as_ref().len() as u64)
    }
}
