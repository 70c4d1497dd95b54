//! The packed structs represent the on-disk format of a stored ZIP archive.
//!
//! Multi-byte fields hold little-endian values; use the constructors and
//! accessors rather than the raw fields so the byte image does not depend on
//! the host.

use alloc::vec::Vec;

use bytemuck::{Pod, PodCastError, Zeroable};

use crate::{
    CentralEntry, DosDateTime, Error, GeneralFlags, Method, CENTRAL_HEADER_SIZE,
    END_HEADER_SIZE, LOCAL_HEADER_SIZE, VERSION,
};

pub const LOCAL_SIGNATURE: u32 = 0x0403_4B50;
pub const CENTRAL_SIGNATURE: u32 = 0x0201_4B50;
pub const END_SIGNATURE: u32 = 0x0605_4B50;

fn check_signature(expected: u32, raw: u32) -> Result<(), Error> {
    let actual = u32::from_le(raw);
    if actual != expected {
        return Err(Error::InvalidSignature { expected, actual });
    }
    Ok(())
}

fn cast<T: Pod>(data: &[u8], size: usize) -> Result<&T, Error> {
    let data = data
        .get(..size)
        .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
    Ok(bytemuck::try_from_bytes(data)?)
}

/// Header in front of every entry's name and data
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C, packed)]
pub struct LocalHeader {
    pub signature: u32,
    /// Minimum format version needed to extract
    pub version_needed: u16,
    pub flags: u16,
    /// Compression method, zero for stored data
    pub method: u16,
    pub time: u16,
    pub date: u16,
    /// CRC-32 of the entry data
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    /// Length of the name that immediately follows this header
    pub name_len: u16,
    /// Length of the extra field after the name
    pub extra_len: u16,
}

impl LocalHeader {
    /// Header for a stored entry: sizes are equal, no flags, no extra field
    pub fn stored(name_len: u16, size: u32, crc32: u32, datetime: DosDateTime) -> LocalHeader {
        LocalHeader {
            signature: LOCAL_SIGNATURE.to_le(),
            version_needed: VERSION.to_le(),
            flags: GeneralFlags::empty().bits().to_le(),
            method: u16::from(Method::Stored).to_le(),
            time: datetime.time.to_le(),
            date: datetime.date.to_le(),
            crc32: crc32.to_le(),
            compressed_size: size.to_le(),
            uncompressed_size: size.to_le(),
            name_len: name_len.to_le(),
            extra_len: 0,
        }
    }

    /// Parse header from raw data, checking the signature
    pub fn from_bytes(data: &[u8]) -> Result<&LocalHeader, Error> {
        let header: &LocalHeader = cast(data, LOCAL_HEADER_SIZE)?;
        check_signature(LOCAL_SIGNATURE, header.signature)?;
        Ok(header)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn flags(&self) -> GeneralFlags {
        GeneralFlags::from_bits_retain(u16::from_le(self.flags))
    }

    pub fn method(&self) -> Method {
        Method::from(u16::from_le(self.method))
    }

    pub fn crc32(&self) -> u32 {
        u32::from_le(self.crc32)
    }

    pub fn size(&self) -> u32 {
        u32::from_le(self.uncompressed_size)
    }

    pub fn name_len(&self) -> u16 {
        u16::from_le(self.name_len)
    }

    pub fn extra_len(&self) -> u16 {
        u16::from_le(self.extra_len)
    }

    /// Bytes between the start of this header and the entry data
    pub fn data_start(&self) -> u64 {
        LOCAL_HEADER_SIZE as u64 + u64::from(self.name_len()) + u64::from(self.extra_len())
    }
}

/// One central directory record per entry, pointing back at its local header
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C, packed)]
pub struct CentralHeader {
    pub signature: u32,
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub time: u16,
    pub date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_len: u16,
    pub extra_len: u16,
    pub comment_len: u16,
    /// Disk on which the entry starts
    pub disk_start: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    /// Offset of the local header from the start of the archive
    pub local_offset: u32,
}

impl CentralHeader {
    pub fn stored(
        name_len: u16,
        size: u32,
        crc32: u32,
        datetime: DosDateTime,
        local_offset: u32,
    ) -> CentralHeader {
        CentralHeader {
            signature: CENTRAL_SIGNATURE.to_le(),
            version_made_by: VERSION.to_le(),
            version_needed: VERSION.to_le(),
            flags: GeneralFlags::empty().bits().to_le(),
            method: u16::from(Method::Stored).to_le(),
            time: datetime.time.to_le(),
            date: datetime.date.to_le(),
            crc32: crc32.to_le(),
            compressed_size: size.to_le(),
            uncompressed_size: size.to_le(),
            name_len: name_len.to_le(),
            extra_len: 0,
            comment_len: 0,
            disk_start: 0,
            internal_attrs: 0,
            external_attrs: 0,
            local_offset: local_offset.to_le(),
        }
    }

    /// Parse header from raw data, checking the signature
    pub fn from_bytes(data: &[u8]) -> Result<&CentralHeader, Error> {
        let header: &CentralHeader = cast(data, CENTRAL_HEADER_SIZE)?;
        check_signature(CENTRAL_SIGNATURE, header.signature)?;
        Ok(header)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn flags(&self) -> GeneralFlags {
        GeneralFlags::from_bits_retain(u16::from_le(self.flags))
    }

    pub fn method(&self) -> Method {
        Method::from(u16::from_le(self.method))
    }

    pub fn datetime(&self) -> DosDateTime {
        DosDateTime {
            time: u16::from_le(self.time),
            date: u16::from_le(self.date),
        }
    }

    pub fn crc32(&self) -> u32 {
        u32::from_le(self.crc32)
    }

    pub fn compressed_size(&self) -> u32 {
        u32::from_le(self.compressed_size)
    }

    pub fn uncompressed_size(&self) -> u32 {
        u32::from_le(self.uncompressed_size)
    }

    pub fn name_len(&self) -> u16 {
        u16::from_le(self.name_len)
    }

    /// Size of the whole record: header, name, extra field and comment
    pub fn record_size(&self) -> usize {
        CENTRAL_HEADER_SIZE
            + usize::from(self.name_len())
            + usize::from(u16::from_le(self.extra_len))
            + usize::from(u16::from_le(self.comment_len))
    }

    pub fn local_offset(&self) -> u32 {
        u32::from_le(self.local_offset)
    }
}

/// Trailer locating the central directory
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C, packed)]
pub struct EndHeader {
    pub signature: u32,
    pub disk: u16,
    /// Disk on which the central directory starts
    pub directory_disk: u16,
    /// Count of central directory records on this disk
    pub disk_entries: u16,
    pub total_entries: u16,
    /// Size in bytes of all central directory records
    pub directory_size: u32,
    /// Offset of the first central directory record
    pub directory_offset: u32,
    pub comment_len: u16,
}

impl EndHeader {
    pub fn new(count: u16, directory_size: u32, directory_offset: u32) -> EndHeader {
        EndHeader {
            signature: END_SIGNATURE.to_le(),
            disk: 0,
            directory_disk: 0,
            disk_entries: count.to_le(),
            total_entries: count.to_le(),
            directory_size: directory_size.to_le(),
            directory_offset: directory_offset.to_le(),
            comment_len: 0,
        }
    }

    /// Parse header from raw data, checking the signature
    pub fn from_bytes(data: &[u8]) -> Result<&EndHeader, Error> {
        let header: &EndHeader = cast(data, END_HEADER_SIZE)?;
        check_signature(END_SIGNATURE, header.signature)?;
        Ok(header)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn count(&self) -> u16 {
        u16::from_le(self.total_entries)
    }

    pub fn directory_size(&self) -> u32 {
        u32::from_le(self.directory_size)
    }

    pub fn directory_offset(&self) -> u32 {
        u32::from_le(self.directory_offset)
    }

    /// Parse the central directory described by this header. `data` must be
    /// exactly `directory_size` bytes.
    pub fn entries(&self, data: &[u8]) -> Result<Vec<CentralEntry>, Error> {
        if u16::from_le(self.disk_entries) != self.count() {
            return Err(Error::NotSupported);
        }

        let mut entries = Vec::with_capacity(usize::from(self.count()));
        let mut pos = 0usize;
        for _ in 0..self.count() {
            let record = data
                .get(pos..)
                .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
            let header = *CentralHeader::from_bytes(record)?;
            let name_end = CENTRAL_HEADER_SIZE + usize::from(header.name_len());
            let name = record
                .get(CENTRAL_HEADER_SIZE..name_end)
                .ok_or(Error::Cast(PodCastError::SizeMismatch))?;
            entries.push(CentralEntry::new(header, name.to_vec()));
            pos = pos
                .checked_add(header.record_size())
                .ok_or(Error::Overflow)?;
        }

        if pos != data.len() {
            return Err(Error::InvalidData);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_header_layout() {
        let dt = DosDateTime {
            time: 0x6BAF,
            date: 0x586F,
        };
        let header = LocalHeader::stored(5, 0x0102_0304, 0xDEAD_BEEF, dt);
        assert_eq!(
            header.as_bytes(),
            &[
                0x50, 0x4B, 0x03, 0x04, // signature
                10, 0, // version needed
                0, 0, // flags
                0, 0, // method
                0xAF, 0x6B, // time
                0x6F, 0x58, // date
                0xEF, 0xBE, 0xAD, 0xDE, // crc
                0x04, 0x03, 0x02, 0x01, // compressed
                0x04, 0x03, 0x02, 0x01, // uncompressed
                5, 0, // name length
                0, 0, // extra length
            ][..]
        );
    }

    #[test]
    fn central_header_layout() {
        let header = CentralHeader::stored(3, 7, 0x1122_3344, DosDateTime::MIN, 0x99);
        let bytes = header.as_bytes();
        assert_eq!(&bytes[..4], b"PK\x01\x02");
        assert_eq!(&bytes[4..8], &[10, 0, 10, 0]);
        assert_eq!(&bytes[16..20], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[20..28], &[7, 0, 0, 0, 7, 0, 0, 0]);
        assert_eq!(&bytes[28..30], &[3, 0]);
        assert_eq!(&bytes[30..42], &[0; 12]);
        assert_eq!(&bytes[42..46], &[0x99, 0, 0, 0]);
    }

    #[test]
    fn end_header_layout() {
        let header = EndHeader::new(2, 100, 200);
        assert_eq!(
            header.as_bytes(),
            &[
                0x50, 0x4B, 0x05, 0x06, 0, 0, 0, 0, 2, 0, 2, 0, 100, 0, 0, 0, 200, 0, 0, 0, 0, 0
            ][..]
        );
    }

    #[test]
    fn rejects_wrong_signature() {
        let header = EndHeader::new(0, 0, 0);
        let bytes = header.as_bytes();
        match LocalHeader::from_bytes(&[bytes, &[0; 8][..]].concat()) {
            Err(Error::InvalidSignature { expected, actual }) => {
                assert_eq!(expected, LOCAL_SIGNATURE);
                assert_eq!(actual, END_SIGNATURE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_short_data() {
        assert!(matches!(
            EndHeader::from_bytes(&[0x50, 0x4B, 0x05, 0x06]),
            Err(Error::Cast(PodCastError::SizeMismatch))
        ));
    }
}
