use alloc::vec;
use alloc::vec::Vec;

use crate::{
    crc32, ArchiveSrc, CentralHeader, DosDateTime, EndHeader, Error, LocalHeader, Method,
    CENTRAL_HEADER_SIZE, END_HEADER_SIZE, LOCAL_HEADER_SIZE,
};

pub const ARCHIVE_ENTRY1: &[u8] = b"some random string file contents\n";
pub const ARCHIVE_ENTRY1_NAME: &[u8] = b"photos/beach.png";

pub const ARCHIVE_ENTRY2: &[u8] = b"";
pub const ARCHIVE_ENTRY2_NAME: &[u8] = b"empty.webp";

/// Assemble a two entry archive directly from the record structs
pub fn archive() -> Vec<u8> {
    let datetime = DosDateTime::new(2021, 7, 4, 9, 30, 0);
    let mut local = vec![];
    let mut central = vec![];

    for (name, data) in [
        (ARCHIVE_ENTRY1_NAME, ARCHIVE_ENTRY1),
        (ARCHIVE_ENTRY2_NAME, ARCHIVE_ENTRY2),
    ] {
        let offset = local.len() as u32;
        let (name_len, size, crc) = (name.len() as u16, data.len() as u32, crc32(data));

        local.extend_from_slice(LocalHeader::stored(name_len, size, crc, datetime).as_bytes());
        local.extend_from_slice(name);
        local.extend_from_slice(data);

        central.extend_from_slice(
            CentralHeader::stored(name_len, size, crc, datetime, offset).as_bytes(),
        );
        central.extend_from_slice(name);
    }

    let end = EndHeader::new(2, central.len() as u32, local.len() as u32);
    let mut archive = local;
    archive.extend_from_slice(&central);
    archive.extend_from_slice(end.as_bytes());
    archive
}

#[test]
fn fixture_layout() {
    let archive = archive();
    let local_size = 2 * LOCAL_HEADER_SIZE
        + ARCHIVE_ENTRY1_NAME.len()
        + ARCHIVE_ENTRY1.len()
        + ARCHIVE_ENTRY2_NAME.len();
    let central_size =
        2 * CENTRAL_HEADER_SIZE + ARCHIVE_ENTRY1_NAME.len() + ARCHIVE_ENTRY2_NAME.len();
    assert_eq!(archive.len(), local_size + central_size + END_HEADER_SIZE);
}

#[test]
fn read_entries() -> Result<(), Error> {
    let mut archive = archive();
    let end = archive.end_header()?;
    assert_eq!(end.count(), 2);

    let entries = archive.entries()?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name_bytes(), ARCHIVE_ENTRY1_NAME);
    assert_eq!(entries[0].offset(), 0);
    assert_eq!(entries[0].size(), ARCHIVE_ENTRY1.len() as u64);
    assert_eq!(entries[0].method(), Method::Stored);
    assert_eq!(entries[0].datetime(), DosDateTime::new(2021, 7, 4, 9, 30, 0));
    assert_eq!(entries[1].name_bytes(), ARCHIVE_ENTRY2_NAME);
    assert_eq!(entries[1].crc32(), 0);
    assert_eq!(
        entries[1].offset(),
        (LOCAL_HEADER_SIZE + ARCHIVE_ENTRY1_NAME.len() + ARCHIVE_ENTRY1.len()) as u64
    );
    Ok(())
}

#[test]
fn read_entry_data() -> Result<(), Error> {
    let mut archive = archive();
    let entries = archive.entries()?;

    let mut buf = [0; 64];
    let count = archive.read_entry(&entries[0], 0, &mut buf)?;
    assert_eq!(&buf[..count], ARCHIVE_ENTRY1);

    let count = archive.read_entry(&entries[0], 5, &mut buf[..6])?;
    assert_eq!(&buf[..count], &ARCHIVE_ENTRY1[5..11]);

    assert_eq!(archive.read_entry(&entries[1], 0, &mut buf)?, 0);
    Ok(())
}

#[test]
fn empty_archive() -> Result<(), Error> {
    let mut archive = EndHeader::new(0, 0, 0).as_bytes().to_vec();
    assert!(archive.entries()?.is_empty());
    Ok(())
}

#[test]
fn directory_size_mismatch() {
    let mut archive = archive();
    // Claim one more directory byte than the records account for
    let end_start = archive.len() - END_HEADER_SIZE;
    archive[end_start + 12] += 1;
    assert!(matches!(archive.entries(), Err(Error::InvalidData)));
}

#[test]
fn directory_beyond_end() {
    let mut archive = EndHeader::new(0, u32::MAX, 0).as_bytes().to_vec();
    assert!(matches!(archive.entries(), Err(Error::InvalidData)));

    let mut archive = EndHeader::new(1, 100, 0).as_bytes().to_vec();
    assert!(matches!(archive.entries(), Err(Error::InvalidData)));

    let mut archive = EndHeader::new(0, 1, u32::MAX).as_bytes().to_vec();
    assert!(matches!(archive.entries(), Err(Error::InvalidData)));
}

#[test]
fn corrupt_local_name() -> Result<(), Error> {
    let mut archive = archive();
    let entries = archive.entries()?;
    archive[LOCAL_HEADER_SIZE] ^= 0xFF;

    let mut buf = [0; 8];
    assert!(matches!(
        archive.read_entry(&entries[0], 0, &mut buf),
        Err(Error::InvalidData)
    ));
    Ok(())
}

#[test]
fn rejects_other_methods() -> Result<(), Error> {
    let mut archive = archive();
    let entries = archive.entries()?;
    let mut header = *entries[0].header();
    header.method = 8u16.to_le();
    let deflated = crate::CentralEntry::new(header, entries[0].name_bytes().to_vec());

    let mut buf = [0; 8];
    assert!(matches!(
        archive.read_entry(&deflated, 0, &mut buf),
        Err(Error::NotSupported)
    ));
    Ok(())
}
