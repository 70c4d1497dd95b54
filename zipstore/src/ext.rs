//! Extension traits for base types defined in `zipstore-core`.
use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path};

use zipstore_core::{ArchiveSrc, CentralEntry, Crc32};

use crate::{wrap_io_err, Error, READ_WRITE_BUF_SIZE};

/// Copy `read` into `write` through `buf`, returning the byte count and the
/// CRC-32 of everything copied.
pub fn copy_and_crc<R: Read, W: Write>(
    mut read: R,
    mut write: W,
    buf: &mut [u8],
) -> io::Result<(u64, u32)> {
    let mut crc = Crc32::new();
    let mut total = 0;
    loop {
        let count = match read.read(buf) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        total += count as u64;
        write.write_all(&buf[..count])?;
        crc.update(&buf[..count]);
    }
    Ok((total, crc.finalize()))
}

pub trait CentralEntryExt {
    fn check_path(&self) -> Result<&Path, Error>;
}

impl CentralEntryExt for CentralEntry {
    /// Iterate the components of the name as a path and ensure that there
    /// are no non-normal components.
    fn check_path(&self) -> Result<&Path, Error> {
        let path = Path::new(OsStr::from_bytes(self.name_bytes()));
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                invalid => {
                    let bad_component: &Path = invalid.as_ref();
                    return Err(Error::InvalidPath {
                        entry: path.to_path_buf(),
                        component: bad_component.to_path_buf(),
                    });
                }
            }
        }
        Ok(path)
    }
}

pub trait ArchiveSrcExt: ArchiveSrc
where
    Error: From<Self::Err>,
{
    /// Stream an entry's data into `write`, checking its size and CRC-32
    /// against the central directory.
    fn copy_entry<W: Write>(
        &mut self,
        entry: &CentralEntry,
        mut write: W,
        buf: &mut [u8],
    ) -> Result<u64, Error> {
        let mut crc = Crc32::new();
        let mut total = 0;
        loop {
            let count = self.read_entry(entry, total, buf)?;
            if count == 0 {
                break;
            }
            write
                .write_all(&buf[..count])
                .map_err(wrap_io_err!("Write entry data"))?;
            crc.update(&buf[..count]);
            total += count as u64;
        }

        if total != entry.size() {
            return Err(Error::LengthMismatch {
                actual: total,
                expected: entry.size(),
            });
        }

        let actual = crc.finalize();
        if actual != entry.crc32() {
            return Err(zipstore_core::Error::InvalidCrc {
                expected: entry.crc32(),
                actual,
            }
            .into());
        }
        Ok(total)
    }

    /// Check the size and CRC-32 of every entry, returning the entries.
    fn verify(&mut self) -> Result<Vec<CentralEntry>, Error> {
        let entries = self.entries()?;
        let mut buf = vec![0; READ_WRITE_BUF_SIZE];
        for entry in entries.iter() {
            self.copy_entry(entry, io::sink(), &mut buf)
                .map_err(|err| Error::Entry {
                    name: entry.name_bytes().to_vec(),
                    source: Box::new(err),
                })?;
        }
        Ok(entries)
    }
}

impl<T> ArchiveSrcExt for T
where
    T: ArchiveSrc,
    Error: From<T::Err>,
{
}

#[cfg(test)]
mod tests {
    use zipstore_core::{crc32, CentralHeader, DosDateTime};

    use super::*;

    fn entry(name: &str) -> CentralEntry {
        let header = CentralHeader::stored(name.len() as u16, 0, 0, DosDateTime::MIN, 0);
        CentralEntry::new(header, name.as_bytes().to_vec())
    }

    #[test]
    fn copy_and_crc_small_buffer() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut out = Vec::new();
        let mut buf = [0; 7];
        let (count, crc) = copy_and_crc(&data[..], &mut out, &mut buf).unwrap();
        assert_eq!(count, data.len() as u64);
        assert_eq!(crc, crc32(data));
        assert_eq!(out, data);
    }

    #[test]
    fn relative_paths_pass() {
        let entry = entry("images/resized/cat.png");
        assert_eq!(
            entry.check_path().unwrap(),
            Path::new("images/resized/cat.png")
        );
    }

    #[test]
    fn parent_and_root_rejected() {
        assert!(matches!(
            entry("../cat.png").check_path(),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            entry("/etc/passwd").check_path(),
            Err(Error::InvalidPath { .. })
        ));
    }
}
