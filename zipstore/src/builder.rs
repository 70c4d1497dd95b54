use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bytemuck::Zeroable;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use log::{debug, info, warn};
use zipstore_core::{CentralHeader, DosDateTime, EndHeader, LocalHeader, LOCAL_HEADER_SIZE};

use crate::ext::copy_and_crc;
use crate::{wrap_io_err, Error, READ_WRITE_BUF_SIZE};

type CoreError = zipstore_core::Error;

enum EntrySource {
    /// Content already in memory
    Bytes(Vec<u8>),

    Reader(Box<dyn Read + Send>),

    /// File read when the archive is built
    File(PathBuf),
}

impl fmt::Debug for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EntrySource::*;
        match self {
            Bytes(b) => write!(f, "EntrySource::Bytes({} bytes)", b.len()),
            Reader(_) => write!(f, "EntrySource::Reader(_)"),
            File(p) => write!(f, "EntrySource::File({:?})", p),
        }
    }
}

impl EntrySource {
    /// Materialize the content into `out`, returning its size and CRC-32
    fn copy_to(self, out: &mut Vec<u8>, buf: &mut [u8]) -> Result<(u64, u32), Error> {
        match self {
            EntrySource::Bytes(bytes) => {
                copy_and_crc(&bytes[..], out, buf).map_err(wrap_io_err!("Read entry content"))
            }
            EntrySource::Reader(reader) => {
                copy_and_crc(reader, out, buf).map_err(wrap_io_err!("Read entry content"))
            }
            EntrySource::File(path) => {
                let file = File::open(&path).map_err(wrap_io_err!(path, "Open entry content"))?;
                copy_and_crc(file, out, buf).map_err(wrap_io_err!(path, "Read entry content"))
            }
        }
    }
}

#[derive(Debug)]
struct BuilderEntry {
    /// Stored verbatim in both the local and central records
    name: Vec<u8>,
    source: EntrySource,
    timestamp: NaiveDateTime,
}

fn dos_datetime(timestamp: &NaiveDateTime) -> DosDateTime {
    DosDateTime::new(
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
    )
}

fn fit<T: TryFrom<u64>>(value: impl Into<u64>) -> Result<T, CoreError> {
    T::try_from(value.into()).map_err(|_| CoreError::Overflow)
}

/// Names that appear more than once, each reported at its second occurrence
fn duplicate_names(entries: &[BuilderEntry]) -> Vec<&[u8]> {
    let mut seen = HashMap::with_capacity(entries.len());
    let mut duplicates = Vec::new();
    for entry in entries {
        let count = seen.entry(entry.name.as_slice()).or_insert(0usize);
        *count += 1;
        if *count == 2 {
            duplicates.push(entry.name.as_slice());
        }
    }
    duplicates
}

/// Builder pattern for stored ZIP archives. Entries are appended in order
/// and the builder is consumed by [`ArchiveBuilder::build`], which returns the
/// finished archive as one buffer.
///
/// Names are taken as raw bytes and never validated; adding the same name
/// twice produces two directory records. Every `add*` method returns
/// `&mut self` for chaining.
///
/// # Example
/// ```
/// use zipstore::ArchiveBuilder;
/// use zipstore_core::ArchiveSrc;
///
/// let mut builder = ArchiveBuilder::new();
/// builder
///     .add("beach.png", &b"converted png bytes"[..])
///     .add_reader("forest.webp", &b"converted webp bytes"[..]);
///
/// let archive = builder.build().unwrap();
/// #
/// # let mut src = archive.as_slice();
/// # let entries = src.entries().unwrap();
/// # assert_eq!(entries.len(), 2);
/// # assert_eq!(entries[1].name_bytes(), b"forest.webp");
/// ```
#[derive(Default)]
pub struct ArchiveBuilder {
    entries: Vec<BuilderEntry>,
}

impl ArchiveBuilder {
    pub fn new() -> ArchiveBuilder {
        ArchiveBuilder {
            entries: Vec::new(),
        }
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: &[u8], source: EntrySource, timestamp: NaiveDateTime) -> &mut Self {
        self.entries.push(BuilderEntry {
            name: name.to_vec(),
            source,
            timestamp,
        });
        self
    }

    /// Add an in-memory entry stamped with the current local time.
    pub fn add(&mut self, name: impl AsRef<[u8]>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.add_at(name, content, Local::now().naive_local())
    }

    /// Add an in-memory entry with an explicit local timestamp.
    pub fn add_at(
        &mut self,
        name: impl AsRef<[u8]>,
        content: impl Into<Vec<u8>>,
        timestamp: NaiveDateTime,
    ) -> &mut Self {
        self.push(name.as_ref(), EntrySource::Bytes(content.into()), timestamp)
    }

    /// Add an entry whose content is read from `source` during
    /// [`ArchiveBuilder::build`].
    pub fn add_reader(
        &mut self,
        name: impl AsRef<[u8]>,
        source: impl Read + Send + 'static,
    ) -> &mut Self {
        self.push(
            name.as_ref(),
            EntrySource::Reader(Box::new(source)),
            Local::now().naive_local(),
        )
    }

    /// Add an entry whose content is the file at `path`, opened during
    /// [`ArchiveBuilder::build`].
    pub fn add_file(&mut self, name: impl AsRef<[u8]>, path: impl AsRef<Path>) -> &mut Self {
        self.push(
            name.as_ref(),
            EntrySource::File(path.as_ref().to_path_buf()),
            Local::now().naive_local(),
        )
    }

    /// Consume this builder and produce the archive: every local record in
    /// insertion order, then the central directory in the same order, then
    /// the end record.
    ///
    /// If any entry's content cannot be read the whole build fails with
    /// [`Error::Entry`] and nothing is returned.
    pub fn build(self) -> Result<Vec<u8>, Error> {
        let count: u16 = fit(self.entries.len() as u64)?;
        for name in duplicate_names(&self.entries) {
            warn!(
                "Duplicate entry name {:?}, writing every copy",
                String::from_utf8_lossy(name)
            );
        }
        let mut archive = Vec::new();
        let mut directory = Vec::new();
        let mut buf = vec![0; READ_WRITE_BUF_SIZE];

        for BuilderEntry {
            name,
            source,
            timestamp,
        } in self.entries
        {
            let offset = archive.len();
            let local_offset: u32 = fit(offset as u64)?;
            let name_len: u16 = fit(name.len() as u64)?;
            let datetime = dos_datetime(&timestamp);

            // Header is written once the size and CRC are known
            archive.extend_from_slice(LocalHeader::zeroed().as_bytes());
            archive.extend_from_slice(&name);
            let (size, crc) = source
                .copy_to(&mut archive, &mut buf)
                .map_err(|err| Error::Entry {
                    name: name.clone(),
                    source: Box::new(err),
                })?;
            let size: u32 = fit(size)?;

            let header = LocalHeader::stored(name_len, size, crc, datetime);
            archive[offset..offset + LOCAL_HEADER_SIZE].copy_from_slice(header.as_bytes());

            let central = CentralHeader::stored(name_len, size, crc, datetime, local_offset);
            directory.extend_from_slice(central.as_bytes());
            directory.extend_from_slice(&name);

            debug!(
                "Wrote entry {:?}: size={} crc={:08x} offset={}",
                String::from_utf8_lossy(&name),
                size,
                crc,
                local_offset
            );
        }

        let directory_offset: u32 = fit(archive.len() as u64)?;
        let directory_size: u32 = fit(directory.len() as u64)?;
        archive.extend_from_slice(&directory);
        let end = EndHeader::new(count, directory_size, directory_offset);
        archive.extend_from_slice(end.as_bytes());

        info!("Built archive with {} entries, {} bytes", count, archive.len());
        Ok(archive)
    }

    /// Consume this builder and write the finished archive to `writer`,
    /// returning the number of bytes written. Nothing is written if the
    /// build fails.
    pub fn write_archive<W: Write>(self, writer: &mut W) -> Result<u64, Error> {
        let archive = self.build()?;
        writer
            .write_all(&archive)
            .map_err(wrap_io_err!("Write archive"))?;
        Ok(archive.len() as u64)
    }
}

impl fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("entries", &self.entries)
            .finish()
    }
}
