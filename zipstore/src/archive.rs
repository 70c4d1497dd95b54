use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use zipstore_core::ArchiveSrc;

use crate::{wrap_io_err, Error};

/// A finished archive on disk
#[derive(Debug)]
pub struct ArchiveFile {
    path: PathBuf,
    src: BufReader<File>,
    len: u64,
}

impl ArchiveFile {
    pub fn new(path: impl AsRef<Path>) -> Result<ArchiveFile, Error> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(wrap_io_err!(path, "Open"))?;
        let len = file
            .metadata()
            .map_err(wrap_io_err!(path, "Read metadata"))?
            .len();

        Ok(ArchiveFile {
            path,
            src: BufReader::new(file),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSrc for ArchiveFile {
    type Err = Error;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err> {
        self.src
            .seek(SeekFrom::Start(offset))
            .map_err(wrap_io_err!(self.path, "Seek at read_at"))?;
        self.src
            .read_exact(buf)
            .map_err(wrap_io_err!(self.path, "Read at read_at"))?;
        Ok(buf.len())
    }

    fn total_len(&mut self) -> Result<u64, Self::Err> {
        Ok(self.len)
    }
}
