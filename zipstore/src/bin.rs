use std::fs::{self, File};
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use zipstore_core::{ArchiveSrc, CentralEntry};

use crate::ext::{ArchiveSrcExt, CentralEntryExt};
use crate::naming::replace_extension;
use crate::{wrap_io_err, ArchiveBuilder, ArchiveFile, Error, READ_WRITE_BUF_SIZE};

/// Collect `(name, path)` pairs for every file below `path`, named relative
/// to `base`. Each directory is visited in file name order.
fn folder_entries(
    base: &Path,
    path: &Path,
    files: &mut Vec<(Vec<u8>, PathBuf)>,
) -> Result<(), Error> {
    let mut read_dir = Vec::new();
    for entry_res in fs::read_dir(path).map_err(wrap_io_err!(path, "Read directory"))? {
        read_dir.push(entry_res.map_err(wrap_io_err!(path, "Read directory entry"))?);
    }
    read_dir.sort_by_key(|entry| entry.file_name());

    for entry in read_dir {
        let entry_path = entry.path();
        let metadata = entry.metadata().map_err(wrap_io_err!(entry_path, "Stat"))?;
        if metadata.is_dir() {
            folder_entries(base, &entry_path, files)?;
        } else if metadata.file_type().is_symlink()
            && fs::metadata(&entry_path).map_or(false, |target| target.is_dir())
        {
            warn!("Skipping directory symlink {}", entry_path.display());
        } else {
            files.push((relative_name(base, &entry_path)?, entry_path));
        }
    }
    Ok(())
}

fn relative_name(base: &Path, path: &Path) -> Result<Vec<u8>, Error> {
    let relative = path.strip_prefix(base).map_err(|_| Error::InvalidPath {
        entry: path.to_path_buf(),
        component: base.to_path_buf(),
    })?;

    // Only normal components are stored, so `./` and `../` prefixes drop out
    let mut name = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !name.is_empty() {
                name.push(b'/');
            }
            name.extend_from_slice(part.as_bytes());
        }
    }
    Ok(name)
}

/// Archive every file in `inputs`. Plain files are stored under their file
/// name; directories are walked recursively and their files stored under
/// paths starting with the directory's own name. With `extension` set, each
/// stored name has its last extension replaced.
///
/// Returns the size of the written archive.
pub fn create(
    archive_path: impl AsRef<Path>,
    inputs: impl IntoIterator<Item = impl AsRef<Path>>,
    extension: Option<&str>,
) -> Result<u64, Error> {
    let archive_path = archive_path.as_ref();

    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let base = input.parent().unwrap_or_else(|| Path::new(""));
        let metadata = fs::metadata(input).map_err(wrap_io_err!(input, "Stat input"))?;
        if metadata.is_dir() {
            folder_entries(base, input, &mut files)?;
        } else {
            files.push((relative_name(base, input)?, input.to_path_buf()));
        }
    }

    let mut builder = ArchiveBuilder::new();
    for (name, path) in files {
        match extension {
            Some(extension) => {
                let renamed = replace_extension(&String::from_utf8_lossy(&name), extension);
                builder.add_file(renamed, path)
            }
            None => builder.add_file(name, path),
        };
    }

    let archive = builder.build()?;
    fs::write(archive_path, &archive).map_err(wrap_io_err!(archive_path, "Write archive"))?;
    info!("Wrote {} ({} bytes)", archive_path.display(), archive.len());
    Ok(archive.len() as u64)
}

/// Central directory entries of the archive at `archive_path`
pub fn list(archive_path: impl AsRef<Path>) -> Result<Vec<CentralEntry>, Error> {
    let mut archive = ArchiveFile::new(archive_path)?;
    archive.entries()
}

/// Check the size and CRC-32 of every entry, returning how many were checked
pub fn verify(archive_path: impl AsRef<Path>) -> Result<usize, Error> {
    let mut archive = ArchiveFile::new(archive_path)?;
    let entries = archive.verify()?;
    info!("Verified {} entries in {}", entries.len(), archive.path().display());
    Ok(entries.len())
}

/// Verify the archive, then write every entry below `base_dir`
pub fn extract(archive_path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<(), Error> {
    let base_dir = base_dir.as_ref();
    let mut archive = ArchiveFile::new(archive_path)?;
    let entries = archive.verify()?;

    let mut buf = vec![0; READ_WRITE_BUF_SIZE];
    for entry in entries.iter() {
        let target = base_dir.join(entry.check_path()?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(wrap_io_err!(parent, "Create directory"))?;
        }
        let file = File::create(&target).map_err(wrap_io_err!(target, "Create file"))?;
        archive.copy_entry(entry, file, &mut buf)?;
        info!("Extracted {}", target.display());
    }

    Ok(())
}
