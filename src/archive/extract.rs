use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive as TarArchive;
use zip::ZipArchive;

use crate::error::{ArchiveError, Result};

pub(super) fn unpack_zip(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    let file = File::open(src)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| failed(src, e))?;
    archive.extract(dest).map_err(|e| failed(src, e))?;
    Ok(())
}

pub(super) fn unpack_tar(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    let file = File::open(src)?;
    TarArchive::new(BufReader::new(file))
        .unpack(dest)
        .map_err(|e| failed(src, e))?;
    Ok(())
}

pub(super) fn unpack_tar_gz(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    let file = File::open(src)?;
    TarArchive::new(GzDecoder::new(BufReader::new(file)))
        .unpack(dest)
        .map_err(|e| failed(src, e))?;
    Ok(())
}

fn failed(src: &Path, e: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::ExtractFailed {
        path: src.display().to_string(),
        reason: e.to_string(),
    }
}
