//! # Archive Resolution
//!
//! Turns a player path into a handle that can extract its contents. A
//! directory is read in place; regular files dispatch on extension, ignoring
//! case:
//!
//! - `.zip` - zip archive
//! - `.dmg` - disk image, mounted with `hdiutil` and never shown in the Finder
//! - `.tar` - tar archive
//! - `.tar.gz` / `.tgz` - gzip-compressed tar archive
//!
//! ```rust,no_run
//! use projector_builder::archive::Archive;
//!
//! # #[tokio::main]
//! # async fn main() -> projector_builder::Result<()> {
//! let archive = Archive::open("players/flashplayer.tar.gz", None).await?;
//! archive.extract_to("staging").await?;
//! # Ok(())
//! # }
//! ```

mod disk_image;
mod extract;

pub use disk_image::DiskImageArchive;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ArchiveError, Result};
use crate::util::{copy_tree, has_suffix_ignore_case, run_blocking};

/// Container kinds a player can ship in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    Directory,
    Zip,
    Tar,
    TarGz,
    DiskImage,
}

/// What a path points at, as far as classification cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Directory,
    File,
    Other,
}

impl EntryType {
    fn from_metadata(meta: &std::fs::Metadata) -> Self {
        if meta.is_dir() {
            EntryType::Directory
        } else if meta.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        }
    }
}

impl ArchiveKind {
    /// Archive kind implied by a file name alone, if any
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        if has_suffix_ignore_case(&name, ".zip") {
            Some(ArchiveKind::Zip)
        } else if has_suffix_ignore_case(&name, ".dmg") {
            Some(ArchiveKind::DiskImage)
        } else if has_suffix_ignore_case(&name, ".tar") {
            Some(ArchiveKind::Tar)
        } else if has_suffix_ignore_case(&name, ".tar.gz") || has_suffix_ignore_case(&name, ".tgz") {
            Some(ArchiveKind::TarGz)
        } else {
            None
        }
    }

    /// Classify a path of a known entry type
    pub fn classify(path: &Path, entry: EntryType) -> std::result::Result<Self, ArchiveError> {
        let kind = match entry {
            EntryType::Directory => Some(ArchiveKind::Directory),
            EntryType::File => Self::from_file_name(path),
            EntryType::Other => None,
        };
        kind.ok_or_else(|| ArchiveError::UnsupportedArchive {
            path: path.display().to_string(),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ArchiveKind::Directory => "directory",
            ArchiveKind::Zip => "zip",
            ArchiveKind::Tar => "tar",
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::DiskImage => "dmg",
        }
    }
}

/// Handle over one player container
#[derive(Debug, Clone)]
pub enum Archive {
    Directory(PathBuf),
    Zip(PathBuf),
    Tar(PathBuf),
    TarGz(PathBuf),
    DiskImage(DiskImageArchive),
}

impl Archive {
    /// Open `path` as an archive
    ///
    /// `hdiutil` overrides the mounting tool used for disk images. Paths that
    /// do not exist, are neither file nor directory, or carry an unknown
    /// extension fail with [`ArchiveError::UnsupportedArchive`]; any other
    /// failure to stat the path is returned as an I/O error.
    pub async fn open<P: AsRef<Path>>(path: P, hdiutil: Option<&Path>) -> Result<Self> {
        let path = path.as_ref();
        let entry = match tokio::fs::metadata(path).await {
            Ok(meta) => EntryType::from_metadata(&meta),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Archive {:?} does not exist", path);
                EntryType::Other
            }
            Err(e) => return Err(e.into()),
        };

        let kind = ArchiveKind::classify(path, entry)?;
        debug!("Opened {:?} as {} archive", path, kind.name());
        Ok(Self::from_kind(kind, path.to_path_buf(), hdiutil))
    }

    fn from_kind(kind: ArchiveKind, path: PathBuf, hdiutil: Option<&Path>) -> Self {
        match kind {
            ArchiveKind::Directory => Archive::Directory(path),
            ArchiveKind::Zip => Archive::Zip(path),
            ArchiveKind::Tar => Archive::Tar(path),
            ArchiveKind::TarGz => Archive::TarGz(path),
            ArchiveKind::DiskImage => {
                let mut image = DiskImageArchive::new(path).with_nobrowse(true);
                if let Some(tool) = hdiutil {
                    image = image.with_hdiutil(tool);
                }
                Archive::DiskImage(image)
            }
        }
    }

    pub fn kind(&self) -> ArchiveKind {
        match self {
            Archive::Directory(_) => ArchiveKind::Directory,
            Archive::Zip(_) => ArchiveKind::Zip,
            Archive::Tar(_) => ArchiveKind::Tar,
            Archive::TarGz(_) => ArchiveKind::TarGz,
            Archive::DiskImage(_) => ArchiveKind::DiskImage,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Archive::Directory(path) | Archive::Zip(path) | Archive::Tar(path) | Archive::TarGz(path) => path.as_path(),
            Archive::DiskImage(image) => image.path(),
        }
    }

    /// Extract every entry into `dest`, creating it if needed
    pub async fn extract_to<P: AsRef<Path>>(&self, dest: P) -> Result<()> {
        let dest = dest.as_ref().to_path_buf();
        info!("📦 Extracting {} player {:?}", self.kind().name(), self.path());

        match self {
            Archive::Directory(src) => {
                let src = src.clone();
                run_blocking(move || copy_tree(&src, &dest).map(|_| ())).await
            }
            Archive::Zip(src) => {
                let src = src.clone();
                run_blocking(move || extract::unpack_zip(&src, &dest)).await
            }
            Archive::Tar(src) => {
                let src = src.clone();
                run_blocking(move || extract::unpack_tar(&src, &dest)).await
            }
            Archive::TarGz(src) => {
                let src = src.clone();
                run_blocking(move || extract::unpack_tar_gz(&src, &dest)).await
            }
            Archive::DiskImage(image) => image.extract_to(&dest).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectorError;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_classify_extensions() {
        let cases = [
            ("player.zip", ArchiveKind::Zip),
            ("Player.ZIP", ArchiveKind::Zip),
            ("player.dmg", ArchiveKind::DiskImage),
            ("player.tar", ArchiveKind::Tar),
            ("player.tar.gz", ArchiveKind::TarGz),
            ("player.TGZ", ArchiveKind::TarGz),
        ];
        for (name, kind) in cases {
            assert_eq!(ArchiveKind::classify(Path::new(name), EntryType::File).unwrap(), kind, "{}", name);
        }

        assert_eq!(
            ArchiveKind::classify(Path::new("player.zip"), EntryType::Directory).unwrap(),
            ArchiveKind::Directory
        );
    }

    #[test]
    fn test_classify_rejects_unknown() {
        for name in ["player", "player.exe", "player.gz", "player.rar"] {
            assert!(matches!(
                ArchiveKind::classify(Path::new(name), EntryType::File),
                Err(ArchiveError::UnsupportedArchive { .. })
            ));
        }
        assert!(ArchiveKind::classify(Path::new("player.zip"), EntryType::Other).is_err());
    }

    #[tokio::test]
    async fn test_open_matches_kind() {
        let dir = tempdir().unwrap();
        for name in ["a.zip", "b.dmg", "c.tar", "d.tar.gz", "e.tgz"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let expected = [
            ("a.zip", ArchiveKind::Zip),
            ("b.dmg", ArchiveKind::DiskImage),
            ("c.tar", ArchiveKind::Tar),
            ("d.tar.gz", ArchiveKind::TarGz),
            ("e.tgz", ArchiveKind::TarGz),
        ];
        for (name, kind) in expected {
            let archive = Archive::open(dir.path().join(name), None).await.unwrap();
            assert_eq!(archive.kind(), kind);
        }

        let archive = Archive::open(dir.path(), None).await.unwrap();
        assert_eq!(archive.kind(), ArchiveKind::Directory);
    }

    #[tokio::test]
    async fn test_open_missing_or_unknown_fails() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("player.exe")).unwrap();

        for path in [dir.path().join("missing.zip"), dir.path().join("player.exe")] {
            let err = Archive::open(&path, None).await.unwrap_err();
            assert!(matches!(err, ProjectorError::Archive(ArchiveError::UnsupportedArchive { .. })));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_stat_failure_is_io_error() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("plain")).unwrap();

        // ENOTDIR: a path component is a regular file
        let err = Archive::open(dir.path().join("plain/player.zip"), None).await.unwrap_err();
        assert!(matches!(err, ProjectorError::Io(_)));
    }

    #[tokio::test]
    async fn test_open_dmg_threads_hdiutil_and_nobrowse() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("player.dmg");
        File::create(&image).unwrap();

        let archive = Archive::open(&image, Some(Path::new("/opt/bin/hdiutil"))).await.unwrap();
        match archive {
            Archive::DiskImage(image) => {
                assert!(image.nobrowse());
                assert_eq!(image.hdiutil_program(), Path::new("/opt/bin/hdiutil"));
            }
            other => panic!("expected disk image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_directory() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::create_dir(src.path().join("bin")).unwrap();
        fs::write(src.path().join("bin/player"), b"ELF").unwrap();

        Archive::open(src.path(), None).await.unwrap().extract_to(dest.path()).await.unwrap();
        assert_eq!(fs::read(dest.path().join("bin/player")).unwrap(), b"ELF");
    }

    #[tokio::test]
    async fn test_extract_zip() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("player.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&zip_path).unwrap());
            let options = zip::write::SimpleFileOptions::default();
            writer.add_directory("player/", options).unwrap();
            writer.start_file("player/flashplayer.exe", options).unwrap();
            writer.write_all(b"MZ player").unwrap();
            writer.finish().unwrap();
        }

        let dest = dir.path().join("out");
        Archive::open(&zip_path, None).await.unwrap().extract_to(&dest).await.unwrap();
        assert_eq!(fs::read(dest.join("player/flashplayer.exe")).unwrap(), b"MZ player");
    }

    #[tokio::test]
    async fn test_extract_tar_and_tar_gz() {
        let dir = tempdir().unwrap();
        let tar_path = dir.path().join("player.tar");
        let tgz_path = dir.path().join("player.tgz");

        let mut builder = tar::Builder::new(Vec::new());
        let data = b"#!player";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, "flash_player/flashplayer", &data[..]).unwrap();
        let tar_bytes = builder.into_inner().unwrap();
        fs::write(&tar_path, &tar_bytes).unwrap();

        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        fs::write(&tgz_path, encoder.finish().unwrap()).unwrap();

        for (path, out) in [(&tar_path, "tar_out"), (&tgz_path, "tgz_out")] {
            let dest = dir.path().join(out);
            Archive::open(path, None).await.unwrap().extract_to(&dest).await.unwrap();
            assert_eq!(fs::read(dest.join("flash_player/flashplayer")).unwrap(), data);
        }
    }

    #[tokio::test]
    async fn test_extract_corrupt_zip_fails() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("broken.zip");
        fs::write(&zip_path, b"not a zip").unwrap();

        let err = Archive::open(&zip_path, None)
            .await
            .unwrap()
            .extract_to(dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectorError::Archive(ArchiveError::ExtractFailed { .. })));
    }
}
