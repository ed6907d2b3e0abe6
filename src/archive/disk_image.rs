use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{ArchiveError, Result};
use crate::util::{copy_tree, run_blocking};

const DEFAULT_HDIUTIL: &str = "hdiutil";

/// macOS disk image, read by mounting it with `hdiutil`
#[derive(Debug, Clone)]
pub struct DiskImageArchive {
    path: PathBuf,
    hdiutil: Option<PathBuf>,
    nobrowse: bool,
}

impl DiskImageArchive {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            hdiutil: None,
            nobrowse: false,
        }
    }

    /// Use a specific `hdiutil` binary instead of the one on `PATH`
    pub fn with_hdiutil<P: Into<PathBuf>>(mut self, hdiutil: P) -> Self {
        self.hdiutil = Some(hdiutil.into());
        self
    }

    /// Keep the mounted volume out of the user-visible mount list
    pub fn with_nobrowse(mut self, nobrowse: bool) -> Self {
        self.nobrowse = nobrowse;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn nobrowse(&self) -> bool {
        self.nobrowse
    }

    pub fn hdiutil_program(&self) -> &Path {
        self.hdiutil.as_deref().unwrap_or_else(|| Path::new(DEFAULT_HDIUTIL))
    }

    pub fn attach_args(&self, mount_point: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "attach".into(),
            self.path.clone().into(),
            "-mountpoint".into(),
            mount_point.into(),
            "-readonly".into(),
            "-noautoopen".into(),
        ];
        if self.nobrowse {
            args.push("-nobrowse".into());
        }
        args
    }

    pub fn detach_args(&self, mount_point: &Path) -> Vec<OsString> {
        vec!["detach".into(), mount_point.into(), "-force".into()]
    }

    /// Mount, copy the volume contents into `dest`, and always unmount
    pub async fn extract_to(&self, dest: &Path) -> Result<()> {
        let mount_dir = tempfile::Builder::new().prefix("projector-dmg-").tempdir()?;
        let mount_point = mount_dir.path().to_path_buf();

        self.run(self.attach_args(&mount_point)).await?;

        let src = mount_point.clone();
        let dest = dest.to_path_buf();
        let copied = run_blocking(move || copy_tree(&src, &dest)).await;

        if let Err(e) = self.run(self.detach_args(&mount_point)).await {
            warn!("Failed to detach {:?}: {}", mount_point, e);
            if copied.is_ok() {
                return Err(e);
            }
        }

        let count = copied?;
        debug!("Copied {} entries from disk image {:?}", count, self.path);
        Ok(())
    }

    async fn run(&self, args: Vec<OsString>) -> Result<()> {
        let program = self.hdiutil_program();
        debug!("Running {:?} {:?}", program, args);

        let output = Command::new(program)
            .args(&args)
            .output()
            .await
            .map_err(|e| self.mount_failed(format!("failed to launch {}: {}", program.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self
                .mount_failed(format!("{} exited with {}: {}", program.display(), output.status, stderr.trim()))
                .into());
        }
        Ok(())
    }

    fn mount_failed(&self, reason: String) -> ArchiveError {
        ArchiveError::MountFailed {
            path: self.path.display().to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectorError;

    #[test]
    fn test_attach_args_include_nobrowse() {
        let image = DiskImageArchive::new("player.dmg").with_nobrowse(true);
        let args = image.attach_args(Path::new("/tmp/mnt"));

        assert_eq!(args[0], "attach");
        assert_eq!(args[1], "player.dmg");
        assert!(args.iter().any(|a| a == "-nobrowse"));
        assert!(args.iter().any(|a| a == "-readonly"));
    }

    #[test]
    fn test_attach_args_without_nobrowse() {
        let image = DiskImageArchive::new("player.dmg");
        let args = image.attach_args(Path::new("/tmp/mnt"));
        assert!(!args.iter().any(|a| a == "-nobrowse"));
        assert_eq!(image.hdiutil_program(), Path::new("hdiutil"));
    }

    #[tokio::test]
    async fn test_missing_tool_is_mount_failure() {
        let dir = tempfile::tempdir().unwrap();
        let image = DiskImageArchive::new(dir.path().join("player.dmg"))
            .with_hdiutil(dir.path().join("no-such-hdiutil"));

        let err = image.extract_to(&dir.path().join("out")).await.unwrap_err();
        assert!(matches!(err, ProjectorError::Archive(ArchiveError::MountFailed { .. })));
    }
}
