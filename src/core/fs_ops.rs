// src/core/fs_ops.rs
//! File system helpers shared by the CLI, bootstrap and store setup

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write file, creating parent directories as needed
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir_exists(parent).await?;
            }
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(info, "Written file: {}", path.display());
        Ok(())
    }

    /// Bare file names land in `base`; anything with a directory part is kept as given
    pub fn output_path(base: &Path, requested: &Path) -> PathBuf {
        let has_dir = requested
            .parent()
            .map(|p| !p.as_os_str().is_empty())
            .unwrap_or(false);

        if requested.is_absolute() || has_dir {
            requested.to_path_buf()
        } else {
            base.join(requested)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let base = Path::new("/srv/out");
        assert_eq!(
            FsOps::output_path(base, Path::new("cold_email.txt")),
            PathBuf::from("/srv/out/cold_email.txt")
        );
        assert_eq!(
            FsOps::output_path(base, Path::new("drafts/mail.txt")),
            PathBuf::from("drafts/mail.txt")
        );
        assert_eq!(
            FsOps::output_path(base, Path::new("/tmp/mail.txt")),
            PathBuf::from("/tmp/mail.txt")
        );
    }

    #[tokio::test]
    async fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/mail.txt");
        FsOps::write_file_safe(&path, "Subject: hi").await.unwrap();
        assert_eq!(FsOps::read_file_safe(&path).await.unwrap(), "Subject: hi");
    }
}
