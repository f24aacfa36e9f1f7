//! Clean the output directory

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;

use crate::Stationary;

/// Remove the output directory. A missing directory is not an error.
pub fn run(site: &Stationary) -> Result<()> {
    match fs::remove_dir_all(&site.public_dir) {
        Ok(()) => {
            tracing::info!("Deleted: {:?}", site.public_dir);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("Nothing to clean, {:?} does not exist", site.public_dir);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to delete {:?}", site.public_dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let site = Stationary::from_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(site.public_dir.join("blog")).unwrap();
        fs::write(site.public_dir.join("blog/index.html"), "x").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_clean_missing_output_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let site = Stationary::from_config(dir.path(), SiteConfig::default());
        assert!(!site.public_dir.exists());
        run(&site).unwrap();
        run(&site).unwrap();
    }
}
