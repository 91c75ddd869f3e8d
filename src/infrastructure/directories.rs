use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(Path::new(&cfg.logs_dir))?;
    let data_dir = ensure_dir(Path::new(&cfg.data_dir))?;
    check_writable(&data_dir)?;

    Ok(ResolvedPaths {
        db_path: data_dir.join(&cfg.db_filename),
        logs_dir,
        data_dir,
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;
    Ok(dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()))
}

fn check_writable(dir: &Path) -> Result<()> {
    let marker = dir.join(".write-test");
    fs::write(&marker, b"ok")
        .with_context(|| format!("data directory {} is not writable", dir.display()))?;
    fs::remove_file(&marker)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = DirectoryConfig {
            logs_dir: root.path().join("a/logs").display().to_string(),
            data_dir: root.path().join("b/data").display().to_string(),
            db_filename: "mail.db".to_string(),
        };
        let paths = ensure_directories(&cfg).expect("directories created");
        assert!(paths.logs_dir.is_dir());
        assert!(paths.data_dir.is_dir());
        assert_eq!(paths.db_path, paths.data_dir.join("mail.db"));
        assert!(!paths.data_dir.join(".write-test").exists());
    }
}
