//! Filesystem predicates the cross-field checks depend on.

use std::io;
use std::path::Path;

/// The only filesystem access option resolution performs.
pub trait FileSystem {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_fs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("snps.txt");
        std::fs::write(&file, "rs1\n").unwrap();

        assert!(LocalFs.is_file(&file));
        assert!(!LocalFs.is_file(dir.path()));
        assert!(!LocalFs.is_file(&dir.path().join("absent.txt")));

        let nested = dir.path().join("a").join("b");
        LocalFs.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
        // Creating it again is not an error.
        LocalFs.create_dir_all(&nested).unwrap();
    }
}
