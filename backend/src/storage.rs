use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Holding area for uploads that live only for the duration of one request.
#[derive(Clone)]
pub struct TransientStore {
    dir: PathBuf,
}

impl TransientStore {
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the payload under a fresh UUID name, keeping the original
    /// extension so decoders can sniff the format from the path too.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<TransientFile> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let path = self.dir.join(format!("{}.{}", Uuid::new_v4(), ext));
        fs::write(&path, bytes)?;
        Ok(TransientFile { path })
    }
}

/// Deletes its file when dropped, on success and failure paths alike. A
/// crash before the drop leaks the file.
pub struct TransientFile {
    path: PathBuf,
}

impl TransientFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!(
                "failed to remove transient upload {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TransientStore {
        let dir = std::env::temp_dir().join(format!("transient-{}", Uuid::new_v4()));
        TransientStore::new(dir).unwrap()
    }

    #[test]
    fn save_writes_and_drop_deletes() {
        let store = store();
        let path = {
            let file = store.save("scan.png", b"bytes").unwrap();
            assert!(file.path().exists());
            assert_eq!(file.path().extension().unwrap(), "png");
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn extension_defaults_to_bin() {
        let store = store();
        let file = store.save("no-extension", b"bytes").unwrap();
        assert_eq!(file.path().extension().unwrap(), "bin");
    }

    #[test]
    fn saves_of_the_same_name_do_not_collide() {
        let store = store();
        let a = store.save("scan.jpg", b"one").unwrap();
        let b = store.save("scan.jpg", b"two").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
