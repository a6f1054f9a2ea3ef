use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// CsvConnection manages the data directory shared by all repositories.
///
/// Layout:
///
/// ```text
/// <base>/
///   users.yaml
///   <group_dir>/
///     group.yaml
///     birthdays.csv
/// ```
///
/// Mutations are serialized through a single write lock so read-modify-write
/// cycles on the flat files cannot interleave.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new connection rooted at a base directory, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// The base data directory
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// The directory holding one group's files
    pub fn group_directory(&self, directory_name: &str) -> PathBuf {
        self.base_directory.join(directory_name)
    }

    /// List the directory names that hold a group (contain a `group.yaml`)
    pub fn group_directories(&self) -> Result<Vec<String>> {
        if !self.base_directory.exists() {
            return Ok(Vec::new());
        }

        let mut directories = Vec::new();
        for entry in fs::read_dir(&self.base_directory)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || !path.join("group.yaml").exists() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                directories.push(name.to_string());
            }
        }
        directories.sort();
        Ok(directories)
    }

    /// Read the group ID recorded in a directory's `group.yaml`
    pub fn group_id_of_directory(&self, directory_name: &str) -> Result<Option<String>> {
        let yaml_path = self.group_directory(directory_name).join("group.yaml");
        if !yaml_path.exists() {
            return Ok(None);
        }
        let yaml_content = fs::read_to_string(&yaml_path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml_content)?;
        Ok(value
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    /// Find the directory holding the group with this ID
    pub fn find_group_directory(&self, group_id: &str) -> Result<Option<String>> {
        for directory_name in self.group_directories()? {
            if self.group_id_of_directory(&directory_name)?.as_deref() == Some(group_id) {
                return Ok(Some(directory_name));
            }
        }
        Ok(None)
    }

    /// Acquire the write lock for a read-modify-write cycle.
    ///
    /// A poisoned lock means a writer panicked mid-cycle; the files on disk
    /// are still whole because every write goes through a tmp-file rename,
    /// so we continue with the inner guard.
    pub fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Write `content` to `path` atomically via a temp file in the same directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
