// dvt-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// Missing parent directories are created first. The temporary file lives in
/// the target directory so the final rename never crosses filesystems; the
/// target is either fully written or left untouched.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Serializes `data` as YAML and writes it atomically.
pub fn write_yaml<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), InfrastructureError> {
    let content = serde_yaml::to_string(data)?;
    atomic_write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("nested/home/connections.yaml");

        atomic_write(&file_path, "a: 1\n")?;

        assert_eq!(fs::read_to_string(file_path)?, "a: 1\n");
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("validations.yaml");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        assert_eq!(fs::read_to_string(file_path)?, "Updated");
        Ok(())
    }

    #[test]
    fn test_write_yaml() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("map.yaml");
        let data: BTreeMap<&str, u32> = [("b", 2), ("a", 1)].into_iter().collect();

        write_yaml(&file_path, &data)?;

        assert_eq!(fs::read_to_string(file_path)?, "a: 1\nb: 2\n");
        Ok(())
    }
}
