//! File saving for document exports.

use super::types::{DOCUMENT_FILE_NAME, ExportError};
use std::fs;
use std::path::{Path, PathBuf};

/// Where document exports are written.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    /// Directory to save documents to.
    pub save_directory: PathBuf,
    /// File name inside the directory.
    pub file_name: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            file_name: DOCUMENT_FILE_NAME.to_string(),
        }
    }
}

impl FileSaveConfig {
    pub fn in_directory(save_directory: impl Into<PathBuf>) -> Self {
        Self {
            save_directory: save_directory.into(),
            ..Self::default()
        }
    }
}

/// Downloads folder, falling back to the home directory.
pub fn default_save_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory).map_err(save_err)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Save a document payload. An existing file with the same name is replaced.
///
/// The payload goes to a temporary sibling first and is renamed into place,
/// so a failed write never leaves a truncated document behind.
pub fn save_document(payload: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.save_directory)?;
    let file_path = directory.join(&config.file_name);
    let partial_path = directory.join(format!(".{}.partial", config.file_name));

    log::info!(
        "Saving document to: {} ({} bytes)",
        file_path.display(),
        payload.len()
    );

    if let Err(err) = fs::write(&partial_path, payload) {
        let _ = fs::remove_file(&partial_path);
        return Err(save_err(err));
    }
    fs::rename(&partial_path, &file_path).map_err(save_err)?;

    log::info!("Document saved: {}", file_path.display());

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

fn save_err(err: std::io::Error) -> ExportError {
    ExportError::EncodingFailure(format!("Failed to save document: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_document_uses_fixed_name() {
        let temp = TempDir::new().unwrap();
        let config = FileSaveConfig::in_directory(temp.path().join("nested"));

        let path = save_document(b"%PDF-1.7 test", &config).unwrap();
        assert_eq!(path.file_name().unwrap(), "tokens.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7 test");

        // Saving again replaces the previous document.
        save_document(b"%PDF-1.7 again", &config).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7 again");
        assert!(!path.with_file_name(".tokens.pdf.partial").exists());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Downloads");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_default_config() {
        let config = FileSaveConfig::default();
        assert_eq!(config.file_name, "tokens.pdf");
    }
}
