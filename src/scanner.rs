use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of class descriptor files
const DESCRIPTOR_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// File scanner for class descriptor trees.
///
/// The `FileScanner` recursively walks a directory to find every class descriptor
/// (`.json`, `.yaml` or `.yml`). It skips `target` and hidden directories (those
/// starting with `.`). A single file may be given as the root as well.
///
/// # Example
///
/// ```no_run
/// use openapi_schema_scanner::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./classes"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} descriptors", result.descriptor_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the discovered descriptor files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths of all discovered descriptor files, in walk order
    pub descriptor_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all descriptor files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning
    /// continues with the remaining entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Index path does not exist: {}", self.root_path.display());
        }

        let mut descriptor_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = e.file_type().is_dir() && file_name == "target";

                !is_hidden && !is_target
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_descriptor(path) {
                        descriptor_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            descriptor_files,
            warnings,
        })
    }
}

/// Whether the file extension marks a class descriptor
pub fn is_descriptor(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| {
            DESCRIPTOR_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
