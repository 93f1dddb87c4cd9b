//! Búsqueda recursiva de documentos Office dentro de un directorio.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::document::DocumentKind;
use crate::error::{Result, ScrubError};

/// Prefijo de los archivos de bloqueo que Office crea junto a un documento abierto.
const OWNER_FILE_PREFIX: &str = "~$";

/// Devuelve, ordenados, los `.pptx`, `.docx` y `.xlsx` bajo `root`.
pub fn discover_documents(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ScrubError::InvalidDirectory(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "entrada omitida durante la búsqueda");
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && !entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(OWNER_FILE_PREFIX)
                && DocumentKind::from_path(entry.path()).is_some()
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_office_documents_recursively() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested)?;
        for name in ["uno.pptx", "dos.DOCX", "notas.txt", "~$uno.pptx", "viejo.xls"] {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::write(nested.join("tres.xlsx"), b"")?;
        fs::create_dir(dir.path().join("carpeta.docx"))?;

        let found = discover_documents(dir.path())?;
        let names: Vec<String> = found
            .iter()
            .filter_map(|path| path.strip_prefix(dir.path()).ok())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a/b/tres.xlsx", "dos.DOCX", "uno.pptx"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempdir().expect("directorio temporal");
        let missing = dir.path().join("no-existe");
        assert!(matches!(
            discover_documents(&missing),
            Err(ScrubError::InvalidDirectory(path)) if path == missing
        ));
    }
}
