use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{Result, ScrubError};

/// Entrada del contenedor ZIP junto con las opciones con las que fue almacenada.
#[derive(Debug, Clone)]
pub(crate) struct ArchiveEntry {
    pub(crate) name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) is_dir: bool,
    compression: CompressionMethod,
    unix_mode: Option<u32>,
    last_modified: Option<DateTime>,
}

impl ArchiveEntry {
    pub(crate) fn new_file(name: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            data,
            is_dir: false,
            compression: CompressionMethod::Deflated,
            unix_mode: None,
            last_modified: None,
        }
    }

    fn options(&self) -> FileOptions<'static, ()> {
        let mut options = FileOptions::<'static, ()>::default().compression_method(self.compression);
        if let Some(mode) = self.unix_mode {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = self.last_modified {
            options = options.last_modified_time(time);
        }
        options
    }
}

/// Lee todas las entradas de un documento Office conservando su orden.
pub(crate) fn read_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let source_file = File::open(path).map_err(|e| ScrubError::io(path, e))?;
    let mut archive = ZipArchive::new(source_file)?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut data = Vec::new();
        if !file.is_dir() {
            file.read_to_end(&mut data)
                .map_err(|e| ScrubError::io(path, e))?;
        }

        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            data,
            is_dir: file.is_dir(),
            compression: file.compression(),
            unix_mode: file.unix_mode(),
            last_modified: file.last_modified(),
        });
    }

    Ok(entries)
}

/// Escribe las entradas en un archivo temporal y lo renombra sobre `path`.
pub(crate) fn write_entries(path: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let temp_path = scratch_path(path);

    if let Err(error) = write_archive(&temp_path, entries) {
        let _ = fs::remove_file(&temp_path);
        return Err(error);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ScrubError::io(path, e)
    })
}

fn write_archive(output_path: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let target_file = File::create(output_path).map_err(|e| ScrubError::io(output_path, e))?;
    let mut writer = ZipWriter::new(target_file);

    for entry in entries {
        if entry.is_dir {
            writer.add_directory(entry.name.as_str(), entry.options())?;
            continue;
        }

        writer.start_file(entry.name.as_str(), entry.options())?;
        writer
            .write_all(&entry.data)
            .map_err(|e| ScrubError::io(output_path, e))?;
    }

    writer.finish()?;
    Ok(())
}

/// Ruta de trabajo oculta junto a `path`. Su extensión `.tmp` evita que un resto de
/// una ejecución interrumpida se descubra como documento.
pub(crate) fn scratch_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    parent.join(format!(".{file_name}.docscrub-{}-{stamp}.tmp", process::id()))
}
