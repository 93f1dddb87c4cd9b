//! Errores de la limpieza de metadata.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::document::DocumentKind;

pub type Result<T> = std::result::Result<T, ScrubError>;

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("La ruta `{}` no existe o no es un directorio", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Error de E/S en `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No es un documento Office válido: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML inválido en `{part}`: {message}")]
    Xml { part: String, message: String },

    #[error("El paquete no contiene la parte `{0}`")]
    MissingPart(String),

    #[error("El paquete `{}` se abrió en modo de solo lectura", .0.display())]
    ReadOnly(PathBuf),

    #[error("El motor de edición para {0} ya fue detenido")]
    BackendShutDown(DocumentKind),

    #[error("La verificación detectó metadata residual: {0}")]
    VerificationFailed(String),
}

impl ScrubError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ScrubError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn xml(part: &str, message: impl ToString) -> Self {
        ScrubError::Xml {
            part: part.to_string(),
            message: message.to_string(),
        }
    }
}
