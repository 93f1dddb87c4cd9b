use std::fmt;
use std::path::Path;

/// Tipos de documento Office que admite la limpieza.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Slideshow,
    WordDoc,
    Spreadsheet,
}

/// Resultado de clasificar una ruta por su extensión.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Supported(DocumentKind),
    Unsupported,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Slideshow,
        DocumentKind::WordDoc,
        DocumentKind::Spreadsheet,
    ];

    /// Determina el tipo de documento sólo por la extensión, sin distinguir mayúsculas.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension() == ext)
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Slideshow => "pptx",
            DocumentKind::WordDoc => "docx",
            DocumentKind::Spreadsheet => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Slideshow => "presentaciones",
            DocumentKind::WordDoc => "documentos de texto",
            DocumentKind::Spreadsheet => "hojas de cálculo",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.extension())
    }
}

pub fn classify(path: &Path) -> Classification {
    match DocumentKind::from_path(path) {
        Some(kind) => Classification::Supported(kind),
        None => Classification::Unsupported,
    }
}
