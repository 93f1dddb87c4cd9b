//! Motores de edición: uno por tipo de documento, iniciados una vez por ejecución.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{Result, ScrubError};

use super::handle::{DocumentHandle, EditingSession, SessionLease};
use super::DocumentKind;

/// Fábrica de sesiones de edición para un tipo de documento.
pub trait EditingBackend {
    type Session: EditingSession;

    fn kind(&self) -> DocumentKind;

    fn open(&self, path: &Path) -> Result<Self::Session>;

    /// Sesiones abiertas que aún no se han liberado.
    fn open_sessions(&self) -> usize;

    fn shutdown(&mut self);
}

/// Motor que edita directamente el paquete OPC del documento.
#[derive(Debug)]
pub struct PackageBackend {
    kind: DocumentKind,
    running: bool,
    open_sessions: Rc<Cell<usize>>,
}

impl PackageBackend {
    pub fn launch(kind: DocumentKind) -> Self {
        debug!(%kind, "motor de edición iniciado");
        Self {
            kind,
            running: true,
            open_sessions: Rc::new(Cell::new(0)),
        }
    }
}

impl EditingBackend for PackageBackend {
    type Session = DocumentHandle;

    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn open(&self, path: &Path) -> Result<DocumentHandle> {
        if !self.running {
            return Err(ScrubError::BackendShutDown(self.kind));
        }
        DocumentHandle::open(self.kind, path, SessionLease::acquire(&self.open_sessions))
    }

    fn open_sessions(&self) -> usize {
        self.open_sessions.get()
    }

    fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let leaked = self.open_sessions.get();
        if leaked > 0 {
            warn!(kind = %self.kind, leaked, "motor detenido con sesiones abiertas");
        } else {
            debug!(kind = %self.kind, "motor de edición detenido");
        }
    }
}

/// Conjunto de motores, uno por tipo de documento.
#[derive(Debug)]
pub struct BackendSet<B> {
    slideshow: B,
    word: B,
    spreadsheet: B,
}

impl BackendSet<PackageBackend> {
    pub fn launch() -> Self {
        Self::new(
            PackageBackend::launch(DocumentKind::Slideshow),
            PackageBackend::launch(DocumentKind::WordDoc),
            PackageBackend::launch(DocumentKind::Spreadsheet),
        )
    }
}

impl<B: EditingBackend> BackendSet<B> {
    pub fn new(slideshow: B, word: B, spreadsheet: B) -> Self {
        Self {
            slideshow,
            word,
            spreadsheet,
        }
    }

    pub fn for_kind(&self, kind: DocumentKind) -> &B {
        match kind {
            DocumentKind::Slideshow => &self.slideshow,
            DocumentKind::WordDoc => &self.word,
            DocumentKind::Spreadsheet => &self.spreadsheet,
        }
    }

    pub fn open_sessions(&self) -> usize {
        DocumentKind::ALL
            .into_iter()
            .map(|kind| self.for_kind(kind).open_sessions())
            .sum()
    }

    pub fn shutdown(&mut self) {
        self.slideshow.shutdown();
        self.word.shutdown();
        self.spreadsheet.shutdown();
    }
}
