use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::package::Package;

use super::flag::{read_flag, write_flag};
use super::properties::{read_property, write_property};
use super::{DocumentKind, DocumentProperty, PersonalInfoFlag};

/// Sesión de edición abierta sobre un documento.
pub trait EditingSession {
    fn path(&self) -> &Path;

    fn kind(&self) -> DocumentKind;

    fn personal_info_flag(&self) -> Result<PersonalInfoFlag>;

    fn set_personal_info_flag(&mut self, enabled: bool) -> Result<()>;

    /// `Ok(None)` indica que la propiedad no existe; no es un error.
    fn property(&self, property: DocumentProperty) -> Result<Option<String>>;

    fn set_property(&mut self, property: DocumentProperty, value: &str) -> Result<()>;

    fn save(&mut self) -> Result<()>;

    /// Libera la sesión. Los cambios no guardados se descartan.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Reserva de una sesión abierta en el contador de su motor; se libera al soltarse.
#[derive(Debug)]
pub(crate) struct SessionLease {
    open_sessions: Rc<Cell<usize>>,
}

impl SessionLease {
    pub(crate) fn acquire(open_sessions: &Rc<Cell<usize>>) -> Self {
        open_sessions.set(open_sessions.get() + 1);
        Self {
            open_sessions: Rc::clone(open_sessions),
        }
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.open_sessions
            .set(self.open_sessions.get().saturating_sub(1));
    }
}

/// Documento abierto en modo escritura sobre su paquete OPC.
#[derive(Debug)]
pub struct DocumentHandle {
    kind: DocumentKind,
    package: Package,
    _lease: SessionLease,
}

impl DocumentHandle {
    pub(crate) fn open(kind: DocumentKind, path: &Path, lease: SessionLease) -> Result<Self> {
        let package = Package::open(path, true)?;
        Ok(Self {
            kind,
            package,
            _lease: lease,
        })
    }
}

impl EditingSession for DocumentHandle {
    fn path(&self) -> &Path {
        self.package.path()
    }

    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn personal_info_flag(&self) -> Result<PersonalInfoFlag> {
        read_flag(&self.package, self.kind)
    }

    fn set_personal_info_flag(&mut self, enabled: bool) -> Result<()> {
        write_flag(&mut self.package, self.kind, enabled)?;
        Ok(())
    }

    fn property(&self, property: DocumentProperty) -> Result<Option<String>> {
        read_property(&self.package, property)
    }

    fn set_property(&mut self, property: DocumentProperty, value: &str) -> Result<()> {
        write_property(&mut self.package, property, value)
    }

    fn save(&mut self) -> Result<()> {
        self.package.save()
    }

    fn close(self) -> Result<()> {
        if self.package.is_dirty() {
            debug!(
                path = %self.package.path().display(),
                "sesión cerrada con cambios sin guardar"
            );
        }
        Ok(())
    }
}
