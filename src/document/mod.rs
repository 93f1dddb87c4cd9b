//! Documentos Office vistos como sesiones de edición: clasificación por extensión,
//! indicador de información personal, propiedades de documento y motores de edición.

mod backend;
mod flag;
mod handle;
mod kind;
mod properties;

pub use backend::{BackendSet, EditingBackend, PackageBackend};
pub use flag::PersonalInfoFlag;
pub use handle::{DocumentHandle, EditingSession};
pub use kind::{Classification, DocumentKind, classify};
pub use properties::{DocumentProperty, PERSONAL_FIELDS};

pub(crate) use flag::read_flag;
