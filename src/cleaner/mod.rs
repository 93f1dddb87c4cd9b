//! Política de limpieza: indicador de información personal, propiedades del documento,
//! propiedades del contenedor y verificación, compuestas por el orquestador del lote.

mod container;
mod fields;
mod flag_pass;
mod orchestrator;
mod verify;

pub use container::{ContainerReport, strip_container_properties};
pub use fields::{FieldScrubReport, scrub_fields};
pub use flag_pass::should_clean;
pub use orchestrator::{CleanOptions, CleanupEvent, CleanupSummary, SkipReason, run_cleanup};
pub use verify::{find_residual_metadata, verify_clean};
