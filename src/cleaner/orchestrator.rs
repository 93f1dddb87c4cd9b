//! Recorrido del lote: cada archivo pasa por clasificación, indicador, propiedades,
//! contenedor y verificación. Un fallo en un archivo nunca detiene el lote.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::{
    BackendSet, Classification, DocumentKind, EditingBackend, EditingSession, PERSONAL_FIELDS,
    classify,
};
use crate::error::Result;

use super::container::{ContainerReport, strip_container_properties};
use super::fields::{FieldScrubReport, scrub_fields};
use super::flag_pass::should_clean;
use super::verify::verify_clean;

/// Configuración de una ejecución.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanOptions {
    /// Limpia aunque el documento ya tenga activo el indicador.
    pub force_clean: bool,
    /// Relee cada documento limpio para comprobar que no conserva metadata.
    pub verify: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            force_clean: false,
            verify: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unsupported,
    AlreadyProtected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CleanupEvent {
    Started {
        total: usize,
    },
    Processing {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    Success {
        path: PathBuf,
        kind: DocumentKind,
        fields_cleared: usize,
        parts_removed: usize,
    },
    Skipped {
        path: PathBuf,
        reason: SkipReason,
    },
    Warning {
        path: PathBuf,
        message: String,
    },
    Failure {
        path: PathBuf,
        error: String,
    },
    Finished {
        successes: usize,
        skipped: usize,
        failures: usize,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub total: usize,
    pub successes: usize,
    pub skipped: usize,
    pub failures: usize,
}

enum FileOutcome {
    Cleaned {
        kind: DocumentKind,
        fields: FieldScrubReport,
        container: ContainerReport,
    },
    Skipped(SkipReason),
}

pub fn run_cleanup<B, F>(
    files: &[PathBuf],
    backends: &BackendSet<B>,
    options: CleanOptions,
    mut on_event: F,
) -> CleanupSummary
where
    B: EditingBackend,
    F: FnMut(CleanupEvent),
{
    let total = files.len();
    let mut summary = CleanupSummary {
        total,
        ..CleanupSummary::default()
    };
    on_event(CleanupEvent::Started { total });

    for (index, path) in files.iter().enumerate() {
        on_event(CleanupEvent::Processing {
            index: index + 1,
            total,
            path: path.clone(),
        });

        match process_file(path, backends, options) {
            Ok(FileOutcome::Cleaned {
                kind,
                fields,
                container,
            }) => {
                for property in &fields.skipped {
                    on_event(CleanupEvent::Warning {
                        path: path.clone(),
                        message: format!("No se pudo limpiar la propiedad {property}"),
                    });
                }
                for failure in &container.failures {
                    on_event(CleanupEvent::Warning {
                        path: path.clone(),
                        message: failure.clone(),
                    });
                }
                summary.successes += 1;
                on_event(CleanupEvent::Success {
                    path: path.clone(),
                    kind,
                    fields_cleared: fields.cleared.len(),
                    parts_removed: container.parts_removed(),
                });
            }
            Ok(FileOutcome::Skipped(reason)) => {
                summary.skipped += 1;
                on_event(CleanupEvent::Skipped {
                    path: path.clone(),
                    reason,
                });
            }
            Err(error) => {
                summary.failures += 1;
                on_event(CleanupEvent::Failure {
                    path: path.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    info!(
        successes = summary.successes,
        skipped = summary.skipped,
        failures = summary.failures,
        "limpieza terminada"
    );
    on_event(CleanupEvent::Finished {
        successes: summary.successes,
        skipped: summary.skipped,
        failures: summary.failures,
    });
    summary
}

fn process_file<B: EditingBackend>(
    path: &Path,
    backends: &BackendSet<B>,
    options: CleanOptions,
) -> Result<FileOutcome> {
    let kind = match classify(path) {
        Classification::Supported(kind) => kind,
        Classification::Unsupported => return Ok(FileOutcome::Skipped(SkipReason::Unsupported)),
    };

    // La sesión se libera al salir por cualquier `?`.
    let mut session = backends.for_kind(kind).open(path)?;
    if !should_clean(&mut session, options.force_clean)? {
        session.close()?;
        return Ok(FileOutcome::Skipped(SkipReason::AlreadyProtected));
    }

    let fields = scrub_fields(&mut session, &PERSONAL_FIELDS);
    session.save()?;
    session.close()?;

    let container = strip_container_properties(path)?;
    if options.verify {
        verify_clean(path, kind)?;
    }

    debug!(path = %path.display(), ?fields, "documento limpio");
    Ok(FileOutcome::Cleaned {
        kind,
        fields,
        container,
    })
}
