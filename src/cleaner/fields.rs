use tracing::debug;

use crate::document::{DocumentProperty, EditingSession};

/// Resultado de vaciar las propiedades personales de una sesión.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldScrubReport {
    pub cleared: Vec<DocumentProperty>,
    /// Propiedades cuya lectura o escritura falló y se ignoraron.
    pub skipped: Vec<DocumentProperty>,
}

/// Vacía cada propiedad presente y no vacía. Las ausentes se ignoran y un error en una
/// propiedad no detiene las demás. No guarda la sesión.
pub fn scrub_fields<S: EditingSession>(
    session: &mut S,
    fields: &[DocumentProperty],
) -> FieldScrubReport {
    let mut report = FieldScrubReport::default();

    for &property in fields {
        let current = match session.property(property) {
            Ok(value) => value,
            Err(error) => {
                debug!(%property, %error, "no se pudo leer la propiedad");
                report.skipped.push(property);
                continue;
            }
        };

        match current {
            Some(value) if !value.is_empty() => match session.set_property(property, "") {
                Ok(()) => report.cleared.push(property),
                Err(error) => {
                    debug!(%property, %error, "no se pudo vaciar la propiedad");
                    report.skipped.push(property);
                }
            },
            _ => {}
        }
    }

    report
}
