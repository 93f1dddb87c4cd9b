use tracing::debug;

use crate::document::{EditingSession, PersonalInfoFlag};
use crate::error::Result;

/// Decide si el documento debe limpiarse y, en ese caso, activa su indicador.
///
/// Un indicador ya activo se toma como garantía de que el documento no conserva datos
/// personales; `force_clean` ignora esa garantía. Activar el indicador modifica la
/// sesión, que debe guardarse después.
pub fn should_clean<S: EditingSession>(session: &mut S, force_clean: bool) -> Result<bool> {
    let flag = session.personal_info_flag()?;
    if flag == PersonalInfoFlag::Enabled && !force_clean {
        debug!(path = %session.path().display(), "indicador activo, se omite");
        return Ok(false);
    }

    session.set_personal_info_flag(true)?;
    debug!(path = %session.path().display(), previous = ?flag, "indicador activado");
    Ok(true)
}
