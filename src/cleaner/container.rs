//! Limpieza a nivel de contenedor: partes XML personalizadas y propiedades del paquete.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::package::constants::{CUSTOM_XML_PREFIX, RELATIONSHIPS_TYPE};
use crate::package::{Package, PartInfo, is_xml_content_type};
use crate::properties::{CoreField, ExtendedField};

/// Lo que la limpieza del contenedor eliminó o modificó.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerReport {
    pub custom_xml_removed: Vec<String>,
    pub custom_properties_removed: bool,
    pub extended_cleared: bool,
    pub core_blanked: bool,
    /// Fallos de pasos individuales; no interrumpen los demás pasos.
    pub failures: Vec<String>,
}

impl ContainerReport {
    pub fn parts_removed(&self) -> usize {
        self.custom_xml_removed.len() + usize::from(self.custom_properties_removed)
    }
}

pub(crate) fn is_custom_xml_part(part: &PartInfo) -> bool {
    let Some(content_type) = part.content_type.as_deref() else {
        return false;
    };
    part.name
        .get(..CUSTOM_XML_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CUSTOM_XML_PREFIX))
        && is_xml_content_type(content_type)
        && !content_type.eq_ignore_ascii_case(RELATIONSHIPS_TYPE)
}

/// Abre el paquete en `path`, elimina las partes personalizadas, anula la compañía y el
/// responsable, vacía autor y último editor, y guarda el resultado.
pub fn strip_container_properties(path: &Path) -> Result<ContainerReport> {
    let mut package = Package::open(path, true)?;
    let mut report = ContainerReport::default();

    remove_custom_xml_parts(&mut package, &mut report);
    remove_custom_properties(&mut package, &mut report);
    if let Err(error) = clear_extended_properties(&mut package, &mut report) {
        record_failure(&mut report, format!("propiedades extendidas: {error}"));
    }
    if let Err(error) = blank_core_properties(&mut package, &mut report) {
        record_failure(&mut report, format!("propiedades core: {error}"));
    }

    package.save()?;
    debug!(path = %path.display(), ?report, "contenedor limpio");
    Ok(report)
}

fn remove_custom_xml_parts(package: &mut Package, report: &mut ContainerReport) {
    let targets: Vec<String> = package
        .parts()
        .into_iter()
        .filter(is_custom_xml_part)
        .map(|part| part.name)
        .collect();

    for name in targets {
        // La parte pudo desaparecer junto con otra (sus propias relaciones).
        if !package.has_part(&name) {
            continue;
        }
        match package.delete_part(&name) {
            Ok(()) => report.custom_xml_removed.push(name),
            Err(error) => record_failure(report, format!("{name}: {error}")),
        }
    }
}

fn remove_custom_properties(package: &mut Package, report: &mut ContainerReport) {
    let Some(name) = package.custom_properties_part() else {
        return;
    };
    match package.delete_part(&name) {
        Ok(()) => report.custom_properties_removed = true,
        Err(error) => record_failure(report, format!("{name}: {error}")),
    }
}

fn clear_extended_properties(package: &mut Package, report: &mut ContainerReport) -> Result<()> {
    let Some(mut app) = package.extended_properties()? else {
        return Ok(());
    };
    app.clear(ExtendedField::Company);
    app.clear(ExtendedField::Manager);
    if app.is_modified() {
        let name = app.part_name().to_string();
        package.set_part_data(&name, app.to_bytes()?);
        report.extended_cleared = true;
    }
    Ok(())
}

fn blank_core_properties(package: &mut Package, report: &mut ContainerReport) -> Result<()> {
    let Some(mut core) = package.core_properties()? else {
        return Ok(());
    };
    core.set(CoreField::Creator, "");
    core.set(CoreField::LastModifiedBy, "");
    if core.is_modified() {
        let name = core.part_name().to_string();
        package.set_part_data(&name, core.to_bytes()?);
        report.core_blanked = true;
    }
    Ok(())
}

fn record_failure(report: &mut ContainerReport, message: String) {
    warn!(%message, "paso de limpieza del contenedor fallido");
    report.failures.push(message);
}
