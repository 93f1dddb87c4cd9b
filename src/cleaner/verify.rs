use std::path::Path;

use crate::document::{DocumentKind, read_flag};
use crate::error::{Result, ScrubError};
use crate::package::Package;
use crate::properties::{CoreField, ExtendedField};

use super::container::is_custom_xml_part;

/// Relee un documento ya limpio y enumera la metadata personal que aún conserva.
pub fn find_residual_metadata(path: &Path, kind: DocumentKind) -> Result<Vec<String>> {
    let package = Package::open(path, false)?;
    let mut residues = Vec::new();

    if !read_flag(&package, kind)?.is_enabled() {
        residues.push("indicador de información personal desactivado".to_string());
    }

    if let Some(core) = package.core_properties()? {
        for (field, label) in [
            (CoreField::Creator, "dc:creator"),
            (CoreField::LastModifiedBy, "cp:lastModifiedBy"),
        ] {
            match core.get(field) {
                Some(value) if value.is_empty() => {}
                Some(_) => residues.push(format!("{label} conserva un valor")),
                None => residues.push(format!("{label} no existe")),
            }
        }
        if core
            .get(CoreField::Description)
            .is_some_and(|value| !value.is_empty())
        {
            residues.push("dc:description conserva un valor".to_string());
        }
    }

    if let Some(app) = package.extended_properties()? {
        if app.get(ExtendedField::Company).is_some() {
            residues.push("Company sigue presente".to_string());
        }
        if app.get(ExtendedField::Manager).is_some() {
            residues.push("Manager sigue presente".to_string());
        }
    }

    if let Some(name) = package.custom_properties_part() {
        residues.push(format!("propiedades personalizadas en {name}"));
    }

    residues.extend(
        package
            .parts()
            .into_iter()
            .filter(is_custom_xml_part)
            .map(|part| format!("parte XML personalizada {}", part.uri())),
    );

    Ok(residues)
}

/// Falla con [`ScrubError::VerificationFailed`] si el documento conserva metadata personal.
pub fn verify_clean(path: &Path, kind: DocumentKind) -> Result<()> {
    let residues = find_residual_metadata(path, kind)?;
    if residues.is_empty() {
        Ok(())
    } else {
        Err(ScrubError::VerificationFailed(residues.join(", ")))
    }
}
