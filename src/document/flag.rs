//! Indicador "eliminar información personal al guardar" de cada formato.
//!
//! - Presentaciones: atributo `removePersonalInfoOnSave` en la raíz de `presentation.xml`.
//! - Libros de Excel: atributo `filterPrivacy` de `workbookPr`.
//! - Documentos de Word: elemento `w:removePersonalInformation` en `settings.xml`.

use tracing::debug;

use crate::error::{Result, ScrubError};
use crate::package::constants::{
    OFFICE_DOCUMENT_REL, SPREADSHEETML_NS, WORD_SETTINGS_REL, WORD_SETTINGS_TEMPLATE,
    WORD_SETTINGS_TYPE, WORDPROCESSING_NS,
};
use crate::package::part_editor::{FieldSpec, XmlPart};
use crate::package::{Package, Relationships, relationships_part_for, relative_target};

use super::DocumentKind;

/// Estado del indicador dentro del documento.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonalInfoFlag {
    Enabled,
    Disabled,
    Unset,
}

impl PersonalInfoFlag {
    pub fn is_enabled(self) -> bool {
        self == PersonalInfoFlag::Enabled
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => PersonalInfoFlag::Unset,
            Some(v) if matches!(v.as_str(), "0" | "false" | "off") => PersonalInfoFlag::Disabled,
            Some(_) => PersonalInfoFlag::Enabled,
        }
    }
}

const PRESENTATION_ATTRIBUTE: &str = "removePersonalInfoOnSave";
const WORKBOOK_ATTRIBUTE: &str = "filterPrivacy";

const WORKBOOK_PR: FieldSpec<'static> =
    FieldSpec::new(None, "workbookPr", Some(SPREADSHEETML_NS));
const REMOVE_PERSONAL_INFORMATION: FieldSpec<'static> =
    FieldSpec::new(Some("w"), "removePersonalInformation", Some(WORDPROCESSING_NS));

/// Elementos de `CT_Workbook` que preceden a `workbookPr`.
const WORKBOOK_PR_PREDECESSORS: &[&str] = &["fileVersion", "fileSharing"];
/// Elementos de `CT_Settings` que preceden a `removePersonalInformation`.
const SETTINGS_PREDECESSORS: &[&str] = &["writeProtection", "view", "zoom"];

pub(crate) fn read_flag(package: &Package, kind: DocumentKind) -> Result<PersonalInfoFlag> {
    match kind {
        DocumentKind::Slideshow => {
            let main = load_main_part(package)?;
            Ok(PersonalInfoFlag::from_value(
                main.root_attribute(PRESENTATION_ATTRIBUTE).as_deref(),
            ))
        }
        DocumentKind::Spreadsheet => {
            let main = load_main_part(package)?;
            Ok(PersonalInfoFlag::from_value(
                main.child_attribute(&WORKBOOK_PR, WORKBOOK_ATTRIBUTE)
                    .as_deref(),
            ))
        }
        DocumentKind::WordDoc => {
            let Some(settings_name) = word_settings_part(package)? else {
                return Ok(PersonalInfoFlag::Unset);
            };
            let settings = load_part(package, &settings_name)?;
            if !settings.has_child(&REMOVE_PERSONAL_INFORMATION) {
                return Ok(PersonalInfoFlag::Unset);
            }
            // Sin `w:val` el elemento significa activado.
            Ok(
                match settings.child_attribute(&REMOVE_PERSONAL_INFORMATION, "val") {
                    None => PersonalInfoFlag::Enabled,
                    Some(value) => PersonalInfoFlag::from_value(Some(&value)),
                },
            )
        }
    }
}

/// Activa o desactiva el indicador. Devuelve `true` si el paquete cambió.
pub(crate) fn write_flag(package: &mut Package, kind: DocumentKind, enabled: bool) -> Result<bool> {
    let value = if enabled { "1" } else { "0" };
    match kind {
        DocumentKind::Slideshow => {
            let (name, mut main) = load_main_part_named(package)?;
            let changed = main.set_root_attribute(PRESENTATION_ATTRIBUTE, value);
            store_if_changed(package, &name, &main, changed)
        }
        DocumentKind::Spreadsheet => {
            let (name, mut main) = load_main_part_named(package)?;
            let changed = main.set_child_attribute(
                WORKBOOK_PR,
                WORKBOOK_ATTRIBUTE,
                value,
                WORKBOOK_PR_PREDECESSORS,
            );
            store_if_changed(package, &name, &main, changed)
        }
        DocumentKind::WordDoc => {
            if read_flag(package, kind)?.is_enabled() == enabled {
                return Ok(false);
            }
            let settings_name = match word_settings_part(package)? {
                Some(name) => name,
                None => create_word_settings(package)?,
            };
            let mut settings = load_part(package, &settings_name)?;
            settings.remove_child(&REMOVE_PERSONAL_INFORMATION);
            if enabled {
                settings.insert_empty_child(REMOVE_PERSONAL_INFORMATION, SETTINGS_PREDECESSORS);
            }
            store_if_changed(package, &settings_name, &settings, true)
        }
    }
}

fn store_if_changed(
    package: &mut Package,
    name: &str,
    part: &XmlPart,
    changed: bool,
) -> Result<bool> {
    if changed {
        package.set_part_data(name, part.to_bytes()?);
        debug!(part = name, "indicador de información personal actualizado");
    }
    Ok(changed)
}

fn load_part(package: &Package, name: &str) -> Result<XmlPart> {
    let data = package
        .part_data(name)
        .ok_or_else(|| ScrubError::MissingPart(name.to_string()))?;
    XmlPart::parse(name, data)
}

fn load_main_part(package: &Package) -> Result<XmlPart> {
    load_main_part_named(package).map(|(_, part)| part)
}

fn load_main_part_named(package: &Package) -> Result<(String, XmlPart)> {
    let name = package
        .main_document_part()
        .ok_or_else(|| ScrubError::MissingPart(OFFICE_DOCUMENT_REL.to_string()))?;
    let part = load_part(package, &name)?;
    Ok((name, part))
}

fn word_settings_part(package: &Package) -> Result<Option<String>> {
    let Some(main) = package.main_document_part() else {
        return Err(ScrubError::MissingPart(OFFICE_DOCUMENT_REL.to_string()));
    };
    Ok(package
        .relationships_of(&main)?
        .and_then(|rels| rels.target_of_type(WORD_SETTINGS_REL))
        .filter(|name| package.has_part(name)))
}

/// Enlaza `settings.xml` desde la parte principal, creándolo junto a ella si no existe.
fn create_word_settings(package: &mut Package) -> Result<String> {
    let main = package
        .main_document_part()
        .ok_or_else(|| ScrubError::MissingPart(OFFICE_DOCUMENT_REL.to_string()))?;
    let name = match main.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/settings.xml"),
        None => "settings.xml".to_string(),
    };

    if package.has_part(&name) {
        package.declare_content_type(&name, WORD_SETTINGS_TYPE);
    } else {
        package.add_part(&name, WORD_SETTINGS_TYPE, WORD_SETTINGS_TEMPLATE.as_bytes().to_vec());
    }
    let mut rels = package
        .relationships_of(&main)?
        .unwrap_or_else(|| Relationships::empty(&relationships_part_for(&main)));
    rels.add(WORD_SETTINGS_REL, &relative_target(&main, &name));
    package.store_relationships(&main, &rels)?;

    debug!(part = %name, "parte de configuración de Word enlazada");
    Ok(name)
}
