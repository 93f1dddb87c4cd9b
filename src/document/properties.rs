use std::fmt;

use crate::error::{Result, ScrubError};
use crate::package::Package;
use crate::package::constants::{CORE_PROPERTIES_TYPE, EXTENDED_PROPERTIES_TYPE};
use crate::properties::{CoreField, ExtendedField};

/// Propiedades de documento que pueden identificar a una persona u organización.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentProperty {
    Author,
    LastAuthor,
    Manager,
    Company,
    Comments,
}

/// Campos que la limpieza vacía en cada documento.
pub const PERSONAL_FIELDS: [DocumentProperty; 5] = [
    DocumentProperty::Author,
    DocumentProperty::LastAuthor,
    DocumentProperty::Company,
    DocumentProperty::Manager,
    DocumentProperty::Comments,
];

#[derive(Clone, Copy, Debug)]
enum Storage {
    Core(CoreField),
    Extended(ExtendedField),
}

impl DocumentProperty {
    pub fn name(self) -> &'static str {
        match self {
            DocumentProperty::Author => "Author",
            DocumentProperty::LastAuthor => "LastAuthor",
            DocumentProperty::Manager => "Manager",
            DocumentProperty::Company => "Company",
            DocumentProperty::Comments => "Comments",
        }
    }

    fn storage(self) -> Storage {
        match self {
            DocumentProperty::Author => Storage::Core(CoreField::Creator),
            DocumentProperty::LastAuthor => Storage::Core(CoreField::LastModifiedBy),
            DocumentProperty::Comments => Storage::Core(CoreField::Description),
            DocumentProperty::Company => Storage::Extended(ExtendedField::Company),
            DocumentProperty::Manager => Storage::Extended(ExtendedField::Manager),
        }
    }
}

impl fmt::Display for DocumentProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lee una propiedad. `None` significa que el documento no la contiene.
pub(crate) fn read_property(package: &Package, property: DocumentProperty) -> Result<Option<String>> {
    match property.storage() {
        Storage::Core(field) => Ok(package.core_properties()?.and_then(|core| core.get(field))),
        Storage::Extended(field) => Ok(package
            .extended_properties()?
            .and_then(|app| app.get(field))),
    }
}

pub(crate) fn write_property(
    package: &mut Package,
    property: DocumentProperty,
    value: &str,
) -> Result<()> {
    match property.storage() {
        Storage::Core(field) => {
            let mut core = package
                .core_properties()?
                .ok_or_else(|| ScrubError::MissingPart(CORE_PROPERTIES_TYPE.to_string()))?;
            core.set(field, value);
            if core.is_modified() {
                let name = core.part_name().to_string();
                package.set_part_data(&name, core.to_bytes()?);
            }
        }
        Storage::Extended(field) => {
            let mut app = package
                .extended_properties()?
                .ok_or_else(|| ScrubError::MissingPart(EXTENDED_PROPERTIES_TYPE.to_string()))?;
            app.set(field, value);
            if app.is_modified() {
                let name = app.part_name().to_string();
                package.set_part_data(&name, app.to_bytes()?);
            }
        }
    }
    Ok(())
}
