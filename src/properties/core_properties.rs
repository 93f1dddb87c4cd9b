use crate::error::Result;
use crate::package::constants::{CP_NS, DC_NS};
use crate::package::part_editor::{FieldSpec, XmlPart};

/// Campos de `core.xml` que pueden contener datos personales.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreField {
    Creator,
    LastModifiedBy,
    Description,
}

impl CoreField {
    fn spec(self) -> FieldSpec<'static> {
        match self {
            CoreField::Creator => FieldSpec::new(Some("dc"), "creator", Some(DC_NS)),
            CoreField::LastModifiedBy => {
                FieldSpec::new(Some("cp"), "lastModifiedBy", Some(CP_NS))
            }
            CoreField::Description => FieldSpec::new(Some("dc"), "description", Some(DC_NS)),
        }
    }
}

/// Vista editable de las propiedades core del paquete.
#[derive(Debug, Clone)]
pub struct CoreProperties {
    part: XmlPart,
    modified: bool,
}

impl CoreProperties {
    pub fn parse(part_name: &str, contents: &[u8]) -> Result<Self> {
        Ok(Self {
            part: XmlPart::parse(part_name, contents)?,
            modified: false,
        })
    }

    pub fn part_name(&self) -> &str {
        self.part.name()
    }

    pub fn get(&self, field: CoreField) -> Option<String> {
        self.part.child_text(&field.spec())
    }

    /// Fija el valor del campo, creándolo si no existe.
    pub fn set(&mut self, field: CoreField, value: &str) {
        self.modified |= self.part.set_child_text(field.spec(), value);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.part.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/">
    <dc:creator>Alice</dc:creator>
    <dc:title>Plan</dc:title>
</cp:coreProperties>
"#;

    #[test]
    fn reads_present_and_missing_fields() {
        let core = CoreProperties::parse("docProps/core.xml", CORE_XML.as_bytes())
            .expect("core válido");
        assert_eq!(core.get(CoreField::Creator).as_deref(), Some("Alice"));
        assert_eq!(core.get(CoreField::LastModifiedBy), None);
        assert_eq!(core.get(CoreField::Description), None);
    }

    #[test]
    fn blanking_creates_missing_fields_and_keeps_others() {
        let mut core = CoreProperties::parse("docProps/core.xml", CORE_XML.as_bytes())
            .expect("core válido");
        core.set(CoreField::Creator, "");
        core.set(CoreField::LastModifiedBy, "");
        assert!(core.is_modified());

        let text = String::from_utf8(core.to_bytes().expect("serializa")).expect("utf-8");
        assert!(!text.contains("Alice"));
        assert!(text.contains("cp:lastModifiedBy"));
        assert!(text.contains("Plan"));

        let reparsed = CoreProperties::parse("docProps/core.xml", text.as_bytes()).expect("reparsea");
        assert_eq!(reparsed.get(CoreField::Creator).as_deref(), Some(""));
        assert_eq!(reparsed.get(CoreField::LastModifiedBy).as_deref(), Some(""));
    }
}
