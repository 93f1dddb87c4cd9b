use crate::error::Result;
use crate::package::constants::APP_NS;
use crate::package::part_editor::{FieldSpec, XmlPart};

/// Campos de `app.xml` que identifican a la organización.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendedField {
    Company,
    Manager,
}

impl ExtendedField {
    fn spec(self) -> FieldSpec<'static> {
        match self {
            ExtendedField::Company => FieldSpec::new(None, "Company", Some(APP_NS)),
            ExtendedField::Manager => FieldSpec::new(None, "Manager", Some(APP_NS)),
        }
    }
}

/// Vista editable de las propiedades extendidas del paquete.
#[derive(Debug, Clone)]
pub struct ExtendedProperties {
    part: XmlPart,
    modified: bool,
}

impl ExtendedProperties {
    pub fn parse(part_name: &str, contents: &[u8]) -> Result<Self> {
        Ok(Self {
            part: XmlPart::parse(part_name, contents)?,
            modified: false,
        })
    }

    pub fn part_name(&self) -> &str {
        self.part.name()
    }

    pub fn get(&self, field: ExtendedField) -> Option<String> {
        self.part.child_text(&field.spec())
    }

    /// Sustituye el valor del campo. Sólo se usa sobre campos ya presentes.
    pub fn set(&mut self, field: ExtendedField, value: &str) {
        self.modified |= self.part.set_child_text(field.spec(), value);
    }

    /// Elimina el elemento del campo (valor nulo).
    pub fn clear(&mut self, field: ExtendedField) {
        self.modified |= self.part.remove_child(&field.spec());
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.part.to_bytes()
    }
}
