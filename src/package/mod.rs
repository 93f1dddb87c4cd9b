//! Acceso directo al paquete OPC (contenedor ZIP de partes XML) de un documento Office.
//!
//! `Package` es el punto de extensión de bajo nivel: enumera partes con su tipo de
//! contenido, las elimina respetando las relaciones y expone las partes de propiedades
//! del paquete (core, extendidas y personalizadas).

mod archive;
pub mod constants;
mod content_types;
pub(crate) mod part_editor;
mod relationships;
pub(crate) mod xml;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ScrubError};
use crate::properties::{CoreProperties, ExtendedProperties};

use archive::ArchiveEntry;
use constants::{
    CONTENT_TYPES_PART, CORE_PROPERTIES_RELS, CORE_PROPERTIES_TYPE, CUSTOM_PROPERTIES_RELS,
    CUSTOM_PROPERTIES_TYPE, EXTENDED_PROPERTIES_RELS, EXTENDED_PROPERTIES_TYPE,
    OFFICE_DOCUMENT_REL, RELATIONSHIPS_TYPE,
};

pub use content_types::{ContentTypes, is_xml_content_type};
pub use relationships::{Relationship, Relationships};
pub(crate) use relationships::{relationships_part_for, relative_target};

/// Descripción de una parte del paquete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    /// Nombre de la parte sin barra inicial (`customXml/item1.xml`).
    pub name: String,
    pub content_type: Option<String>,
}

impl PartInfo {
    /// URI de la parte tal como la escribe OPC (`/customXml/item1.xml`).
    pub fn uri(&self) -> String {
        format!("/{}", self.name)
    }
}

#[derive(Debug)]
pub struct Package {
    path: PathBuf,
    writable: bool,
    entries: Vec<ArchiveEntry>,
    content_types: ContentTypes,
    content_types_dirty: bool,
    dirty: bool,
}

impl Package {
    /// Abre el paquete en `path`. Con `writable == false`, `save` queda prohibido.
    pub fn open(path: &Path, writable: bool) -> Result<Self> {
        let entries = archive::read_entries(path)?;
        let content_types = entries
            .iter()
            .find(|entry| entry.name == CONTENT_TYPES_PART)
            .map(|entry| ContentTypes::parse(&entry.data))
            .ok_or_else(|| ScrubError::MissingPart(CONTENT_TYPES_PART.to_string()))??;

        debug!(path = %path.display(), parts = entries.len(), "paquete abierto");

        Ok(Self {
            path: path.to_path_buf(),
            writable,
            entries,
            content_types,
            content_types_dirty: false,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Enumera las partes (excluye directorios y la tabla de tipos de contenido).
    pub fn parts(&self) -> Vec<PartInfo> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_dir && entry.name != CONTENT_TYPES_PART)
            .map(|entry| PartInfo {
                name: entry.name.clone(),
                content_type: self
                    .content_types
                    .content_type_of(&entry.name)
                    .map(str::to_string),
            })
            .collect()
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.entry_index(name).is_some()
    }

    pub fn part_data(&self, name: &str) -> Option<&[u8]> {
        self.entry_index(name)
            .map(|index| self.entries[index].data.as_slice())
    }

    /// Sustituye el contenido de una parte existente o la crea al final del paquete.
    pub fn set_part_data(&mut self, name: &str, data: Vec<u8>) {
        let name = normalize_part_name(name);
        match self.entry_index(&name) {
            Some(index) => self.entries[index].data = data,
            None => self.entries.push(ArchiveEntry::new_file(&name, data)),
        }
        self.dirty = true;
    }

    /// Crea una parte nueva con su tipo de contenido declarado.
    pub fn add_part(&mut self, name: &str, content_type: &str, data: Vec<u8>) {
        let name = normalize_part_name(name);
        self.content_types.add_override(&name, content_type);
        self.content_types_dirty = true;
        self.set_part_data(&name, data);
    }

    /// Declara el tipo de contenido de una parte existente si aún no lo tiene.
    pub fn declare_content_type(&mut self, name: &str, content_type: &str) {
        let name = normalize_part_name(name);
        let declared = self
            .content_types
            .content_type_of(&name)
            .is_some_and(|found| found.eq_ignore_ascii_case(content_type));
        if !declared {
            self.content_types.add_override(&name, content_type);
            self.content_types_dirty = true;
            self.dirty = true;
        }
    }

    /// Primera parte cuyo tipo de contenido coincide exactamente.
    pub fn find_part_by_content_type(&self, content_type: &str) -> Option<String> {
        self.parts()
            .into_iter()
            .find(|part| {
                part.content_type
                    .as_deref()
                    .is_some_and(|found| found.eq_ignore_ascii_case(content_type))
            })
            .map(|part| part.name)
    }

    /// Parte principal del documento según la relación `officeDocument` del paquete.
    pub fn main_document_part(&self) -> Option<String> {
        self.relationships_of("")
            .ok()
            .flatten()
            .and_then(|rels| rels.target_of_type(OFFICE_DOCUMENT_REL))
            .filter(|name| self.has_part(name))
    }

    /// Relaciones salientes de `source_part` (`""` para el paquete), si existen.
    pub fn relationships_of(&self, source_part: &str) -> Result<Option<Relationships>> {
        let rels_name = relationships_part_for(source_part);
        self.part_data(&rels_name)
            .map(|data| Relationships::parse(&rels_name, data))
            .transpose()
    }

    pub fn store_relationships(&mut self, source_part: &str, rels: &Relationships) -> Result<()> {
        let rels_name = relationships_part_for(source_part);
        let data = rels.to_bytes()?;
        if self.has_part(&rels_name) {
            self.set_part_data(&rels_name, data);
        } else {
            self.add_part(&rels_name, RELATIONSHIPS_TYPE, data);
        }
        Ok(())
    }

    /// Elimina una parte, su parte de relaciones propia, su sustitución de tipo de
    /// contenido y las relaciones de otras partes que apuntan a ella.
    ///
    /// Todas las partes de relaciones se analizan antes de tocar el paquete: si alguna
    /// está dañada, el error se devuelve y el paquete queda como estaba.
    pub fn delete_part(&mut self, name: &str) -> Result<()> {
        let name = normalize_part_name(name);
        if name == CONTENT_TYPES_PART {
            return Err(ScrubError::xml(
                &name,
                "la tabla de tipos de contenido no puede eliminarse",
            ));
        }
        if !self.has_part(&name) {
            return Err(ScrubError::MissingPart(name));
        }
        let own_rels = relationships_part_for(&name);
        let rewritten = self.relationships_without(&name, &own_rels)?;

        self.remove_entry(&name);
        if self.remove_entry(&own_rels) {
            self.content_types.remove_override(&own_rels);
        }
        self.content_types.remove_override(&name);
        self.content_types_dirty = true;
        self.dirty = true;

        for (rels_name, data) in rewritten {
            self.set_part_data(&rels_name, data);
        }
        debug!(part = %name, "parte eliminada");
        Ok(())
    }

    /// Partes de relaciones que dejarían de apuntar a `deleted`, ya serializadas.
    fn relationships_without(&self, deleted: &str, skip: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut rewritten = Vec::new();
        for entry in &self.entries {
            if entry.is_dir
                || !relationships::is_relationships_part(&entry.name)
                || entry.name.eq_ignore_ascii_case(skip)
                || entry.name.eq_ignore_ascii_case(deleted)
            {
                continue;
            }
            let mut rels = Relationships::parse(&entry.name, &entry.data)?;
            if rels.remove_targets(|target| target.eq_ignore_ascii_case(deleted)) > 0 {
                rewritten.push((entry.name.clone(), rels.to_bytes()?));
            }
        }
        Ok(rewritten)
    }

    fn remove_entry(&mut self, name: &str) -> bool {
        match self.entry_index(name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn custom_properties_part(&self) -> Option<String> {
        self.package_properties_part(CUSTOM_PROPERTIES_RELS, CUSTOM_PROPERTIES_TYPE)
    }

    pub fn extended_properties_part(&self) -> Option<String> {
        self.package_properties_part(EXTENDED_PROPERTIES_RELS, EXTENDED_PROPERTIES_TYPE)
    }

    pub fn core_properties_part(&self) -> Option<String> {
        self.package_properties_part(CORE_PROPERTIES_RELS, CORE_PROPERTIES_TYPE)
    }

    /// Parte enlazada desde `_rels/.rels` con alguno de `rel_types`; si el paquete no la
    /// enlaza, la primera parte con `content_type`.
    fn package_properties_part(&self, rel_types: &[&str], content_type: &str) -> Option<String> {
        let linked = self.relationships_of("").ok().flatten().and_then(|rels| {
            rel_types
                .iter()
                .find_map(|rel_type| rels.target_of_type(rel_type))
        });
        linked
            .filter(|name| self.has_part(name))
            .or_else(|| self.find_part_by_content_type(content_type))
    }

    /// Propiedades extendidas (`docProps/app.xml`), si el paquete las contiene.
    pub fn extended_properties(&self) -> Result<Option<ExtendedProperties>> {
        self.extended_properties_part()
            .and_then(|name| {
                self.part_data(&name)
                    .map(|data| ExtendedProperties::parse(&name, data))
            })
            .transpose()
    }

    /// Propiedades core del paquete (`docProps/core.xml`), si existen.
    pub fn core_properties(&self) -> Result<Option<CoreProperties>> {
        self.core_properties_part()
            .and_then(|name| {
                self.part_data(&name)
                    .map(|data| CoreProperties::parse(&name, data))
            })
            .transpose()
    }

    /// Persiste el paquete de forma atómica (temporal + renombrado).
    pub fn save(&mut self) -> Result<()> {
        if !self.writable {
            return Err(ScrubError::ReadOnly(self.path.clone()));
        }
        if self.content_types_dirty {
            let data = self.content_types.to_bytes()?;
            self.set_part_data(CONTENT_TYPES_PART, data);
            self.content_types_dirty = false;
        }
        if !self.dirty {
            return Ok(());
        }

        archive::write_entries(&self.path, &self.entries)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "paquete guardado");
        Ok(())
    }

    fn entry_index(&self, name: &str) -> Option<usize> {
        let name = normalize_part_name(name);
        self.entries
            .iter()
            .position(|entry| !entry.is_dir && entry.name.eq_ignore_ascii_case(&name))
    }
}

fn normalize_part_name(name: &str) -> String {
    name.trim_start_matches('/').to_string()
}
