//! Relaciones OPC (`_rels/*.rels`) y resolución de destinos a nombres de parte.

use xmltree::{Element, XMLNode};

use crate::error::Result;

use super::constants::RELATIONSHIPS_NS;
use super::xml::{child_elements, parse_part, write_part};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Contenido editable de una parte de relaciones.
#[derive(Debug, Clone)]
pub struct Relationships {
    part_name: String,
    root: Element,
}

impl Relationships {
    pub fn parse(part_name: &str, contents: &[u8]) -> Result<Self> {
        Ok(Self {
            part_name: part_name.to_string(),
            root: parse_part(part_name, contents)?,
        })
    }

    pub fn empty(part_name: &str) -> Self {
        let mut root = Element::new("Relationships");
        root.namespace = Some(RELATIONSHIPS_NS.to_string());
        root.attributes
            .insert("xmlns".to_string(), RELATIONSHIPS_NS.to_string());
        Self {
            part_name: part_name.to_string(),
            root,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        write_part(&self.part_name, &self.root)
    }

    pub fn iter(&self) -> impl Iterator<Item = Relationship> + '_ {
        child_elements(&self.root, "Relationship").filter_map(|entry| {
            let attribute = |key: &str| entry.attributes.get(key).cloned();
            Some(Relationship {
                id: attribute("Id")?,
                rel_type: attribute("Type").unwrap_or_default(),
                target: attribute("Target")?,
                external: attribute("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("External")),
            })
        })
    }

    /// Primer destino interno con el tipo de relación indicado, ya resuelto a nombre de parte.
    pub fn target_of_type(&self, rel_type: &str) -> Option<String> {
        let source = source_part_of(&self.part_name)?;
        self.iter()
            .find(|rel| !rel.external && rel.rel_type == rel_type)
            .map(|rel| resolve_target(&source, &rel.target))
    }

    /// Quita las relaciones internas cuyo destino resuelto cumple el predicado.
    pub fn remove_targets(&mut self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let Some(source) = source_part_of(&self.part_name) else {
            return 0;
        };
        let before = self.root.children.len();
        self.root.children.retain(|node| {
            let XMLNode::Element(entry) = node else {
                return true;
            };
            if entry.name != "Relationship" {
                return true;
            }
            let external = entry
                .attributes
                .get("TargetMode")
                .is_some_and(|mode| mode.eq_ignore_ascii_case("External"));
            match entry.attributes.get("Target") {
                Some(target) if !external => !predicate(&resolve_target(&source, target)),
                _ => true,
            }
        });
        before - self.root.children.len()
    }

    /// Añade una relación con un identificador libre y devuelve ese identificador.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let taken: Vec<String> = self.iter().map(|rel| rel.id).collect();
        let id = (1..)
            .map(|n| format!("rId{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| "rIdScrub".to_string());

        let mut entry = Element::new("Relationship");
        entry.namespace = Some(RELATIONSHIPS_NS.to_string());
        entry.attributes.insert("Id".to_string(), id.clone());
        entry
            .attributes
            .insert("Type".to_string(), rel_type.to_string());
        entry
            .attributes
            .insert("Target".to_string(), target.to_string());
        self.root.children.push(XMLNode::Element(entry));
        id
    }
}

/// Nombre de la parte de relaciones asociada a `part_name` (`""` para el paquete).
pub fn relationships_part_for(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if part_name.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{part_name}.rels"),
    }
}

/// Parte de origen de una parte de relaciones. `Some("")` designa el propio paquete.
pub fn source_part_of(rels_part: &str) -> Option<String> {
    let (dir, file) = match rels_part.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => return None,
    };
    let source_file = file.strip_suffix(".rels")?;
    let source_dir = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };
    Some(match (source_dir, source_file) {
        ("", file) => file.to_string(),
        (dir, file) => format!("{dir}/{file}"),
    })
}

pub fn is_relationships_part(part_name: &str) -> bool {
    part_name.ends_with(".rels") && source_part_of(part_name).is_some()
}

/// Resuelve un destino relativo a la carpeta de la parte de origen.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.split(['#', '?']).next().unwrap_or_default();
    let mut segments: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        source_part
            .rsplit_once('/')
            .map(|(dir, _)| dir.split('/').collect())
            .unwrap_or_default()
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Calcula el destino relativo que usaría `source_part` para apuntar a `target_part`.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = source_part
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}
