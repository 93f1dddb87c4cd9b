//! Lectura y reescritura de `[Content_Types].xml`.

use xmltree::{Element, XMLNode};

use crate::error::Result;

use super::constants::{CONTENT_TYPES_NS, CONTENT_TYPES_PART};
use super::xml::{child_elements, parse_part, write_part};

/// Tabla de tipos de contenido del paquete: valores por extensión y sustituciones por parte.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    root: Element,
}

impl ContentTypes {
    pub fn parse(contents: &[u8]) -> Result<Self> {
        Ok(Self {
            root: parse_part(CONTENT_TYPES_PART, contents)?,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        write_part(CONTENT_TYPES_PART, &self.root)
    }

    /// Resuelve el tipo de contenido de una parte (nombre sin barra inicial).
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        let absolute = absolute_name(part_name);
        let overridden = self.entries("Override").find_map(|entry| {
            let name = entry.attributes.get("PartName")?;
            name.eq_ignore_ascii_case(&absolute)
                .then(|| entry.attributes.get("ContentType"))
                .flatten()
        });
        if let Some(content_type) = overridden {
            return Some(content_type.as_str());
        }

        let extension = part_name.rsplit_once('.').map(|(_, ext)| ext)?;
        self.entries("Default").find_map(|entry| {
            let declared = entry.attributes.get("Extension")?;
            declared
                .eq_ignore_ascii_case(extension)
                .then(|| entry.attributes.get("ContentType"))
                .flatten()
                .map(String::as_str)
        })
    }

    /// Elimina la sustitución de una parte. Devuelve `true` si existía.
    pub fn remove_override(&mut self, part_name: &str) -> bool {
        let absolute = absolute_name(part_name);
        let before = self.root.children.len();
        self.root.children.retain(|node| match node {
            XMLNode::Element(entry) if entry.name == "Override" => entry
                .attributes
                .get("PartName")
                .is_none_or(|name| !name.eq_ignore_ascii_case(&absolute)),
            _ => true,
        });
        self.root.children.len() != before
    }

    /// Declara el tipo de contenido de una parte nueva.
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        self.remove_override(part_name);
        let mut entry = Element::new("Override");
        entry.namespace = Some(CONTENT_TYPES_NS.to_string());
        entry
            .attributes
            .insert("PartName".to_string(), absolute_name(part_name));
        entry
            .attributes
            .insert("ContentType".to_string(), content_type.to_string());
        self.root.children.push(XMLNode::Element(entry));
    }

    fn entries<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        child_elements(&self.root, local_name)
    }
}

fn absolute_name(part_name: &str) -> String {
    format!("/{}", part_name.trim_start_matches('/'))
}

/// Indica si un tipo de contenido corresponde a un documento XML.
pub fn is_xml_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/xml" || essence == "text/xml" || essence.ends_with("+xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="XML" ContentType="application/xml"/>
    <Override PartName="/docProps/custom.xml" ContentType="application/vnd.openxmlformats-officedocument.custom-properties+xml"/>
</Types>
"#;

    #[test]
    fn overrides_win_over_extension_defaults() {
        let types = ContentTypes::parse(TYPES.as_bytes()).expect("tipos válidos");
        assert_eq!(
            types.content_type_of("docProps/custom.xml"),
            Some("application/vnd.openxmlformats-officedocument.custom-properties+xml")
        );
        assert_eq!(
            types.content_type_of("customXml/item1.xml"),
            Some("application/xml")
        );
        assert_eq!(types.content_type_of("media/image1.png"), None);
    }

    #[test]
    fn override_can_be_removed_and_added() {
        let mut types = ContentTypes::parse(TYPES.as_bytes()).expect("tipos válidos");
        assert!(types.remove_override("docProps/custom.xml"));
        assert!(!types.remove_override("docProps/custom.xml"));
        assert_eq!(
            types.content_type_of("docProps/custom.xml"),
            Some("application/xml")
        );

        types.add_override("word/settings.xml", "application/test+xml");
        let reparsed = ContentTypes::parse(&types.to_bytes().expect("serializa")).expect("reparsea");
        assert_eq!(
            reparsed.content_type_of("word/settings.xml"),
            Some("application/test+xml")
        );
    }

    #[test]
    fn xml_family_detection() {
        assert!(is_xml_content_type("application/xml"));
        assert!(is_xml_content_type("text/xml; charset=utf-8"));
        assert!(is_xml_content_type(
            "application/vnd.openxmlformats-officedocument.customXmlProperties+xml"
        ));
        assert!(!is_xml_content_type("image/png"));
    }
}
