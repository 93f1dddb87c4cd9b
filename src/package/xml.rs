use std::io::Cursor;

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{Result, ScrubError};

/// Interpreta el contenido de una parte estructural (tipos de contenido, relaciones).
pub(crate) fn parse_part(part: &str, contents: &[u8]) -> Result<Element> {
    Element::parse(Cursor::new(contents)).map_err(|e| ScrubError::xml(part, e))
}

/// Serializa un elemento raíz con declaración XML y sin reindentar.
pub(crate) fn write_part(part: &str, root: &Element) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut config = EmitterConfig::new();
    config.perform_indent = false;
    config.write_document_declaration = true;
    root.write_with_config(&mut output, config)
        .map_err(|e| ScrubError::xml(part, e))?;
    Ok(output)
}

/// Hijos directos con el nombre local indicado.
pub(crate) fn child_elements<'a>(
    root: &'a Element,
    local_name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    root.children.iter().filter_map(move |node| match node {
        XMLNode::Element(child) if child.name == local_name => Some(child),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_parts_round_trip() {
        let root = parse_part(
            "_rels/.rels",
            br#"<Relationships xmlns="urn:test"><Relationship Id="rId1"/><Other/></Relationships>"#,
        )
        .expect("xml de prueba válido");
        assert_eq!(child_elements(&root, "Relationship").count(), 1);

        let text = String::from_utf8(write_part("_rels/.rels", &root).expect("serializa"))
            .expect("utf-8");
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("Id=\"rId1\""));
    }

    #[test]
    fn malformed_xml_is_reported_with_part_name() {
        let error = parse_part("[Content_Types].xml", b"<broken").unwrap_err();
        assert!(error.to_string().contains("[Content_Types].xml"));
    }
}
