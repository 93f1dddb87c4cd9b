//! Edición sin pérdidas de partes XML de contenido.
//!
//! Las partes principales (`presentation.xml`, `workbook.xml`, `settings.xml`) y las de
//! propiedades usan atributos con prefijo (`r:id`, `w:val`, `xsi:type`). Este editor
//! conserva los eventos originales y sólo reconstruye los elementos que cambian.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, ScrubError};

/// Describe la información necesaria para localizar un hijo directo de la raíz.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldSpec<'a> {
    pub(crate) prefix: Option<&'a str>,
    pub(crate) local_name: &'a str,
    pub(crate) namespace: Option<&'a str>,
}

impl<'a> FieldSpec<'a> {
    pub(crate) const fn new(
        prefix: Option<&'a str>,
        local_name: &'a str,
        namespace: Option<&'a str>,
    ) -> Self {
        Self {
            prefix,
            local_name,
            namespace,
        }
    }
}

/// Rango de eventos ocupado por un elemento (`end` inclusivo).
#[derive(Clone, Copy, Debug)]
struct Span {
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct XmlPart {
    name: String,
    events: Vec<Event<'static>>,
}

impl XmlPart {
    pub(crate) fn parse(name: &str, contents: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(contents);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut events = Vec::new();
        let mut depth = 0_usize;
        let mut roots = 0_usize;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| ScrubError::xml(name, e))?;
            match &event {
                Event::Eof => break,
                Event::Start(_) => {
                    if depth == 0 {
                        roots += 1;
                    }
                    depth += 1;
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Empty(_) if depth == 0 => roots += 1,
                _ => {}
            }
            events.push(event.into_owned());
            buf.clear();
        }

        if roots != 1 || depth != 0 {
            return Err(ScrubError::xml(
                name,
                "se esperaba exactamente un elemento raíz completo",
            ));
        }

        Ok(Self {
            name: name.to_string(),
            events,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| ScrubError::xml(&self.name, e))?;
        }
        Ok(writer.into_inner())
    }

    /// Valor de un atributo del elemento raíz.
    pub(crate) fn root_attribute(&self, key: &str) -> Option<String> {
        attribute_value(self.root_start()?, key)
    }

    /// Fija un atributo del elemento raíz. Devuelve `true` si el documento cambió.
    pub(crate) fn set_root_attribute(&mut self, key: &str, value: &str) -> bool {
        let Some(root) = self.root_span() else {
            return false;
        };
        self.set_attribute_at(root.start, key, value)
    }

    /// Texto de un hijo directo de la raíz, o `None` si el hijo no existe.
    pub(crate) fn child_text(&self, spec: &FieldSpec<'_>) -> Option<String> {
        self.find_child(spec).map(|span| self.text_of(span))
    }

    /// Valor de un atributo de un hijo directo, comparando por nombre local.
    pub(crate) fn child_attribute(&self, spec: &FieldSpec<'_>, local_key: &str) -> Option<String> {
        let span = self.find_child(spec)?;
        let start = self.start_at(span.start)?;
        start
            .attributes()
            .with_checks(false)
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == local_key.as_bytes())
            .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
    }

    pub(crate) fn has_child(&self, spec: &FieldSpec<'_>) -> bool {
        self.find_child(spec).is_some()
    }

    /// Inserta o sustituye el texto de un hijo directo, creándolo al final si falta.
    pub(crate) fn set_child_text(&mut self, spec: FieldSpec<'_>, value: &str) -> bool {
        if let Some(span) = self.find_child(&spec) {
            if self.text_of(span) == value {
                return false;
            }
            let Some(start) = self.start_at(span.start).cloned() else {
                return false;
            };
            let replacement = element_with_text(start, value);
            self.events.splice(span.start..=span.end, replacement);
            return true;
        }

        let Some(start) = self.new_child_start(spec) else {
            return false;
        };
        let position = self.append_position();
        self.insert_at(position, element_with_text(start, value))
    }

    /// Fija un atributo en un hijo directo; si el hijo falta se crea vacío tras el último
    /// hermano cuyo nombre local aparece en `insert_after` (o como primer hijo).
    pub(crate) fn set_child_attribute(
        &mut self,
        spec: FieldSpec<'_>,
        key: &str,
        value: &str,
        insert_after: &[&str],
    ) -> bool {
        if let Some(span) = self.find_child(&spec) {
            return self.set_attribute_at(span.start, key, value);
        }

        let Some(mut start) = self.new_child_start(spec) else {
            return false;
        };
        start.push_attribute((key, value));
        self.insert_child(Event::Empty(start), insert_after)
    }

    /// Inserta un hijo vacío en la posición que marca `insert_after`.
    pub(crate) fn insert_empty_child(&mut self, spec: FieldSpec<'_>, insert_after: &[&str]) -> bool {
        let Some(start) = self.new_child_start(spec) else {
            return false;
        };
        self.insert_child(Event::Empty(start), insert_after)
    }

    /// Elimina todos los hijos directos que coinciden. Devuelve `true` si quitó alguno.
    pub(crate) fn remove_child(&mut self, spec: &FieldSpec<'_>) -> bool {
        let matching: Vec<Span> = self
            .children()
            .into_iter()
            .filter(|span| self.matches(*span, spec))
            .collect();
        for span in matching.iter().rev() {
            self.events.drain(span.start..=span.end);
        }
        !matching.is_empty()
    }

    fn root_span(&self) -> Option<Span> {
        let start = self
            .events
            .iter()
            .position(|event| matches!(event, Event::Start(_) | Event::Empty(_)))?;
        if matches!(self.events[start], Event::Empty(_)) {
            return Some(Span { start, end: start });
        }
        let end = self.closing_index(start)?;
        Some(Span { start, end })
    }

    fn root_start(&self) -> Option<&BytesStart<'static>> {
        self.start_at(self.root_span()?.start)
    }

    fn start_at(&self, index: usize) -> Option<&BytesStart<'static>> {
        match self.events.get(index)? {
            Event::Start(start) | Event::Empty(start) => Some(start),
            _ => None,
        }
    }

    fn closing_index(&self, start: usize) -> Option<usize> {
        let mut depth = 0_usize;
        for (index, event) in self.events.iter().enumerate().skip(start) {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn children(&self) -> Vec<Span> {
        let Some(root) = self.root_span() else {
            return Vec::new();
        };
        let mut spans = Vec::new();
        let mut index = root.start + 1;
        while index < root.end {
            match self.events[index] {
                Event::Start(_) => {
                    let end = self.closing_index(index).unwrap_or(root.end - 1);
                    spans.push(Span { start: index, end });
                    index = end + 1;
                }
                Event::Empty(_) => {
                    spans.push(Span {
                        start: index,
                        end: index,
                    });
                    index += 1;
                }
                _ => index += 1,
            }
        }
        spans
    }

    fn find_child(&self, spec: &FieldSpec<'_>) -> Option<Span> {
        self.children()
            .into_iter()
            .find(|span| self.matches(*span, spec))
    }

    fn matches(&self, span: Span, spec: &FieldSpec<'_>) -> bool {
        let Some(start) = self.start_at(span.start) else {
            return false;
        };
        if start.name().local_name().as_ref() != spec.local_name.as_bytes() {
            return false;
        }
        match spec.namespace {
            Some(expected) => self.namespace_of(start).as_deref() == Some(expected),
            None => true,
        }
    }

    /// Resuelve el espacio de nombres de un hijo con sus declaraciones y las de la raíz.
    fn namespace_of(&self, element: &BytesStart<'_>) -> Option<String> {
        let prefix = element
            .name()
            .prefix()
            .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned());
        declared_namespace(element, prefix.as_deref()).or_else(|| {
            self.root_start()
                .and_then(|root| declared_namespace(root, prefix.as_deref()))
        })
    }

    /// Construye la etiqueta de un hijo nuevo reutilizando el prefijo ya declarado en la raíz.
    fn new_child_start(&self, spec: FieldSpec<'_>) -> Option<BytesStart<'static>> {
        let root = self.root_start()?;
        let Some(namespace) = spec.namespace else {
            return Some(BytesStart::new(spec.local_name.to_string()));
        };

        let declarations = namespace_declarations(root);
        if let Some((prefix, _)) = declarations.iter().find(|(_, uri)| uri == namespace) {
            let name = match prefix {
                Some(prefix) => format!("{prefix}:{}", spec.local_name),
                None => spec.local_name.to_string(),
            };
            return Some(BytesStart::new(name));
        }

        let (name, declaration) = match spec.prefix {
            Some(prefix) => (
                format!("{prefix}:{}", spec.local_name),
                format!("xmlns:{prefix}"),
            ),
            None => (spec.local_name.to_string(), "xmlns".to_string()),
        };
        let mut start = BytesStart::new(name);
        start.push_attribute((declaration.as_str(), namespace));
        Some(start)
    }

    fn insert_child(&mut self, event: Event<'static>, insert_after: &[&str]) -> bool {
        let Some(root) = self.root_span() else {
            return false;
        };
        let anchor = self
            .children()
            .into_iter()
            .filter(|span| {
                self.start_at(span.start).is_some_and(|start| {
                    insert_after
                        .iter()
                        .any(|name| start.name().local_name().as_ref() == name.as_bytes())
                })
            })
            .last();

        let position = match anchor {
            Some(span) => span.end + 1,
            None => root.start + 1,
        };
        self.insert_at(position, vec![event])
    }

    fn append_position(&self) -> usize {
        match self.root_span() {
            Some(root) if root.start == root.end => root.start + 1,
            Some(root) => root.end,
            None => self.events.len(),
        }
    }

    /// Inserta eventos dentro de la raíz, abriéndola si era un elemento vacío.
    fn insert_at(&mut self, position: usize, new_events: Vec<Event<'static>>) -> bool {
        let Some(root) = self.root_span() else {
            return false;
        };
        let mut position = position;
        if root.start == root.end {
            let Some(start) = self.start_at(root.start).cloned() else {
                return false;
            };
            let end = start.to_end().into_owned();
            self.events[root.start] = Event::Start(start);
            self.events.insert(root.start + 1, Event::End(end));
            position = root.start + 1;
        }
        self.events.splice(position..position, new_events);
        true
    }

    fn set_attribute_at(&mut self, index: usize, key: &str, value: &str) -> bool {
        let Some(start) = self.start_at(index) else {
            return false;
        };
        if attribute_value(start, key).as_deref() == Some(value) {
            return false;
        }
        let patched = with_attribute(start, key, value);
        self.events[index] = match self.events[index] {
            Event::Empty(_) => Event::Empty(patched),
            _ => Event::Start(patched),
        };
        true
    }

    fn text_of(&self, span: Span) -> String {
        let mut content = String::new();
        for event in &self.events[span.start..=span.end] {
            match event {
                Event::Text(text) => match text.unescape() {
                    Ok(unescaped) => content.push_str(&unescaped),
                    Err(_) => content.push_str(&String::from_utf8_lossy(text)),
                },
                Event::CData(data) => content.push_str(&String::from_utf8_lossy(data)),
                _ => {}
            }
        }
        content.trim().to_string()
    }
}

fn element_with_text(start: BytesStart<'static>, value: &str) -> Vec<Event<'static>> {
    if value.is_empty() {
        return vec![Event::Empty(start)];
    }
    let end = start.to_end().into_owned();
    vec![
        Event::Start(start),
        Event::Text(BytesText::new(value).into_owned()),
        Event::End(end),
    ]
}

fn attribute_value(start: &BytesStart<'_>, key: &str) -> Option<String> {
    start
        .attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref() == key.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
}

fn with_attribute(start: &BytesStart<'_>, key: &str, value: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut patched = BytesStart::new(name);
    let mut replaced = false;
    for attr in start.attributes().with_checks(false).flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            patched.push_attribute((key, value));
            replaced = true;
        } else {
            patched.push_attribute((attr.key.as_ref(), attr.value.as_ref()));
        }
    }
    if !replaced {
        patched.push_attribute((key, value));
    }
    patched
}

fn namespace_declarations(start: &BytesStart<'_>) -> Vec<(Option<String>, String)> {
    start
        .attributes()
        .with_checks(false)
        .flatten()
        .filter_map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let uri = attr.unescape_value().ok()?.into_owned();
            if key == "xmlns" {
                Some((None, uri))
            } else {
                key.strip_prefix("xmlns:")
                    .map(|prefix| (Some(prefix.to_string()), uri))
            }
        })
        .collect()
}

fn declared_namespace(start: &BytesStart<'_>, prefix: Option<&str>) -> Option<String> {
    namespace_declarations(start)
        .into_iter()
        .find(|(declared, _)| declared.as_deref() == prefix)
        .map(|(_, uri)| uri)
}
