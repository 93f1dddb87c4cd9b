//! Paquetes Office de prueba escritos con `zip::ZipWriter`.

use std::error::Error;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::document::DocumentKind;

pub(crate) type TestResult<T = ()> = Result<T, Box<dyn Error>>;

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Descripción de un documento de prueba. Los campos `None` no se escriben.
#[derive(Clone, Debug)]
pub(crate) struct SampleDocument {
    pub kind: DocumentKind,
    /// Valor crudo del indicador (`Some("")` en Word escribe el elemento sin `w:val`).
    pub flag: Option<&'static str>,
    pub author: Option<&'static str>,
    pub last_author: Option<&'static str>,
    pub comments: Option<&'static str>,
    pub company: Option<&'static str>,
    pub manager: Option<&'static str>,
    pub core: bool,
    pub app: bool,
    pub custom_properties: bool,
    pub custom_xml: bool,
    pub word_settings: bool,
}

impl SampleDocument {
    /// Documento con datos personales en todos los almacenes.
    pub fn personal(kind: DocumentKind) -> Self {
        Self {
            kind,
            flag: None,
            author: Some("Alice"),
            last_author: Some("Bob"),
            comments: Some("Borrador interno de Alice"),
            company: Some("Acme"),
            manager: Some("Carol"),
            core: true,
            app: true,
            custom_properties: true,
            custom_xml: true,
            word_settings: true,
        }
    }

    /// Documento sin propiedades de documento ni partes personalizadas.
    pub fn bare(kind: DocumentKind) -> Self {
        Self {
            kind,
            flag: None,
            author: None,
            last_author: None,
            comments: None,
            company: None,
            manager: None,
            core: false,
            app: false,
            custom_properties: false,
            custom_xml: false,
            word_settings: false,
        }
    }

    pub fn with_flag(mut self, value: &'static str) -> Self {
        self.flag = Some(value);
        self
    }

    pub fn write(&self, path: &Path) -> TestResult {
        write_zip(path, &self.parts())
    }

    /// Escribe el documento sustituyendo partes por nombre; las que no existen se
    /// insertan justo después de las relaciones del paquete.
    pub fn write_with(&self, path: &Path, replacements: &[(&str, &str)]) -> TestResult {
        let mut parts = self.parts();
        for (name, contents) in replacements {
            match parts.iter_mut().find(|(existing, _)| existing.as_str() == *name) {
                Some(part) => part.1 = contents.to_string(),
                None => parts.insert(2, (name.to_string(), contents.to_string())),
            }
        }
        write_zip(path, &parts)
    }

    fn parts(&self) -> Vec<(String, String)> {
        let mut parts: Vec<(String, String)> = Vec::new();
        parts.push(("[Content_Types].xml".to_string(), self.content_types()));
        parts.push(("_rels/.rels".to_string(), self.root_rels()));

        let (main_name, main_xml) = self.main_part();
        parts.push((main_name.to_string(), main_xml));
        parts.push((main_rels_name(self.kind).to_string(), self.main_rels()));
        parts.extend(self.body_parts());

        if self.core {
            parts.push(("docProps/core.xml".to_string(), self.core_xml()));
        }
        if self.app {
            parts.push(("docProps/app.xml".to_string(), self.app_xml()));
        }
        if self.custom_properties {
            parts.push(("docProps/custom.xml".to_string(), CUSTOM_XML.to_string()));
        }
        if self.custom_xml {
            parts.push(("customXml/item1.xml".to_string(), CUSTOM_ITEM.to_string()));
            parts.push(("customXml/itemProps1.xml".to_string(), CUSTOM_ITEM_PROPS.to_string()));
            parts.push((
                "customXml/_rels/item1.xml.rels".to_string(),
                CUSTOM_ITEM_RELS.to_string(),
            ));
        }
        parts
    }

    fn content_types(&self) -> String {
        let mut overrides = vec![(format!("/{}", self.main_part().0), main_content_type(self.kind))];
        match self.kind {
            DocumentKind::Slideshow => overrides.push((
                "/ppt/slides/slide1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
            )),
            DocumentKind::Spreadsheet => overrides.push((
                "/xl/worksheets/sheet1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
            )),
            DocumentKind::WordDoc if self.word_settings => overrides.push((
                "/word/settings.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml",
            )),
            DocumentKind::WordDoc => {}
        }
        if self.core {
            overrides.push((
                "/docProps/core.xml".to_string(),
                "application/vnd.openxmlformats-package.core-properties+xml",
            ));
        }
        if self.app {
            overrides.push((
                "/docProps/app.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.extended-properties+xml",
            ));
        }
        if self.custom_properties {
            overrides.push((
                "/docProps/custom.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.custom-properties+xml",
            ));
        }
        if self.custom_xml {
            overrides.push((
                "/customXml/itemProps1.xml".to_string(),
                "application/vnd.openxmlformats-officedocument.customXmlProperties+xml",
            ));
        }

        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Types xmlns=\"{CONTENT_TYPES_NS}\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Default Extension=\"png\" ContentType=\"image/png\"/>"
        );
        for (name, content_type) in overrides {
            xml.push_str(&format!(
                "<Override PartName=\"{name}\" ContentType=\"{content_type}\"/>"
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn root_rels(&self) -> String {
        let mut rels = vec![(
            format!("{REL_BASE}/officeDocument"),
            self.main_part().0.to_string(),
        )];
        if self.core {
            rels.push((
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                    .to_string(),
                "docProps/core.xml".to_string(),
            ));
        }
        if self.app {
            rels.push((
                format!("{REL_BASE}/extended-properties"),
                "docProps/app.xml".to_string(),
            ));
        }
        if self.custom_properties {
            rels.push((
                format!("{REL_BASE}/custom-properties"),
                "docProps/custom.xml".to_string(),
            ));
        }
        relationships_xml(&rels)
    }

    fn main_rels(&self) -> String {
        let mut rels = Vec::new();
        match self.kind {
            DocumentKind::Slideshow => {
                rels.push((format!("{REL_BASE}/slide"), "slides/slide1.xml".to_string()))
            }
            DocumentKind::Spreadsheet => rels.push((
                format!("{REL_BASE}/worksheet"),
                "worksheets/sheet1.xml".to_string(),
            )),
            DocumentKind::WordDoc if self.word_settings => {
                rels.push((format!("{REL_BASE}/settings"), "settings.xml".to_string()))
            }
            DocumentKind::WordDoc => {}
        }
        rels.push((
            format!("{REL_BASE}/hyperlink"),
            "https://example.com/customXml/item1.xml".to_string(),
        ));
        if self.custom_xml {
            rels.push((
                format!("{REL_BASE}/customXml"),
                "../customXml/item1.xml".to_string(),
            ));
        }
        relationships_xml(&rels)
    }

    fn main_part(&self) -> (&'static str, String) {
        match self.kind {
            DocumentKind::Slideshow => {
                let attribute = self
                    .flag
                    .map(|value| format!(" removePersonalInfoOnSave=\"{value}\""))
                    .unwrap_or_default();
                (
                    "ppt/presentation.xml",
                    format!(
                        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" xmlns:r=\"{R_NS}\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" saveSubsetFonts=\"1\"{attribute}>\
<p:sldIdLst><p:sldId id=\"256\" r:id=\"rId1\"/></p:sldIdLst>\
<p:sldSz cx=\"12192000\" cy=\"6858000\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/></p:presentation>"
                    ),
                )
            }
            DocumentKind::Spreadsheet => {
                let attribute = self
                    .flag
                    .map(|value| format!(" filterPrivacy=\"{value}\""))
                    .unwrap_or_default();
                (
                    "xl/workbook.xml",
                    format!(
                        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" xmlns:r=\"{R_NS}\">\
<fileVersion appName=\"xl\" lastEdited=\"7\"/><workbookPr{attribute} defaultThemeVersion=\"166925\"/>\
<sheets><sheet name=\"Hoja1\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>"
                    ),
                )
            }
            DocumentKind::WordDoc => (
                "word/document.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" xmlns:r=\"{R_NS}\">\
<w:body><w:p><w:r><w:t>Documento de prueba</w:t></w:r></w:p></w:body></w:document>"
                ),
            ),
        }
    }

    fn body_parts(&self) -> Vec<(String, String)> {
        match self.kind {
            DocumentKind::Slideshow => vec![(
                "ppt/slides/slide1.xml".to_string(),
                "<p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld/></p:sld>"
                    .to_string(),
            )],
            DocumentKind::Spreadsheet => vec![(
                "xl/worksheets/sheet1.xml".to_string(),
                "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData/></worksheet>"
                    .to_string(),
            )],
            DocumentKind::WordDoc if self.word_settings => {
                let flag = match self.flag {
                    Some("") => "<w:removePersonalInformation/>".to_string(),
                    Some(value) => format!("<w:removePersonalInformation w:val=\"{value}\"/>"),
                    None => String::new(),
                };
                vec![(
                    "word/settings.xml".to_string(),
                    format!(
                        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<w:settings xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:zoom w:percent=\"100\"/>{flag}<w:defaultTabStop w:val=\"708\"/></w:settings>"
                    ),
                )]
            }
            DocumentKind::WordDoc => Vec::new(),
        }
    }

    fn core_xml(&self) -> String {
        let mut fields = String::new();
        if let Some(author) = self.author {
            fields.push_str(&format!("<dc:creator>{author}</dc:creator>"));
        }
        if let Some(last) = self.last_author {
            fields.push_str(&format!("<cp:lastModifiedBy>{last}</cp:lastModifiedBy>"));
        }
        if let Some(comments) = self.comments {
            fields.push_str(&format!("<dc:description>{comments}</dc:description>"));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
<dc:title>Plan trimestral</dc:title>{fields}<cp:revision>3</cp:revision>\
<dcterms:created xsi:type=\"dcterms:W3CDTF\">2024-01-01T00:00:00Z</dcterms:created>\
</cp:coreProperties>"
        )
    }

    fn app_xml(&self) -> String {
        let mut fields = String::new();
        if let Some(manager) = self.manager {
            fields.push_str(&format!("<Manager>{manager}</Manager>"));
        }
        if let Some(company) = self.company {
            fields.push_str(&format!("<Company>{company}</Company>"));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">\
<Application>Microsoft Office</Application>{fields}<AppVersion>16.0000</AppVersion></Properties>"
        )
    }
}

const CUSTOM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="Reviewer"><vt:lpwstr>Dave</vt:lpwstr></property></Properties>"#;

const CUSTOM_ITEM: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<b:Sources xmlns:b="http://schemas.openxmlformats.org/officeDocument/2006/bibliography" SelectedStyle="/APA.XSL"><b:Source><b:Author>Alice</b:Author></b:Source></b:Sources>"#;

const CUSTOM_ITEM_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<ds:datastoreItem ds:itemID="{6A8E6B52-3C0F-4D6B-9E4F-2F1B5E3A7C11}" xmlns:ds="http://schemas.openxmlformats.org/officeDocument/2006/customXml"><ds:schemaRefs/></ds:datastoreItem>"#;

const CUSTOM_ITEM_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXmlProps" Target="itemProps1.xml"/></Relationships>"#;

fn main_content_type(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Slideshow => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"
        }
        DocumentKind::WordDoc => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
        }
        DocumentKind::Spreadsheet => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"
        }
    }
}

fn main_rels_name(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Slideshow => "ppt/_rels/presentation.xml.rels",
        DocumentKind::WordDoc => "word/_rels/document.xml.rels",
        DocumentKind::Spreadsheet => "xl/_rels/workbook.xml.rels",
    }
}

fn relationships_xml(rels: &[(String, String)]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"{RELS_NS}\">"
    );
    for (index, (rel_type, target)) in rels.iter().enumerate() {
        let mode = if target.starts_with("https://") {
            " TargetMode=\"External\""
        } else {
            ""
        };
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{rel_type}\" Target=\"{target}\"{mode}/>",
            index + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn write_zip(path: &Path, parts: &[(String, String)]) -> TestResult {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in parts {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(contents.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

/// Contenido de una parte del archivo en disco, o `None` si no existe.
pub(crate) fn read_part(path: &Path, name: &str) -> TestResult<Option<String>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    };
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

pub(crate) fn part_names(path: &Path) -> TestResult<Vec<String>> {
    let archive = ZipArchive::new(File::open(path)?)?;
    Ok(archive.file_names().map(str::to_string).collect())
}
