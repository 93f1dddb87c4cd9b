//! Limpieza por lotes de metadata personal en documentos Office (`.pptx`, `.docx`, `.xlsx`).

pub mod app;
pub mod cleaner;
pub mod discovery;
pub mod document;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod package;
pub mod properties;
pub mod ui;

#[cfg(test)]
mod test_support;
