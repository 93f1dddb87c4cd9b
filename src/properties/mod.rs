//! Partes de propiedades del paquete: core (`docProps/core.xml`) y extendidas (`docProps/app.xml`).

mod core_properties;
mod extended_properties;

pub use core_properties::{CoreField, CoreProperties};
pub use extended_properties::{ExtendedField, ExtendedProperties};
