//! @ai:module:intent Result file discovery, labelling and loading
//! @ai:module:layer domain
//! @ai:module:public_api DataFile, DataFileCollector, LayoutResolver, Labels

pub mod layout;
pub mod loader;

pub use layout::{Labels, LayoutResolver, DEFAULT_PATTERN};
pub use loader::{DataFile, DataFileCollector, DataFileCollectorTrait};
