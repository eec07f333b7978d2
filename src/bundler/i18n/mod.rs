//! Localization support.
//!
//! - `locale` - the closed table of supported installer locales
//! - `properties` - reader for key/value translation files
//! - `resource` - localized resource entries and list helpers
//! - `wxl` - WiX localization document rendering
//! - `cache` - content-addressed cache of generated documents

mod cache;
mod locale;
mod properties;
mod resource;
mod wxl;

pub use cache::LocalizationCache;
pub use locale::{LocaleDescriptor, SUPPORTED_LOCALES, fallback_locale, resolve_locale};
pub use properties::parse as parse_properties;
pub use resource::{
    ConfigureResource, LocalizedResource, ResourceSpec, add_localized_resource, find_by_locale,
};
pub use wxl::{escape_xml, render as render_wxl};
