// Vitrine - storefront homepage composition
// Admin-managed sections, resolved against the catalog and rendered into one page

pub mod catalog;
pub mod config;
pub mod error;
pub mod fragment;
pub mod section;

// Storage and data sources
pub mod http_catalog;
pub mod memory_catalog;
pub mod store;

// Composition
pub mod html;
pub mod pipeline;
pub mod placement;
pub mod registry;
mod renderers;
pub mod resolver;
pub mod scheduler;

pub use catalog::{Catalog, ProductQuery};
pub use config::{CatalogSource, Config, HomepageConfig, LazyMode};
pub use error::{CatalogError, Error, Result};
pub use fragment::{Behavior, Fragment, Node};
pub use http_catalog::HttpCatalog;
pub use memory_catalog::{CatalogFixture, MemoryCatalog};
pub use pipeline::{Composer, Composition, Document, Slot};
pub use placement::{place, InsertionPoint, Location};
pub use registry::{RenderContext, RendererRegistry};
pub use resolver::{ResolverOptions, SectionData, SectionResolver, Viewport};
pub use scheduler::{ImmediateTrigger, LazyScheduler, SignalTrigger, Trigger};
pub use section::{
    ReorderItem, Section, SectionConfig, SectionFilter, SectionPayload, SectionType,
};
pub use store::{SectionStore, SqlSectionStore};

pub use vitrine_cache;
