// File: src/registry.rs
// Purpose: Section Renderer Registry, section type -> render function

use crate::config::HomepageConfig;
use crate::error::{Error, Result};
use crate::fragment::Fragment;
use crate::renderers;
use crate::resolver::{SectionData, Viewport};
use crate::section::{Section, SectionType};
use std::collections::HashMap;
use tracing::debug;

/// Read-only inputs shared by every renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Used whenever an entity has no image of its own
    pub placeholder_image: String,
    pub viewport: Viewport,
}

impl RenderContext {
    pub fn new(config: &HomepageConfig, viewport: Viewport) -> Self {
        Self {
            placeholder_image: config.placeholder_image.clone(),
            viewport,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext::new(&HomepageConfig::default(), Viewport::Desktop)
    }
}

/// A renderer turns a section and its resolved data into a fragment.
/// `Ok(None)` means there is nothing to show and is not an error.
pub type RenderFn = fn(&Section, &SectionData, &RenderContext) -> Result<Option<Fragment>>;

#[derive(Clone)]
pub struct RendererRegistry {
    renderers: HashMap<SectionType, RenderFn>,
}

impl RendererRegistry {
    /// A registry with no renderers
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// A registry with the built-in renderer for every section type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        renderers::register_defaults(&mut registry);
        registry
    }

    /// Register (or replace) the renderer for a type
    pub fn register(&mut self, kind: SectionType, render: RenderFn) -> &mut Self {
        self.renderers.insert(kind, render);
        self
    }

    pub fn contains(&self, kind: SectionType) -> bool {
        self.renderers.contains_key(&kind)
    }

    pub fn render(&self, section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
        let kind = section.section_type();
        let render = self
            .renderers
            .get(&kind)
            .ok_or_else(|| Error::resolution(&section.id, format!("no renderer registered for {}", kind)))?;

        let fragment = render(section, data, ctx)?;
        if fragment.is_none() {
            debug!(section_id = %section.id, %kind, "renderer produced nothing");
        }
        Ok(fragment)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}
