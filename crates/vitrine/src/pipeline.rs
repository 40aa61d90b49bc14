// File: src/pipeline.rs
// Purpose: Composition Pipeline. Builds the homepage document from stored sections.
//
// Fetching -> Sorted -> Partitioned -> Critical rendering -> Lazy scheduling
// -> Banner placement -> Done. Only the section list fetch can end the build
// early (NoContent); every per-section failure stays in that section.

use crate::catalog::Banner;
use crate::config::HomepageConfig;
use crate::error::Error;
use crate::fragment::Fragment;
use crate::placement::{place, FlowEntry};
use crate::registry::{RenderContext, RendererRegistry};
use crate::resolver::{SectionResolver, Viewport};
use crate::scheduler::LazyScheduler;
use crate::section::{
    sort_sections, BannerConfig, Section, SectionConfig, SectionFilter, SectionType,
};
use crate::store::SectionStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// ============================================================================
// DOCUMENT MODEL
// ============================================================================

/// A section whose content loads later
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub section_id: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub name: String,
}

/// One position in the composed document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "slot", rename_all = "camelCase")]
pub enum Slot {
    Rendered(Fragment),
    Placeholder(Placeholder),
    /// Two banners that were adjacent in the sorted list
    Stacked { top: Box<Slot>, bottom: Box<Slot> },
    /// A section that failed to render, shown as a small inline notice
    #[serde(rename_all = "camelCase")]
    Error {
        section_id: String,
        #[serde(rename = "type")]
        kind: SectionType,
        name: String,
        message: String,
    },
}

impl Slot {
    pub fn section_id(&self) -> &str {
        match self {
            Slot::Rendered(f) => &f.section_id,
            Slot::Placeholder(p) => &p.section_id,
            Slot::Stacked { top, .. } => top.section_id(),
            Slot::Error { section_id, .. } => section_id,
        }
    }

    pub fn kind(&self) -> SectionType {
        match self {
            Slot::Rendered(f) => f.kind,
            Slot::Placeholder(p) => p.kind,
            Slot::Stacked { top, .. } => top.kind(),
            Slot::Error { kind, .. } => *kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Slot::Rendered(f) => &f.name,
            Slot::Placeholder(p) => &p.name,
            Slot::Stacked { top, .. } => top.name(),
            Slot::Error { name, .. } => name,
        }
    }

    pub fn entry(&self) -> FlowEntry<'_> {
        FlowEntry {
            id: self.section_id(),
            name: self.name(),
            kind: self.kind(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder(_))
    }
}

/// The composed homepage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Rendered before the page header, outside the section flow
    pub pre_header: Vec<Slot>,
    pub body: Vec<Slot>,
    /// Sections behind the placeholders, by id
    #[serde(skip)]
    pending: HashMap<String, Section>,
}

impl Document {
    /// Ids of unresolved placeholders, in document order
    pub fn placeholder_ids(&self) -> Vec<String> {
        self.body
            .iter()
            .filter(|s| s.is_placeholder())
            .map(|s| s.section_id().to_string())
            .collect()
    }

    /// Replace the placeholder for `section_id`. `None` removes it.
    pub fn fill(&mut self, section_id: &str, slot: Option<Slot>) -> bool {
        let Some(index) = self
            .body
            .iter()
            .position(|s| s.is_placeholder() && s.section_id() == section_id)
        else {
            return false;
        };

        match slot {
            Some(slot) => self.body[index] = slot,
            None => {
                self.body.remove(index);
            }
        }
        self.pending.remove(section_id);
        true
    }

    /// Ids of every top-level slot, stacks expanded
    pub fn section_ids(&self) -> Vec<&str> {
        fn collect<'a>(slot: &'a Slot, out: &mut Vec<&'a str>) {
            match slot {
                Slot::Stacked { top, bottom } => {
                    collect(top, out);
                    collect(bottom, out);
                }
                other => out.push(other.section_id()),
            }
        }

        let mut ids = Vec::new();
        for slot in self.pre_header.iter().chain(self.body.iter()) {
            collect(slot, &mut ids);
        }
        ids
    }
}

/// Outcome of a build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Composition {
    Done(Document),
    /// Nothing to show: no visible sections, or the list could not be fetched
    NoContent { reason: String },
}

impl Composition {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Composition::Done(doc) => Some(doc),
            Composition::NoContent { .. } => None,
        }
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Index of the lowest-ordering ticker in a sorted list
pub fn pre_header_index(sorted: &[Section]) -> Option<usize> {
    sorted
        .iter()
        .position(|s| s.section_type() == SectionType::ScrollingText)
}

/// Banners to place: one or two adjacent banners plus the location they go to
#[derive(Debug, Clone, PartialEq)]
pub struct BannerUnit {
    pub banners: Vec<Section>,
    pub location: String,
    /// Flow sections preceding a banner with no location of its own, nearest first
    pub anchors: Vec<String>,
}

impl BannerUnit {
    /// Location against what actually rendered. An anchored unit goes after
    /// the nearest preceding flow section still in the body, else to the top.
    pub fn location_in(&self, body: &[Slot]) -> String {
        if self.anchors.is_empty() {
            return self.location.clone();
        }
        self.anchors
            .iter()
            .find(|id| body.iter().any(|slot| slot.section_id() == id.as_str()))
            .map(|id| format!("after-section-{}", id))
            .unwrap_or_else(|| "top".to_string())
    }
}

/// Split a sorted list into flow sections and banner units.
///
/// Adjacent banners are paired in order (a run of three gives a pair and a
/// single). A banner without its own location keeps its sorted position by
/// anchoring after the closest preceding flow section, or at the top.
pub fn partition(sorted: &[Section], skip: Option<usize>) -> (Vec<Section>, Vec<BannerUnit>) {
    let mut flow = Vec::new();
    let mut units = Vec::new();
    let mut preceding: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < sorted.len() {
        let section = &sorted[i];
        if Some(i) == skip {
            i += 1;
            continue;
        }

        if !section.section_type().is_banner() {
            preceding.push(section.id.as_str());
            flow.push(section.clone());
            i += 1;
            continue;
        }

        let mut banners = vec![section.clone()];
        let next = i + 1;
        if next < sorted.len() && Some(next) != skip && sorted[next].section_type().is_banner() {
            banners.push(sorted[next].clone());
            i += 2;
        } else {
            i += 1;
        }

        let (location, anchors) = match section.config.banner_location() {
            Some(location) => (location.to_string(), Vec::new()),
            None => {
                let location = match preceding.last() {
                    Some(id) => format!("after-section-{}", id),
                    None => "top".to_string(),
                };
                (location, preceding.iter().rev().map(|id| id.to_string()).collect())
            }
        };
        units.push(BannerUnit {
            banners,
            location,
            anchors,
        });
    }

    (flow, units)
}

/// Section view of a record from the legacy banner collection
pub fn legacy_banner_section(banner: &Banner, position: &str, now: DateTime<Utc>) -> Section {
    Section {
        id: format!("banner-{}", banner.id),
        name: banner.title.clone().unwrap_or_else(|| format!("Banner {}", banner.id)),
        title: None,
        subtitle: None,
        description: None,
        config: SectionConfig::BannerFullWidth(BannerConfig {
            banner_id: Some(banner.id.clone()),
            image_url: Some(banner.image_url.clone()),
            mobile_image_url: banner.mobile_image_url.clone(),
            link: banner.link.clone(),
            alt: banner.title.clone(),
            location: Some(position.to_string()),
        }),
        ordering: i64::MAX,
        is_active: true,
        is_published: true,
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Composer {
    store: Arc<dyn SectionStore>,
    resolver: SectionResolver,
    registry: RendererRegistry,
    config: HomepageConfig,
}

impl Composer {
    pub fn new(
        store: Arc<dyn SectionStore>,
        resolver: SectionResolver,
        registry: RendererRegistry,
        config: HomepageConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            registry,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn SectionStore> {
        &self.store
    }

    pub fn resolver(&self) -> &SectionResolver {
        &self.resolver
    }

    pub fn config(&self) -> &HomepageConfig {
        &self.config
    }

    fn is_critical(&self, section: &Section) -> bool {
        if section.section_type().is_banner() {
            section.ordering <= self.config.critical_banner_max_ordering
        } else {
            self.config.critical_types.contains(&section.section_type())
        }
    }

    fn placeholder(section: &Section) -> Slot {
        Slot::Placeholder(Placeholder {
            section_id: section.id.clone(),
            kind: section.section_type(),
            name: section.name.clone(),
        })
    }

    /// Resolve and render one section. `None` means skip it.
    pub async fn render_section(&self, section: &Section, viewport: Viewport) -> Option<Slot> {
        let data = self.resolver.resolve_data(section, viewport).await?;
        let ctx = RenderContext::new(&self.config, viewport);

        match self.registry.render(section, &data, &ctx) {
            Ok(Some(fragment)) => Some(Slot::Rendered(fragment)),
            Ok(None) => None,
            Err(e) => {
                error!(section_id = %section.id, kind = %section.section_type(), error = %e, "section failed to render");
                self.config.show_errors.then(|| Slot::Error {
                    section_id: section.id.clone(),
                    kind: section.section_type(),
                    name: section.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Build the homepage. Lazy sections are left as placeholders.
    pub async fn compose(&self, viewport: Viewport) -> Composition {
        // Fetching sections -> Sorted
        let mut sections = match self.store.list_sections(&SectionFilter::public()).await {
            Ok(sections) => sections,
            Err(e) => {
                let abort = Error::PipelineAbort(e.to_string());
                error!(error = %abort, "nothing to compose");
                return Composition::NoContent {
                    reason: abort.to_string(),
                };
            }
        };
        // The store filters already; visibility is checked again here
        sections.retain(Section::is_visible);
        if sections.is_empty() {
            info!("no visible sections");
            return Composition::NoContent {
                reason: "no sections to show".to_string(),
            };
        }
        sort_sections(&mut sections);

        // Sorted -> Partitioned
        let ticker = pre_header_index(&sections);
        let (flow, units) = partition(&sections, ticker);

        // Critical rendering, strictly in order
        let mut doc = Document::default();
        if let Some(index) = ticker {
            if let Some(slot) = self.render_section(&sections[index], viewport).await {
                doc.pre_header.push(slot);
            }
        }

        for section in &flow {
            if self.is_critical(section) {
                if let Some(slot) = self.render_section(section, viewport).await {
                    doc.body.push(slot);
                }
            } else {
                doc.body.push(Self::placeholder(section));
                doc.pending.insert(section.id.clone(), section.clone());
            }
        }

        // Banner placement
        for unit in units {
            if let Some(slot) = self.banner_slot(&unit, &mut doc, viewport).await {
                let location = unit.location_in(&doc.body);
                self.insert_banner(&mut doc, slot, &location);
            }
        }

        if self.config.legacy_banners {
            self.place_legacy_banners(&mut doc, viewport).await;
        }

        info!(
            pre_header = doc.pre_header.len(),
            body = doc.body.len(),
            lazy = doc.pending.len(),
            "homepage composed"
        );
        Composition::Done(doc)
    }

    /// Build the homepage and load every lazy section before returning
    pub async fn compose_all(&self, viewport: Viewport, scheduler: &LazyScheduler) -> Composition {
        let mut composition = self.compose(viewport).await;
        if let Composition::Done(doc) = &mut composition {
            self.load_lazy(doc, viewport, scheduler).await;
        }
        composition
    }

    /// Fill placeholders through the scheduler. Positions were reserved at
    /// compose time, so completion order does not matter.
    pub async fn load_lazy(&self, doc: &mut Document, viewport: Viewport, scheduler: &LazyScheduler) {
        let pending = doc.pending.clone();
        let keys = doc.placeholder_ids();

        let loaded = scheduler
            .run(keys, |id| {
                let section = pending.get(&id).cloned();
                async move {
                    match section {
                        Some(section) => self.render_section(&section, viewport).await,
                        None => None,
                    }
                }
            })
            .await;

        for (id, slot) in loaded {
            doc.fill(&id, slot);
        }
    }

    async fn banner_slot(&self, unit: &BannerUnit, doc: &mut Document, viewport: Viewport) -> Option<Slot> {
        match unit.banners.as_slice() {
            [top, bottom] => {
                let (top, bottom) = futures::join!(
                    self.render_section(top, viewport),
                    self.render_section(bottom, viewport)
                );
                match (top, bottom) {
                    (Some(top), Some(bottom)) => Some(Slot::Stacked {
                        top: Box::new(top),
                        bottom: Box::new(bottom),
                    }),
                    (single, None) | (None, single) => single,
                }
            }
            [banner] if self.is_critical(banner) => self.render_section(banner, viewport).await,
            [banner] => {
                doc.pending.insert(banner.id.clone(), banner.clone());
                Some(Self::placeholder(banner))
            }
            _ => None,
        }
    }

    fn insert_banner(&self, doc: &mut Document, slot: Slot, location: &str) {
        let entries: Vec<FlowEntry<'_>> = doc.body.iter().map(Slot::entry).collect();
        let point = place(location, &entries);
        debug!(section_id = slot.section_id(), location, index = point.index, rule = ?point.rule, "banner placed");
        doc.body.insert(point.index, slot);
    }

    async fn place_legacy_banners(&self, doc: &mut Document, viewport: Viewport) {
        let banners = match self.resolver.catalog().banners().await {
            Ok(banners) => banners,
            Err(e) => {
                warn!(error = %e, "legacy banners unavailable");
                return;
            }
        };

        let now = Utc::now();
        for banner in banners.iter().filter(|b| b.is_active) {
            let Some(position) = banner.position.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
                continue;
            };
            let section = legacy_banner_section(banner, position, now);
            if let Some(slot) = self.render_section(&section, viewport).await {
                self.insert_banner(doc, slot, position);
            }
        }
    }
}
