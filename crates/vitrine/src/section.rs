// File: src/section.rs
// Purpose: Homepage section model, the closed type enumeration and per-type config shapes

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SECTION TYPES
// ============================================================================

/// Every kind of homepage block the storefront knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    HeroSlider,
    ScrollingText,
    CategoryFeatured,
    CategoryGrid,
    CategoryCircles,
    DepartmentGrid,
    ProductTabs,
    ProductCarousel,
    NewArrivals,
    TopSelling,
    FeaturedCollections,
    SubcategoryGrid,
    #[serde(alias = "banner")]
    BannerFullWidth,
    VideoBanner,
    CollectionLinks,
    NewsletterSocial,
    BrandMarquee,
    BrandGrid,
    CustomHtml,
}

impl SectionType {
    pub const ALL: [SectionType; 19] = [
        SectionType::HeroSlider,
        SectionType::ScrollingText,
        SectionType::CategoryFeatured,
        SectionType::CategoryGrid,
        SectionType::CategoryCircles,
        SectionType::DepartmentGrid,
        SectionType::ProductTabs,
        SectionType::ProductCarousel,
        SectionType::NewArrivals,
        SectionType::TopSelling,
        SectionType::FeaturedCollections,
        SectionType::SubcategoryGrid,
        SectionType::BannerFullWidth,
        SectionType::VideoBanner,
        SectionType::CollectionLinks,
        SectionType::NewsletterSocial,
        SectionType::BrandMarquee,
        SectionType::BrandGrid,
        SectionType::CustomHtml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::HeroSlider => "heroSlider",
            SectionType::ScrollingText => "scrollingText",
            SectionType::CategoryFeatured => "categoryFeatured",
            SectionType::CategoryGrid => "categoryGrid",
            SectionType::CategoryCircles => "categoryCircles",
            SectionType::DepartmentGrid => "departmentGrid",
            SectionType::ProductTabs => "productTabs",
            SectionType::ProductCarousel => "productCarousel",
            SectionType::NewArrivals => "newArrivals",
            SectionType::TopSelling => "topSelling",
            SectionType::FeaturedCollections => "featuredCollections",
            SectionType::SubcategoryGrid => "subcategoryGrid",
            SectionType::BannerFullWidth => "bannerFullWidth",
            SectionType::VideoBanner => "videoBanner",
            SectionType::CollectionLinks => "collectionLinks",
            SectionType::NewsletterSocial => "newsletterSocial",
            SectionType::BrandMarquee => "brandMarquee",
            SectionType::BrandGrid => "brandGrid",
            SectionType::CustomHtml => "customHtml",
        }
    }

    /// Banner-type sections are placed by location rather than flow order
    pub fn is_banner(&self) -> bool {
        matches!(self, SectionType::BannerFullWidth)
    }

    pub fn is_category_family(&self) -> bool {
        matches!(
            self,
            SectionType::CategoryFeatured | SectionType::CategoryGrid | SectionType::CategoryCircles
        )
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "banner" {
            return Ok(SectionType::BannerFullWidth);
        }

        SectionType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown section type '{}'", s)))
    }
}

// ============================================================================
// PER-TYPE CONFIG SHAPES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSliderConfig {
    pub slider_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollingTextConfig {
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
}

/// Shared by the category grid family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepartmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_ids: Option<Vec<String>>,
}

/// Product query knobs shared by carousels, new arrivals, top selling and tabs.
///
/// `section` wins over the legacy boolean flags when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQueryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_arrival: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_discount: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductTab {
    pub label: String,
    #[serde(flatten)]
    pub query: ProductQueryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductTabsConfig {
    pub tabs: Vec<ProductTab>,
}

/// Shared by featured collections and the subcategory grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubcategoryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_ids: Option<Vec<String>>,
    /// Subcategories for the scrolling button strip under the grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_subcategory_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BannerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Placement directive: `top`, `bottom`, `after-section-{id}`, `after-{name}`...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoBannerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_banner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionLink {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionLinksConfig {
    pub links: Vec<CollectionLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsletterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    pub social_links: Vec<SocialLink>,
}

/// Shared by the brand marquee and brand grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomHtmlConfig {
    pub html: String,
}

/// Section configuration, one variant per section type
#[derive(Debug, Clone, PartialEq)]
pub enum SectionConfig {
    HeroSlider(HeroSliderConfig),
    ScrollingText(ScrollingTextConfig),
    CategoryFeatured(CategoryConfig),
    CategoryGrid(CategoryConfig),
    CategoryCircles(CategoryConfig),
    DepartmentGrid(DepartmentConfig),
    ProductTabs(ProductTabsConfig),
    ProductCarousel(ProductQueryConfig),
    NewArrivals(ProductQueryConfig),
    TopSelling(ProductQueryConfig),
    FeaturedCollections(SubcategoryConfig),
    SubcategoryGrid(SubcategoryConfig),
    BannerFullWidth(BannerConfig),
    VideoBanner(VideoBannerConfig),
    CollectionLinks(CollectionLinksConfig),
    NewsletterSocial(NewsletterConfig),
    BrandMarquee(BrandConfig),
    BrandGrid(BrandConfig),
    CustomHtml(CustomHtmlConfig),
}

fn parse_config<T: DeserializeOwned + Default>(kind: SectionType, value: Value) -> Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(value)
        .map_err(|e| Error::validation(format!("invalid config for {}: {}", kind, e)))
}

impl SectionConfig {
    pub fn kind(&self) -> SectionType {
        match self {
            SectionConfig::HeroSlider(_) => SectionType::HeroSlider,
            SectionConfig::ScrollingText(_) => SectionType::ScrollingText,
            SectionConfig::CategoryFeatured(_) => SectionType::CategoryFeatured,
            SectionConfig::CategoryGrid(_) => SectionType::CategoryGrid,
            SectionConfig::CategoryCircles(_) => SectionType::CategoryCircles,
            SectionConfig::DepartmentGrid(_) => SectionType::DepartmentGrid,
            SectionConfig::ProductTabs(_) => SectionType::ProductTabs,
            SectionConfig::ProductCarousel(_) => SectionType::ProductCarousel,
            SectionConfig::NewArrivals(_) => SectionType::NewArrivals,
            SectionConfig::TopSelling(_) => SectionType::TopSelling,
            SectionConfig::FeaturedCollections(_) => SectionType::FeaturedCollections,
            SectionConfig::SubcategoryGrid(_) => SectionType::SubcategoryGrid,
            SectionConfig::BannerFullWidth(_) => SectionType::BannerFullWidth,
            SectionConfig::VideoBanner(_) => SectionType::VideoBanner,
            SectionConfig::CollectionLinks(_) => SectionType::CollectionLinks,
            SectionConfig::NewsletterSocial(_) => SectionType::NewsletterSocial,
            SectionConfig::BrandMarquee(_) => SectionType::BrandMarquee,
            SectionConfig::BrandGrid(_) => SectionType::BrandGrid,
            SectionConfig::CustomHtml(_) => SectionType::CustomHtml,
        }
    }

    /// Parse the open config bag of a section of `kind`. `null` yields the defaults.
    pub fn from_value(kind: SectionType, value: Value) -> Result<Self> {
        Ok(match kind {
            SectionType::HeroSlider => SectionConfig::HeroSlider(parse_config(kind, value)?),
            SectionType::ScrollingText => SectionConfig::ScrollingText(parse_config(kind, value)?),
            SectionType::CategoryFeatured => SectionConfig::CategoryFeatured(parse_config(kind, value)?),
            SectionType::CategoryGrid => SectionConfig::CategoryGrid(parse_config(kind, value)?),
            SectionType::CategoryCircles => SectionConfig::CategoryCircles(parse_config(kind, value)?),
            SectionType::DepartmentGrid => SectionConfig::DepartmentGrid(parse_config(kind, value)?),
            SectionType::ProductTabs => SectionConfig::ProductTabs(parse_config(kind, value)?),
            SectionType::ProductCarousel => SectionConfig::ProductCarousel(parse_config(kind, value)?),
            SectionType::NewArrivals => SectionConfig::NewArrivals(parse_config(kind, value)?),
            SectionType::TopSelling => SectionConfig::TopSelling(parse_config(kind, value)?),
            SectionType::FeaturedCollections => {
                SectionConfig::FeaturedCollections(parse_config(kind, value)?)
            }
            SectionType::SubcategoryGrid => SectionConfig::SubcategoryGrid(parse_config(kind, value)?),
            SectionType::BannerFullWidth => SectionConfig::BannerFullWidth(parse_config(kind, value)?),
            SectionType::VideoBanner => SectionConfig::VideoBanner(parse_config(kind, value)?),
            SectionType::CollectionLinks => SectionConfig::CollectionLinks(parse_config(kind, value)?),
            SectionType::NewsletterSocial => SectionConfig::NewsletterSocial(parse_config(kind, value)?),
            SectionType::BrandMarquee => SectionConfig::BrandMarquee(parse_config(kind, value)?),
            SectionType::BrandGrid => SectionConfig::BrandGrid(parse_config(kind, value)?),
            SectionType::CustomHtml => SectionConfig::CustomHtml(parse_config(kind, value)?),
        })
    }

    pub fn default_for(kind: SectionType) -> Self {
        match kind {
            SectionType::HeroSlider => SectionConfig::HeroSlider(Default::default()),
            SectionType::ScrollingText => SectionConfig::ScrollingText(Default::default()),
            SectionType::CategoryFeatured => SectionConfig::CategoryFeatured(Default::default()),
            SectionType::CategoryGrid => SectionConfig::CategoryGrid(Default::default()),
            SectionType::CategoryCircles => SectionConfig::CategoryCircles(Default::default()),
            SectionType::DepartmentGrid => SectionConfig::DepartmentGrid(Default::default()),
            SectionType::ProductTabs => SectionConfig::ProductTabs(Default::default()),
            SectionType::ProductCarousel => SectionConfig::ProductCarousel(Default::default()),
            SectionType::NewArrivals => SectionConfig::NewArrivals(Default::default()),
            SectionType::TopSelling => SectionConfig::TopSelling(Default::default()),
            SectionType::FeaturedCollections => SectionConfig::FeaturedCollections(Default::default()),
            SectionType::SubcategoryGrid => SectionConfig::SubcategoryGrid(Default::default()),
            SectionType::BannerFullWidth => SectionConfig::BannerFullWidth(Default::default()),
            SectionType::VideoBanner => SectionConfig::VideoBanner(Default::default()),
            SectionType::CollectionLinks => SectionConfig::CollectionLinks(Default::default()),
            SectionType::NewsletterSocial => SectionConfig::NewsletterSocial(Default::default()),
            SectionType::BrandMarquee => SectionConfig::BrandMarquee(Default::default()),
            SectionType::BrandGrid => SectionConfig::BrandGrid(Default::default()),
            SectionType::CustomHtml => SectionConfig::CustomHtml(Default::default()),
        }
    }

    pub fn to_value(&self) -> Value {
        let value = match self {
            SectionConfig::HeroSlider(c) => serde_json::to_value(c),
            SectionConfig::ScrollingText(c) => serde_json::to_value(c),
            SectionConfig::CategoryFeatured(c)
            | SectionConfig::CategoryGrid(c)
            | SectionConfig::CategoryCircles(c) => serde_json::to_value(c),
            SectionConfig::DepartmentGrid(c) => serde_json::to_value(c),
            SectionConfig::ProductTabs(c) => serde_json::to_value(c),
            SectionConfig::ProductCarousel(c)
            | SectionConfig::NewArrivals(c)
            | SectionConfig::TopSelling(c) => serde_json::to_value(c),
            SectionConfig::FeaturedCollections(c) | SectionConfig::SubcategoryGrid(c) => {
                serde_json::to_value(c)
            }
            SectionConfig::BannerFullWidth(c) => serde_json::to_value(c),
            SectionConfig::VideoBanner(c) => serde_json::to_value(c),
            SectionConfig::CollectionLinks(c) => serde_json::to_value(c),
            SectionConfig::NewsletterSocial(c) => serde_json::to_value(c),
            SectionConfig::BrandMarquee(c) | SectionConfig::BrandGrid(c) => serde_json::to_value(c),
            SectionConfig::CustomHtml(c) => serde_json::to_value(c),
        };
        value.unwrap_or_default()
    }

    /// Placement directive carried by a banner section, if any
    pub fn banner_location(&self) -> Option<&str> {
        match self {
            SectionConfig::BannerFullWidth(c) => c
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty()),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION ENTITY
// ============================================================================

/// One configurable homepage block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SectionWire", try_from = "SectionWire")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub config: SectionConfig,
    pub ordering: i64,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Section {
    pub fn section_type(&self) -> SectionType {
        self.config.kind()
    }

    /// Both flags must be set for a section to reach the public homepage
    pub fn is_visible(&self) -> bool {
        self.is_active && self.is_published
    }

    /// Heading to show above the block: title, else nothing
    pub fn heading(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// JSON shape of a section on the REST surface: `type` and `config` side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionWire {
    #[serde(alias = "_id")]
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    config: Value,
    #[serde(default)]
    ordering: i64,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Section> for SectionWire {
    fn from(section: Section) -> Self {
        SectionWire {
            kind: section.section_type().as_str().to_string(),
            config: section.config.to_value(),
            id: section.id,
            name: section.name,
            title: section.title,
            subtitle: section.subtitle,
            description: section.description,
            ordering: section.ordering,
            is_active: section.is_active,
            is_published: section.is_published,
            created_by: section.created_by,
            updated_by: section.updated_by,
            created_at: section.created_at,
            updated_at: section.updated_at,
        }
    }
}

impl TryFrom<SectionWire> for Section {
    type Error = Error;

    fn try_from(wire: SectionWire) -> Result<Self> {
        let kind: SectionType = wire.kind.parse()?;
        Ok(Section {
            config: SectionConfig::from_value(kind, wire.config)?,
            id: wire.id,
            name: wire.name,
            title: wire.title,
            subtitle: wire.subtitle,
            description: wire.description,
            ordering: wire.ordering,
            is_active: wire.is_active,
            is_published: wire.is_published,
            created_by: wire.created_by,
            updated_by: wire.updated_by,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// PAYLOADS & PURE FUNCTIONS
// ============================================================================

/// Create/update body as received from the admin panel. Every field is optional;
/// for updates only fields present in the body are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub config: Option<Value>,
    pub ordering: Option<i64>,
    pub is_active: Option<bool>,
    pub is_published: Option<bool>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// A validated create request
#[derive(Debug, Clone, PartialEq)]
pub struct NewSection {
    pub name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub config: SectionConfig,
    /// Assigned as `max(existing) + 1` when absent
    pub ordering: Option<i64>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<String>,
}

fn required_name(name: Option<&str>) -> Result<String> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(Error::validation("name is required")),
    }
}

/// Validate a create payload: `name` and `type` are required, `type` must be known
///
/// # Examples
/// ```
/// use vitrine::section::{validate_new_section, SectionPayload, SectionType};
///
/// let payload = SectionPayload {
///     name: Some("Hero".to_string()),
///     kind: Some("heroSlider".to_string()),
///     ..Default::default()
/// };
/// let section = validate_new_section(payload).unwrap();
/// assert_eq!(section.config.kind(), SectionType::HeroSlider);
/// assert!(section.is_active);
/// ```
pub fn validate_new_section(payload: SectionPayload) -> Result<NewSection> {
    let name = required_name(payload.name.as_deref())?;
    let kind: SectionType = payload
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::validation("type is required"))?
        .parse()?;
    let config = SectionConfig::from_value(kind, payload.config.unwrap_or(Value::Null))?;

    Ok(NewSection {
        name,
        title: payload.title,
        subtitle: payload.subtitle,
        description: payload.description,
        config,
        ordering: payload.ordering,
        is_active: payload.is_active.unwrap_or(true),
        is_published: payload.is_published.unwrap_or(true),
        created_by: payload.created_by,
    })
}

/// Apply a partial update to a section (pure, no mutation of the input)
///
/// Fields absent from the payload are preserved. A type change re-reads the
/// config under the new type; a config without a type change is read under the
/// existing type.
pub fn apply_section_update(section: Section, payload: SectionPayload) -> Result<Section> {
    let name = match payload.name.as_deref() {
        Some(n) => required_name(Some(n))?,
        None => section.name.clone(),
    };

    let config = match (payload.kind.as_deref(), payload.config) {
        (Some(kind), config) => {
            let kind: SectionType = kind.trim().parse()?;
            let value = match config {
                Some(v) => v,
                None if kind == section.section_type() => section.config.to_value(),
                None => Value::Null,
            };
            SectionConfig::from_value(kind, value)?
        }
        (None, Some(value)) => SectionConfig::from_value(section.section_type(), value)?,
        (None, None) => section.config.clone(),
    };

    Ok(Section {
        name,
        config,
        title: payload.title.or(section.title),
        subtitle: payload.subtitle.or(section.subtitle),
        description: payload.description.or(section.description),
        ordering: payload.ordering.unwrap_or(section.ordering),
        is_active: payload.is_active.unwrap_or(section.is_active),
        is_published: payload.is_published.unwrap_or(section.is_published),
        updated_by: payload.updated_by.or(section.updated_by),
        updated_at: Utc::now(),
        ..section
    })
}

/// Sort ascending by `(ordering, created_at)`. Stable, so equal keys keep input order.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by(|a, b| {
        a.ordering
            .cmp(&b.ordering)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Ordering for a new section given the orderings already stored
pub fn next_ordering(existing_max: Option<i64>) -> i64 {
    existing_max.map(|max| max + 1).unwrap_or(0)
}

/// Listing filter for the section store
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFilter {
    #[serde(rename = "type")]
    pub kind: Option<SectionType>,
    #[serde(default, deserialize_with = "flag_param")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "flag_param")]
    pub is_published: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagParam {
    Bool(bool),
    Text(String),
}

/// Query flags: a bare `?isActive` means true, as do `true` and `1`
fn flag_param<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<FlagParam>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlagParam::Bool(flag)) => Ok(Some(flag)),
        Some(FlagParam::Text(text)) => match text.trim() {
            "" | "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(other),
                &"a boolean flag",
            )),
        },
    }
}

impl SectionFilter {
    /// Sections eligible for the public homepage
    pub fn public() -> Self {
        Self {
            kind: None,
            is_active: Some(true),
            is_published: Some(true),
        }
    }

    pub fn matches(&self, section: &Section) -> bool {
        self.kind.map_or(true, |k| section.section_type() == k)
            && self.is_active.map_or(true, |a| section.is_active == a)
            && self.is_published.map_or(true, |p| section.is_published == p)
    }
}

/// One entry of a reorder request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: String,
    pub ordering: i64,
}
