// File: src/resolver.rs
// Purpose: Section Data Resolver. Fetches the catalog content a section needs to render.

use crate::catalog::{
    Banner, Brand, Catalog, Category, Department, Product, ProductFilter, ProductQuery, Slider,
    Subcategory, VideoBanner,
};
use crate::config::HomepageConfig;
use crate::error::{Error, Result};
use crate::section::{
    BannerConfig, BrandConfig, CategoryConfig, DepartmentConfig, HeroSliderConfig,
    ProductQueryConfig, ProductTabsConfig, Section, SectionConfig, SectionType, SubcategoryConfig,
    VideoBannerConfig,
};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Viewport class of the requesting client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    /// `mobile=1` wins; otherwise sniff the User-Agent
    pub fn detect(mobile_param: Option<&str>, user_agent: Option<&str>) -> Self {
        match mobile_param {
            Some("1") | Some("true") => return Viewport::Mobile,
            Some("0") | Some("false") => return Viewport::Desktop,
            _ => {}
        }

        let ua = user_agent.unwrap_or_default().to_ascii_lowercase();
        if ["mobi", "android", "iphone", "ipod"].iter().any(|m| ua.contains(m)) {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }
}

/// Image a banner section resolves to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerImage {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Set when the image came from the banner collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_id: Option<String>,
}

impl BannerImage {
    pub fn from_banner(banner: &Banner) -> Self {
        Self {
            image_url: banner.image_url.clone(),
            mobile_image_url: banner.mobile_image_url.clone(),
            link: banner.link.clone(),
            alt: banner.title.clone(),
            banner_id: Some(banner.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabProducts {
    pub label: String,
    pub products: Vec<Product>,
}

/// Type-specific payload a renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum SectionData {
    /// Everything the renderer needs is in the section config
    Static,
    Sliders(Vec<Slider>),
    Categories(Vec<Category>),
    Departments(Vec<Department>),
    ProductTabs(Vec<TabProducts>),
    Products(Vec<Product>),
    Subcategories {
        grid: Vec<Subcategory>,
        buttons: Vec<Subcategory>,
    },
    Banner(BannerImage),
    VideoBanner(VideoBanner),
    Brands(Vec<Brand>),
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Product query for a section config.
///
/// The semantic filter is picked in priority order: the `section` name, then
/// the legacy flags (`isFeatured`, `isNewArrival`, `isTrending`), then no
/// filter at all. Only one of them is ever sent.
///
/// # Examples
/// ```
/// use vitrine::resolver::product_query;
/// use vitrine::section::ProductQueryConfig;
///
/// let config = ProductQueryConfig {
///     section: Some("New Arrivals".to_string()),
///     is_featured: Some(true),
///     ..Default::default()
/// };
/// let query = product_query(&config, 8);
/// assert_eq!(query.section.as_deref(), Some("New Arrivals"));
/// assert_eq!(query.filter, None);
/// ```
pub fn product_query(config: &ProductQueryConfig, default_limit: usize) -> ProductQuery {
    let section = config
        .section
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let filter = if section.is_some() {
        None
    } else if config.is_featured == Some(true) {
        Some(ProductFilter::Featured)
    } else if config.is_new_arrival == Some(true) {
        Some(ProductFilter::NewArrival)
    } else if config.is_trending == Some(true) {
        Some(ProductFilter::Trending)
    } else {
        None
    };

    ProductQuery {
        category_id: config.category_id.clone(),
        section,
        filter,
        limit: Some(config.limit.unwrap_or(default_limit)),
        min_discount: config.min_discount,
        collection: config.collection.clone(),
    }
}

/// Cap a tab's limit on mobile viewports
pub fn adjust_limit(limit: usize, viewport: Viewport, mobile_limit: usize) -> usize {
    match viewport {
        Viewport::Mobile => limit.min(mobile_limit),
        Viewport::Desktop => limit,
    }
}

/// Keep only products that actually carry the requested section tag
pub fn retain_section(products: Vec<Product>, section: Option<&str>) -> Vec<Product> {
    match section {
        Some(name) => {
            let before = products.len();
            let kept: Vec<Product> = products.into_iter().filter(|p| p.has_section(name)).collect();
            if kept.len() != before {
                debug!(section = name, dropped = before - kept.len(), "discarded untagged products");
            }
            kept
        }
        None => products,
    }
}

/// Items whose id is in `ids`, in the order of `ids`
fn pick_by_ids<T: Clone>(items: &[T], ids: &[String], id_of: impl Fn(&T) -> &str) -> Vec<T> {
    ids.iter()
        .filter_map(|id| items.iter().find(|item| id_of(item) == id))
        .cloned()
        .collect()
}

fn non_empty(ids: &Option<Vec<String>>) -> Option<&[String]> {
    ids.as_deref().filter(|ids| !ids.is_empty())
}

/// Active sliders named in `sliderIds`, in slider order. No ids selects nothing.
pub fn select_sliders(sliders: Vec<Slider>, config: &HeroSliderConfig) -> Vec<Slider> {
    let mut picked: Vec<Slider> = sliders
        .into_iter()
        .filter(|s| s.is_active && config.slider_ids.contains(&s.id))
        .collect();
    picked.sort_by_key(|s| s.order);
    picked
}

pub fn select_categories(categories: Vec<Category>, config: &CategoryConfig) -> Vec<Category> {
    let active: Vec<Category> = categories.into_iter().filter(|c| c.is_active).collect();
    let mut picked = match non_empty(&config.category_ids) {
        Some(ids) => pick_by_ids(&active, ids, |c| c.id.as_str()),
        None => active.into_iter().filter(|c| c.is_featured).collect(),
    };
    if let Some(limit) = config.limit {
        picked.truncate(limit);
    }
    picked
}

pub fn select_departments(departments: Vec<Department>, config: &DepartmentConfig, limit: usize) -> Vec<Department> {
    let active: Vec<Department> = departments.into_iter().filter(|d| d.is_active).collect();
    match non_empty(&config.department_ids) {
        Some(ids) => pick_by_ids(&active, ids, |d| d.id.as_str()),
        None => active.into_iter().take(limit).collect(),
    }
}

/// Grid slots (capped) and the separate button strip
pub fn select_subcategories(
    subcategories: Vec<Subcategory>,
    config: &SubcategoryConfig,
    grid_limit: usize,
) -> (Vec<Subcategory>, Vec<Subcategory>) {
    let active: Vec<Subcategory> = subcategories.into_iter().filter(|s| s.is_active).collect();

    let mut grid = match non_empty(&config.subcategory_ids) {
        Some(ids) => pick_by_ids(&active, ids, |s| s.id.as_str()),
        None => active.clone(),
    };
    grid.truncate(grid_limit);

    let buttons = match non_empty(&config.button_subcategory_ids) {
        Some(ids) => pick_by_ids(&active, ids, |s| s.id.as_str()),
        None => Vec::new(),
    };

    (grid, buttons)
}

pub fn select_brands(brands: Vec<Brand>, config: &BrandConfig) -> Vec<Brand> {
    let active: Vec<Brand> = brands.into_iter().filter(|b| b.is_active).collect();
    let mut picked = match non_empty(&config.brand_ids) {
        Some(ids) => pick_by_ids(&active, ids, |b| b.id.as_str()),
        None => active,
    };
    if let Some(limit) = config.limit {
        picked.truncate(limit);
    }
    picked
}

/// Banner image straight from the section config, when it carries one
pub fn inline_banner(config: &BannerConfig) -> Option<BannerImage> {
    let image_url = config
        .image_url
        .as_deref()
        .or(config.mobile_image_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())?;

    Some(BannerImage {
        image_url: image_url.to_string(),
        mobile_image_url: config.mobile_image_url.clone(),
        link: config.link.clone(),
        alt: config.alt.clone(),
        banner_id: None,
    })
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Limits the resolver applies when a section does not set its own
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOptions {
    pub department_limit: usize,
    pub subcategory_grid_limit: usize,
    pub default_product_limit: usize,
    pub mobile_product_limit: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions::from(&HomepageConfig::default())
    }
}

impl From<&HomepageConfig> for ResolverOptions {
    fn from(config: &HomepageConfig) -> Self {
        Self {
            department_limit: config.department_limit,
            subcategory_grid_limit: config.subcategory_grid_limit,
            default_product_limit: config.default_product_limit,
            mobile_product_limit: config.mobile_product_limit,
        }
    }
}

#[derive(Clone)]
pub struct SectionResolver {
    catalog: Arc<dyn Catalog>,
    options: ResolverOptions,
}

impl SectionResolver {
    pub fn new(catalog: Arc<dyn Catalog>, options: ResolverOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Resolve a section's data, `None` when it cannot be resolved.
    /// Failures are logged and never leave the section boundary.
    pub async fn resolve_data(&self, section: &Section, viewport: Viewport) -> Option<SectionData> {
        match self.resolve(section, viewport).await {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(
                    section_id = %section.id,
                    kind = %section.section_type(),
                    error = %e,
                    "section data could not be resolved"
                );
                None
            }
        }
    }

    /// Resolve a section's data, reporting why it failed
    pub async fn resolve(&self, section: &Section, viewport: Viewport) -> Result<SectionData> {
        let data = match &section.config {
            SectionConfig::HeroSlider(config) => {
                SectionData::Sliders(select_sliders(self.catalog.sliders().await?, config))
            }
            SectionConfig::CategoryFeatured(config)
            | SectionConfig::CategoryGrid(config)
            | SectionConfig::CategoryCircles(config) => {
                SectionData::Categories(select_categories(self.catalog.categories().await?, config))
            }
            SectionConfig::DepartmentGrid(config) => SectionData::Departments(select_departments(
                self.catalog.departments().await?,
                config,
                self.options.department_limit,
            )),
            SectionConfig::ProductTabs(config) => {
                SectionData::ProductTabs(self.resolve_tabs(config, viewport).await?)
            }
            SectionConfig::ProductCarousel(config)
            | SectionConfig::NewArrivals(config)
            | SectionConfig::TopSelling(config) => {
                let query = product_query(config, self.options.default_product_limit);
                SectionData::Products(self.fetch_products(&query).await?)
            }
            SectionConfig::FeaturedCollections(config) | SectionConfig::SubcategoryGrid(config) => {
                let (grid, buttons) = select_subcategories(
                    self.catalog.subcategories().await?,
                    config,
                    self.options.subcategory_grid_limit,
                );
                SectionData::Subcategories { grid, buttons }
            }
            SectionConfig::BannerFullWidth(config) => {
                SectionData::Banner(self.resolve_banner(&section.id, config).await?)
            }
            SectionConfig::VideoBanner(config) => {
                SectionData::VideoBanner(self.resolve_video(&section.id, config).await?)
            }
            SectionConfig::BrandMarquee(config) | SectionConfig::BrandGrid(config) => {
                SectionData::Brands(select_brands(self.catalog.brands().await?, config))
            }
            SectionConfig::ScrollingText(_)
            | SectionConfig::CollectionLinks(_)
            | SectionConfig::NewsletterSocial(_)
            | SectionConfig::CustomHtml(_) => SectionData::Static,
        };

        Ok(data)
    }

    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let products = self.catalog.products(query).await?;
        Ok(retain_section(products, query.section.as_deref()))
    }

    /// Tabs are fetched concurrently; one failing tab fails the section
    async fn resolve_tabs(&self, config: &ProductTabsConfig, viewport: Viewport) -> Result<Vec<TabProducts>> {
        let fetches = config.tabs.iter().map(|tab| async move {
            let mut query = product_query(&tab.query, self.options.default_product_limit);
            query.limit = query
                .limit
                .map(|limit| adjust_limit(limit, viewport, self.options.mobile_product_limit));

            Ok::<_, Error>(TabProducts {
                label: tab.label.clone(),
                products: self.fetch_products(&query).await?,
            })
        });

        try_join_all(fetches).await
    }

    async fn resolve_banner(&self, section_id: &str, config: &BannerConfig) -> Result<BannerImage> {
        // A configured image needs no lookup
        if config.image_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            if let Some(image) = inline_banner(config) {
                return Ok(image);
            }
        }

        let fallback = inline_banner(config);

        let Some(banner_id) = config.banner_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            return fallback.ok_or_else(|| Error::resolution(section_id, "banner has no image or banner id"));
        };

        match self.catalog.banner(banner_id).await {
            Ok(banner) if banner.is_active => {
                let mut image = BannerImage::from_banner(&banner);
                if config.link.is_some() {
                    image.link = config.link.clone();
                }
                if config.alt.is_some() {
                    image.alt = config.alt.clone();
                }
                Ok(image)
            }
            Ok(_) => {
                debug!(section_id, banner_id, "banner inactive, using configured image");
                fallback.ok_or_else(|| Error::resolution(section_id, format!("banner {} is inactive", banner_id)))
            }
            Err(e) => {
                debug!(section_id, banner_id, error = %e, "banner lookup failed, using configured image");
                fallback.ok_or_else(|| Error::resolution(section_id, e.to_string()))
            }
        }
    }

    async fn resolve_video(&self, section_id: &str, config: &VideoBannerConfig) -> Result<VideoBanner> {
        let videos = self.catalog.video_banners().await?;
        let mut active = videos.into_iter().filter(|v| v.is_active);

        let chosen = match config.video_banner_id.as_deref() {
            Some(id) => {
                let all: Vec<VideoBanner> = active.collect();
                let preferred = all.iter().find(|v| v.id == id).cloned();
                preferred.or_else(|| all.into_iter().next())
            }
            None => active.next(),
        };

        chosen.ok_or_else(|| Error::resolution(section_id, "no active video banner"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_catalog::{CatalogFixture, MemoryCatalog};
    use crate::section::fixtures::section;
    use crate::section::ProductTab;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn product(id: &str, sections: &[&str]) -> Product {
        Product {
            id: id.into(),
            name: id.into(),
            slug: None,
            price: 12.5,
            sale_price: None,
            image_url: None,
            brand: None,
            sections: sections.iter().map(|s| s.to_string()).collect(),
            category_id: None,
            is_featured: true,
            is_new_arrival: false,
            is_trending: false,
            discount: None,
            collection: None,
        }
    }

    fn banner(id: &str, active: bool) -> Banner {
        Banner {
            id: id.into(),
            title: Some("Summer".into()),
            image_url: format!("/banners/{}.jpg", id),
            mobile_image_url: None,
            link: Some("/summer".into()),
            position: None,
            is_active: active,
        }
    }

    fn resolver(fixture: CatalogFixture) -> SectionResolver {
        SectionResolver::new(Arc::new(MemoryCatalog::new(fixture)), ResolverOptions::default())
    }

    #[rstest]
    #[case(ProductQueryConfig { is_featured: Some(true), is_trending: Some(true), ..Default::default() }, Some(ProductFilter::Featured))]
    #[case(ProductQueryConfig { is_new_arrival: Some(true), is_trending: Some(true), ..Default::default() }, Some(ProductFilter::NewArrival))]
    #[case(ProductQueryConfig { is_trending: Some(true), ..Default::default() }, Some(ProductFilter::Trending))]
    #[case(ProductQueryConfig { section: Some("Sale".into()), is_featured: Some(true), ..Default::default() }, None)]
    #[case(ProductQueryConfig::default(), None)]
    fn test_filter_priority(#[case] config: ProductQueryConfig, #[case] expected: Option<ProductFilter>) {
        assert_eq!(product_query(&config, 8).filter, expected);
    }


    #[test]
    fn test_blank_section_name_falls_through_to_flags() {
        let config = ProductQueryConfig {
            section: Some("  ".into()),
            is_trending: Some(true),
            ..Default::default()
        };
        let query = product_query(&config, 8);
        assert_eq!(query.section, None);
        assert_eq!(query.filter, Some(ProductFilter::Trending));
        assert_eq!(query.limit, Some(8));
    }

    #[rstest]
    #[case(10, Viewport::Mobile, 6)]
    #[case(4, Viewport::Mobile, 4)]
    #[case(10, Viewport::Desktop, 10)]
    fn test_adjust_limit(#[case] limit: usize, #[case] viewport: Viewport, #[case] expected: usize) {
        assert_eq!(adjust_limit(limit, viewport, 6), expected);
    }

    #[rstest]
    #[case(Some("1"), None, Viewport::Mobile)]
    #[case(Some("0"), Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"), Viewport::Desktop)]
    #[case(None, Some("Mozilla/5.0 (Linux; Android 14) Mobile"), Viewport::Mobile)]
    #[case(None, Some("Mozilla/5.0 (X11; Linux x86_64)"), Viewport::Desktop)]
    #[case(None, None, Viewport::Desktop)]
    fn test_viewport_detect(#[case] param: Option<&str>, #[case] ua: Option<&str>, #[case] expected: Viewport) {
        assert_eq!(Viewport::detect(param, ua), expected);
    }

    #[test]
    fn test_select_categories_prefers_ids_then_featured() {
        let cats = vec![
            Category { id: "a".into(), name: "A".into(), slug: None, image_url: None, is_active: true, is_featured: false },
            Category { id: "b".into(), name: "B".into(), slug: None, image_url: None, is_active: true, is_featured: true },
            Category { id: "c".into(), name: "C".into(), slug: None, image_url: None, is_active: false, is_featured: true },
        ];

        let by_ids = select_categories(
            cats.clone(),
            &CategoryConfig { category_ids: Some(vec!["c".into(), "a".into()]), limit: None },
        );
        assert_eq!(by_ids.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["a"]);

        let featured = select_categories(cats, &CategoryConfig::default());
        assert_eq!(featured.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_departments_default_to_first_n_active() {
        let departments: Vec<Department> = (0..15)
            .map(|i| Department { id: i.to_string(), name: format!("D{}", i), slug: None, image_url: None, is_active: i != 0 })
            .collect();

        let picked = select_departments(departments, &DepartmentConfig::default(), 12);
        assert_eq!(picked.len(), 12);
        assert_eq!(picked[0].id, "1");
    }

    #[test]
    fn test_sliders_need_configured_ids() {
        let sliders: Vec<Slider> = serde_json::from_value(serde_json::json!([
            {"_id": "a", "imageUrl": "/a.jpg", "order": 2},
            {"_id": "b", "imageUrl": "/b.jpg", "order": 1},
            {"_id": "c", "imageUrl": "/c.jpg", "order": 0, "isActive": false}
        ]))
        .unwrap();

        assert!(select_sliders(sliders.clone(), &HeroSliderConfig::default()).is_empty());

        let config = HeroSliderConfig {
            slider_ids: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let ids: Vec<String> = select_sliders(sliders, &config).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_subcategory_grid_is_capped() {
        let subs: Vec<Subcategory> = (0..9)
            .map(|i| Subcategory { id: i.to_string(), name: format!("S{}", i), slug: None, image_url: None, is_active: true })
            .collect();

        let config = SubcategoryConfig {
            subcategory_ids: None,
            button_subcategory_ids: Some(vec!["8".into(), "7".into()]),
        };
        let (grid, buttons) = select_subcategories(subs, &config, 6);
        assert_eq!(grid.len(), 6);
        assert_eq!(buttons.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["8", "7"]);
    }

    #[tokio::test]
    async fn test_section_name_is_authoritative_and_rechecked() {
        let resolver = resolver(CatalogFixture {
            products: vec![product("tagged", &["New Arrivals"]), product("untagged", &[])],
            ..Default::default()
        });

        let mut s = section("s1", SectionType::ProductCarousel, 3);
        s.config = SectionConfig::ProductCarousel(ProductQueryConfig {
            section: Some("New Arrivals".into()),
            is_featured: Some(true),
            ..Default::default()
        });

        let data = resolver.resolve(&s, Viewport::Desktop).await.unwrap();
        let SectionData::Products(products) = data else {
            panic!("expected products");
        };
        assert_eq!(products.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["tagged"]);
    }

    #[rstest]
    #[case(SectionType::NewArrivals)]
    #[case(SectionType::TopSelling)]
    #[tokio::test]
    async fn test_unflagged_product_sections_are_unfiltered(#[case] kind: SectionType) {
        let mut plain = product("plain", &[]);
        plain.is_featured = false;
        let resolver = resolver(CatalogFixture {
            products: vec![plain],
            ..Default::default()
        });

        let data = resolver.resolve(&section("s", kind, 3), Viewport::Desktop).await.unwrap();
        let SectionData::Products(products) = data else {
            panic!("expected products");
        };
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_tabs_use_mobile_limit() {
        let products = (0..10).map(|i| product(&format!("p{}", i), &[])).collect();
        let resolver = resolver(CatalogFixture { products, ..Default::default() });

        let mut s = section("tabs", SectionType::ProductTabs, 4);
        s.config = SectionConfig::ProductTabs(ProductTabsConfig {
            tabs: vec![ProductTab {
                label: "Featured".into(),
                query: ProductQueryConfig { is_featured: Some(true), limit: Some(10), ..Default::default() },
            }],
        });

        let SectionData::ProductTabs(mobile) = resolver.resolve(&s, Viewport::Mobile).await.unwrap() else {
            panic!("expected tabs");
        };
        assert_eq!(mobile[0].products.len(), 6);

        let SectionData::ProductTabs(desktop) = resolver.resolve(&s, Viewport::Desktop).await.unwrap() else {
            panic!("expected tabs");
        };
        assert_eq!(desktop[0].products.len(), 10);
    }

    #[tokio::test]
    async fn test_banner_prefers_config_image_without_fetch() {
        let catalog = Arc::new(MemoryCatalog::new(CatalogFixture {
            banners: vec![banner("b1", true)],
            ..Default::default()
        }));
        let resolver = SectionResolver::new(catalog.clone(), ResolverOptions::default());

        let mut s = section("s", SectionType::BannerFullWidth, 5);
        s.config = SectionConfig::BannerFullWidth(BannerConfig {
            banner_id: Some("b1".into()),
            image_url: Some("/inline.jpg".into()),
            ..Default::default()
        });

        let SectionData::Banner(image) = resolver.resolve(&s, Viewport::Desktop).await.unwrap() else {
            panic!("expected banner");
        };
        assert_eq!(image.image_url, "/inline.jpg");
        assert_eq!(catalog.request_count(), 0);
    }

    #[tokio::test]
    async fn test_banner_lookup_and_fallbacks() {
        let resolver = resolver(CatalogFixture {
            banners: vec![banner("live", true), banner("off", false)],
            ..Default::default()
        });

        let lookup = |id: &str, mobile: Option<&str>| {
            let mut s = section("s", SectionType::BannerFullWidth, 5);
            s.config = SectionConfig::BannerFullWidth(BannerConfig {
                banner_id: Some(id.into()),
                mobile_image_url: mobile.map(String::from),
                ..Default::default()
            });
            s
        };

        let SectionData::Banner(live) = resolver.resolve(&lookup("live", None), Viewport::Desktop).await.unwrap() else {
            panic!("expected banner");
        };
        assert_eq!(live.image_url, "/banners/live.jpg");
        assert_eq!(live.banner_id.as_deref(), Some("live"));

        let SectionData::Banner(fallback) = resolver
            .resolve(&lookup("off", Some("/m.jpg")), Viewport::Desktop)
            .await
            .unwrap()
        else {
            panic!("expected banner");
        };
        assert_eq!(fallback.image_url, "/m.jpg");

        assert!(resolver.resolve_data(&lookup("missing", None), Viewport::Desktop).await.is_none());
    }

    #[tokio::test]
    async fn test_video_prefers_configured_id() {
        let video = |id: &str| VideoBanner {
            id: id.into(),
            title: None,
            video_url: format!("/{}.mp4", id),
            poster_url: None,
            link: None,
            is_active: true,
        };
        let resolver = resolver(CatalogFixture {
            video_banners: vec![video("v1"), video("v2")],
            ..Default::default()
        });

        let mut s = section("s", SectionType::VideoBanner, 5);
        s.config = SectionConfig::VideoBanner(VideoBannerConfig { video_banner_id: Some("v2".into()) });
        let SectionData::VideoBanner(chosen) = resolver.resolve(&s, Viewport::Desktop).await.unwrap() else {
            panic!("expected video");
        };
        assert_eq!(chosen.id, "v2");

        s.config = SectionConfig::VideoBanner(VideoBannerConfig::default());
        let SectionData::VideoBanner(first) = resolver.resolve(&s, Viewport::Desktop).await.unwrap() else {
            panic!("expected video");
        };
        assert_eq!(first.id, "v1");
    }

    #[tokio::test]
    async fn test_static_types_need_no_catalog() {
        let catalog = Arc::new(MemoryCatalog::default());
        let resolver = SectionResolver::new(catalog.clone(), ResolverOptions::default());

        let s = section("t", SectionType::ScrollingText, 1);
        assert_eq!(resolver.resolve(&s, Viewport::Desktop).await.unwrap(), SectionData::Static);
        assert_eq!(catalog.request_count(), 0);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = resolver(CatalogFixture {
            products: vec![product("a", &["Sale"]), product("b", &["Sale"])],
            ..Default::default()
        });
        let mut s = section("s", SectionType::TopSelling, 2);
        s.config = SectionConfig::TopSelling(ProductQueryConfig { section: Some("Sale".into()), ..Default::default() });

        let first = resolver.resolve(&s, Viewport::Desktop).await.unwrap();
        let second = resolver.resolve(&s, Viewport::Desktop).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
