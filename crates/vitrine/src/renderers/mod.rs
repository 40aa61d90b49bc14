// File: src/renderers/mod.rs
// Purpose: Built-in renderers, one per section type, plus shared node helpers

mod banner;
mod brand;
mod category;
mod extras;
mod hero;
mod product;
mod ticker;

use crate::error::Error;
use crate::fragment::Node;
use crate::registry::{RenderContext, RendererRegistry};
use crate::resolver::SectionData;
use crate::section::{Section, SectionType};

pub(crate) fn register_defaults(registry: &mut RendererRegistry) {
    registry
        .register(SectionType::HeroSlider, hero::render_hero_slider)
        .register(SectionType::ScrollingText, ticker::render_scrolling_text)
        .register(SectionType::CategoryFeatured, category::render_categories)
        .register(SectionType::CategoryGrid, category::render_categories)
        .register(SectionType::CategoryCircles, category::render_categories)
        .register(SectionType::DepartmentGrid, category::render_departments)
        .register(SectionType::FeaturedCollections, category::render_subcategories)
        .register(SectionType::SubcategoryGrid, category::render_subcategories)
        .register(SectionType::ProductTabs, product::render_product_tabs)
        .register(SectionType::ProductCarousel, product::render_products)
        .register(SectionType::NewArrivals, product::render_products)
        .register(SectionType::TopSelling, product::render_products)
        .register(SectionType::BannerFullWidth, banner::render_banner)
        .register(SectionType::VideoBanner, banner::render_video_banner)
        .register(SectionType::BrandMarquee, brand::render_brands)
        .register(SectionType::BrandGrid, brand::render_brands)
        .register(SectionType::CollectionLinks, extras::render_collection_links)
        .register(SectionType::NewsletterSocial, extras::render_newsletter)
        .register(SectionType::CustomHtml, extras::render_custom_html);
}

/// Error for a renderer handed data of the wrong shape
pub(crate) fn mismatch(section: &Section, data: &SectionData) -> Error {
    let got = match data {
        SectionData::Static => "static",
        SectionData::Sliders(_) => "sliders",
        SectionData::Categories(_) => "categories",
        SectionData::Departments(_) => "departments",
        SectionData::ProductTabs(_) => "product tabs",
        SectionData::Products(_) => "products",
        SectionData::Subcategories { .. } => "subcategories",
        SectionData::Banner(_) => "banner",
        SectionData::VideoBanner(_) => "video banner",
        SectionData::Brands(_) => "brands",
    };
    Error::resolution(
        &section.id,
        format!("{} renderer received {} data", section.section_type(), got),
    )
}

/// Title and subtitle block, if the section has a title
pub(crate) fn heading(section: &Section) -> Option<Node> {
    let title = section.heading()?;
    Some(
        Node::el("header")
            .class("section-heading")
            .child(Node::with_text("h2", title))
            .child_opt(
                section
                    .subtitle
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| Node::with_text("p", s).class("section-subtitle")),
            ),
    )
}

/// Lazy image, falling back to the placeholder
pub(crate) fn image(src: Option<&str>, alt: &str, ctx: &RenderContext) -> Node {
    let src = src
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&ctx.placeholder_image);
    Node::el("img")
        .attr("src", src)
        .attr("alt", alt)
        .attr("loading", "lazy")
}

/// Anchor when there is a target, plain block otherwise
pub(crate) fn link_or_div(href: Option<&str>) -> Node {
    match href.filter(|h| !h.trim().is_empty()) {
        Some(href) => Node::el("a").attr("href", href),
        None => Node::el("div"),
    }
}

/// Storefront path for an entity: its slug when it has one, its id otherwise
pub(crate) fn entity_href(prefix: &str, slug: Option<&str>, id: &str) -> String {
    let key = slug.filter(|s| !s.is_empty()).unwrap_or(id);
    format!("{}/{}", prefix, urlencoding::encode(key))
}
