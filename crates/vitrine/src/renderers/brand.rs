use super::{entity_href, heading, image, mismatch};
use crate::catalog::Brand;
use crate::error::Result;
use crate::fragment::{Behavior, Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::SectionData;
use crate::section::{Section, SectionType};

/// Marquee scrolls a doubled strip of logos; the grid lays them out once
pub(crate) fn render_brands(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Brands(brands) = data else {
        return Err(mismatch(section, data));
    };
    if brands.is_empty() {
        return Ok(None);
    }

    let logo = |brand: &Brand| {
        Node::el("a")
            .class("brand-logo")
            .attr("href", entity_href("/brands", brand.slug.as_deref(), &brand.id))
            .attr("title", brand.name.as_str())
            .child(image(brand.logo_url.as_deref(), &brand.name, ctx))
    };

    let marquee = section.section_type() == SectionType::BrandMarquee;
    let logos: Vec<Node> = if marquee {
        brands.iter().chain(brands.iter()).map(logo).collect()
    } else {
        brands.iter().map(logo).collect()
    };

    let root = Node::el("div")
        .class(if marquee { "brand-marquee" } else { "brand-grid" })
        .child_opt(heading(section))
        .child(Node::el("div").class("brand-track").children(logos));

    let fragment = Fragment::new(&section.id, section.section_type(), &section.name, root);
    Ok(Some(if marquee {
        fragment.with_behavior(Behavior::Marquee)
    } else {
        fragment
    }))
}
