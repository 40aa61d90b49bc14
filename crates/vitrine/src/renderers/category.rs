use super::{entity_href, heading, image, mismatch};
use crate::error::Result;
use crate::fragment::{Behavior, Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::SectionData;
use crate::section::{Section, SectionType};

/// One tile of a category-like grid
fn tile(class: &str, href: String, name: &str, image_url: Option<&str>, ctx: &RenderContext) -> Node {
    Node::el("a")
        .class(class)
        .attr("href", href)
        .child(image(image_url, name, ctx))
        .child(Node::with_text("span", name))
}

fn section_block(section: &Section, class: &str, body: Node) -> Node {
    Node::el("div")
        .class(class)
        .child_opt(heading(section))
        .child(body)
}

/// Featured, grid and circle variants share the data and differ in layout class
pub(crate) fn render_categories(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Categories(categories) = data else {
        return Err(mismatch(section, data));
    };
    if categories.is_empty() {
        return Ok(None);
    }

    let (layout, tile_class) = match section.section_type() {
        SectionType::CategoryCircles => ("category-circles", "category-circle"),
        SectionType::CategoryFeatured => ("category-featured", "category-card"),
        _ => ("category-grid", "category-tile"),
    };

    let tiles = categories.iter().map(|c| {
        tile(
            tile_class,
            entity_href("/categories", c.slug.as_deref(), &c.id),
            &c.name,
            c.image_url.as_deref(),
            ctx,
        )
    });

    let root = section_block(section, layout, Node::el("div").class("tiles").children(tiles));
    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}

pub(crate) fn render_departments(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Departments(departments) = data else {
        return Err(mismatch(section, data));
    };
    if departments.is_empty() {
        return Ok(None);
    }

    let tiles = departments.iter().map(|d| {
        tile(
            "department-tile",
            entity_href("/departments", d.slug.as_deref(), &d.id),
            &d.name,
            d.image_url.as_deref(),
            ctx,
        )
    });

    let root = section_block(section, "department-grid", Node::el("div").class("tiles").children(tiles));
    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}

/// Grid slots plus the scrolling button strip
pub(crate) fn render_subcategories(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Subcategories { grid, buttons } = data else {
        return Err(mismatch(section, data));
    };
    if grid.is_empty() && buttons.is_empty() {
        return Ok(None);
    }

    let tiles = grid.iter().map(|s| {
        tile(
            "subcategory-tile",
            entity_href("/subcategories", s.slug.as_deref(), &s.id),
            &s.name,
            s.image_url.as_deref(),
            ctx,
        )
    });

    let strip = (!buttons.is_empty()).then(|| {
        Node::el("nav").class("subcategory-buttons").children(buttons.iter().map(|s| {
            Node::with_text("a", s.name.as_str())
                .class("subcategory-button")
                .attr("href", entity_href("/subcategories", s.slug.as_deref(), &s.id))
        }))
    });

    let layout = match section.section_type() {
        SectionType::FeaturedCollections => "featured-collections",
        _ => "subcategory-grid",
    };
    let body = Node::el("div")
        .child_opt((!grid.is_empty()).then(|| Node::el("div").class("tiles").children(tiles)))
        .child_opt(strip);

    let mut fragment = Fragment::new(&section.id, section.section_type(), &section.name, section_block(section, layout, body));
    if !buttons.is_empty() {
        fragment = fragment.with_behavior(Behavior::Marquee);
    }
    Ok(Some(fragment))
}
