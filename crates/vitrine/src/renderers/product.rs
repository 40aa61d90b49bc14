use super::{entity_href, heading, image, mismatch};
use crate::catalog::Product;
use crate::error::Result;
use crate::fragment::{Behavior, Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::SectionData;
use crate::section::Section;

fn format_price(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn product_card(product: &Product, ctx: &RenderContext) -> Node {
    let price = Node::el("div").class("product-price").child(
        Node::with_text("span", format_price(product.display_price())).class("price-current"),
    );
    let price = if product.display_price() < product.price {
        price.child(Node::with_text("del", format_price(product.price)).class("price-original"))
    } else {
        price
    };

    Node::el("article")
        .class("product-card")
        .attr("data-product-id", product.id.as_str())
        .child_opt(
            product
                .discount
                .filter(|d| *d > 0)
                .map(|d| Node::with_text("span", format!("-{}%", d)).class("product-badge")),
        )
        .child(
            Node::el("a")
                .attr("href", entity_href("/products", product.slug.as_deref(), &product.id))
                .child(image(product.image_url.as_deref(), &product.name, ctx))
                .child(Node::with_text("h3", product.name.as_str())),
        )
        .child_opt(product.brand.as_deref().map(|b| Node::with_text("p", b).class("product-brand")))
        .child(price)
}

fn product_track(products: &[Product], ctx: &RenderContext) -> Node {
    Node::el("div")
        .class("product-track")
        .children(products.iter().map(|p| product_card(p, ctx)))
}

/// Carousel, new arrivals and top selling
pub(crate) fn render_products(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Products(products) = data else {
        return Err(mismatch(section, data));
    };
    if products.is_empty() {
        return Ok(None);
    }

    let root = Node::el("div")
        .class("product-carousel")
        .attr("data-section-kind", section.section_type().as_str())
        .child_opt(heading(section))
        .child(product_track(products, ctx));

    Ok(Some(
        Fragment::new(&section.id, section.section_type(), &section.name, root).with_behavior(Behavior::Carousel),
    ))
}

/// Tab buttons plus one panel per non-empty tab; the first panel starts visible
pub(crate) fn render_product_tabs(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::ProductTabs(tabs) = data else {
        return Err(mismatch(section, data));
    };

    let tabs: Vec<_> = tabs.iter().filter(|t| !t.products.is_empty()).collect();
    if tabs.is_empty() {
        return Ok(None);
    }

    let buttons = tabs.iter().enumerate().map(|(i, tab)| {
        Node::with_text("button", tab.label.as_str())
            .class(if i == 0 { "tab-button active" } else { "tab-button" })
            .attr("type", "button")
            .attr("role", "tab")
            .attr("data-tab", i.to_string())
    });

    let panels = tabs.iter().enumerate().map(|(i, tab)| {
        let panel = Node::el("div")
            .class("tab-panel")
            .attr("role", "tabpanel")
            .attr("data-tab", i.to_string())
            .child(product_track(&tab.products, ctx));
        if i == 0 {
            panel
        } else {
            panel.attr("hidden", "hidden")
        }
    });

    let root = Node::el("div")
        .class("product-tabs")
        .child_opt(heading(section))
        .child(Node::el("div").class("tab-list").attr("role", "tablist").children(buttons))
        .children(panels);

    Ok(Some(
        Fragment::new(&section.id, section.section_type(), &section.name, root).with_behavior(Behavior::Tabs),
    ))
}
