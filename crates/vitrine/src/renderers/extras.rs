use super::{heading, image, mismatch};
use crate::error::Result;
use crate::fragment::{Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::SectionData;
use crate::section::{Section, SectionConfig};

pub(crate) fn render_collection_links(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let (SectionData::Static, SectionConfig::CollectionLinks(config)) = (data, &section.config) else {
        return Err(mismatch(section, data));
    };

    let links: Vec<Node> = config
        .links
        .iter()
        .filter(|l| !l.label.trim().is_empty() && !l.url.trim().is_empty())
        .map(|l| {
            Node::el("a")
                .class("collection-link")
                .attr("href", l.url.as_str())
                .child_opt(l.image_url.as_deref().map(|src| image(Some(src), &l.label, ctx)))
                .child(Node::with_text("span", l.label.as_str()))
        })
        .collect();
    if links.is_empty() {
        return Ok(None);
    }

    let root = Node::el("div")
        .class("collection-links")
        .child_opt(heading(section))
        .child(Node::el("nav").children(links));

    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}

pub(crate) fn render_newsletter(section: &Section, data: &SectionData, _ctx: &RenderContext) -> Result<Option<Fragment>> {
    let (SectionData::Static, SectionConfig::NewsletterSocial(config)) = (data, &section.config) else {
        return Err(mismatch(section, data));
    };

    let form = Node::el("form")
        .class("newsletter-form")
        .attr("method", "post")
        .attr("action", "/newsletter")
        .child(
            Node::el("input")
                .attr("type", "email")
                .attr("name", "email")
                .attr("required", "required")
                .attr("placeholder", config.placeholder.as_deref().unwrap_or("Your email address")),
        )
        .child(
            Node::with_text("button", config.button_text.as_deref().unwrap_or("Subscribe")).attr("type", "submit"),
        );

    let socials = config
        .social_links
        .iter()
        .filter(|l| !l.url.trim().is_empty())
        .map(|l| {
            Node::with_text("a", l.platform.as_str())
                .class(&format!("social-link social-{}", l.platform.to_ascii_lowercase()))
                .attr("href", l.url.as_str())
                .attr("rel", "noopener")
                .attr("target", "_blank")
        });

    let root = Node::el("div")
        .class("newsletter-social")
        .child_opt(heading(section))
        .child_opt(section.description.as_deref().map(|d| Node::with_text("p", d)))
        .child(form)
        .child(Node::el("div").class("social-links").children(socials));

    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}

/// Admin-authored markup, emitted as is
pub(crate) fn render_custom_html(section: &Section, data: &SectionData, _ctx: &RenderContext) -> Result<Option<Fragment>> {
    let (SectionData::Static, SectionConfig::CustomHtml(config)) = (data, &section.config) else {
        return Err(mismatch(section, data));
    };
    if config.html.trim().is_empty() {
        return Ok(None);
    }

    let root = Node::el("div")
        .class("custom-html")
        .child_opt(heading(section))
        .child(Node::raw(config.html.as_str()));

    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}
