use super::{heading, link_or_div, mismatch};
use crate::error::Result;
use crate::fragment::{Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::{BannerImage, SectionData};
use crate::section::Section;

/// `<picture>` with a mobile source when one exists
pub(crate) fn banner_picture(image: &BannerImage, alt: &str) -> Node {
    Node::el("picture")
        .child_opt(image.mobile_image_url.as_deref().filter(|m| !m.trim().is_empty()).map(|m| {
            Node::el("source")
                .attr("media", "(max-width: 768px)")
                .attr("srcset", m)
        }))
        .child(
            Node::el("img")
                .attr("src", image.image_url.as_str())
                .attr("alt", alt)
                .attr("loading", "lazy"),
        )
}

pub(crate) fn render_banner(section: &Section, data: &SectionData, _ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Banner(image) = data else {
        return Err(mismatch(section, data));
    };

    let alt = image
        .alt
        .as_deref()
        .or(section.heading())
        .unwrap_or(&section.name);

    let root = Node::el("div")
        .class("banner-full-width")
        .child(link_or_div(image.link.as_deref()).child(banner_picture(image, alt)));

    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}

pub(crate) fn render_video_banner(section: &Section, data: &SectionData, _ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::VideoBanner(video) = data else {
        return Err(mismatch(section, data));
    };
    if video.video_url.trim().is_empty() {
        return Ok(None);
    }

    let player = Node::el("video")
        .attr("src", video.video_url.as_str())
        .attr_opt("poster", video.poster_url.as_deref())
        .attr("autoplay", "autoplay")
        .attr("muted", "muted")
        .attr("loop", "loop")
        .attr("playsinline", "playsinline");

    let root = Node::el("div")
        .class("video-banner")
        .child_opt(heading(section))
        .child(link_or_div(video.link.as_deref()).child(player))
        .child_opt(video.title.as_deref().map(|t| Node::with_text("p", t).class("video-title")));

    Ok(Some(Fragment::new(&section.id, section.section_type(), &section.name, root)))
}
