use super::mismatch;
use crate::error::Result;
use crate::fragment::{Behavior, Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::SectionData;
use crate::section::{Section, SectionConfig};

const DEFAULT_SPEED: u32 = 40;

/// Announcement ticker. Items repeat once so the loop has no gap.
pub(crate) fn render_scrolling_text(section: &Section, data: &SectionData, _ctx: &RenderContext) -> Result<Option<Fragment>> {
    let (SectionData::Static, SectionConfig::ScrollingText(config)) = (data, &section.config) else {
        return Err(mismatch(section, data));
    };

    let items: Vec<&str> = config
        .items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        return Ok(None);
    }

    let spans = items
        .iter()
        .chain(items.iter())
        .map(|item| Node::with_text("span", *item).class("ticker-item"));

    let root = Node::el("div")
        .class("scrolling-text")
        .attr("role", "marquee")
        .attr("data-speed", config.speed.unwrap_or(DEFAULT_SPEED).to_string())
        .child(Node::el("div").class("ticker-track").children(spans));

    Ok(Some(
        Fragment::new(&section.id, section.section_type(), &section.name, root).with_behavior(Behavior::Ticker),
    ))
}
