use super::{image, link_or_div, mismatch};
use crate::error::Result;
use crate::fragment::{Behavior, Fragment, Node};
use crate::registry::RenderContext;
use crate::resolver::{SectionData, Viewport};
use crate::section::{Section, SectionConfig};

const DEFAULT_AUTOPLAY_MS: u64 = 5000;

pub(crate) fn render_hero_slider(section: &Section, data: &SectionData, ctx: &RenderContext) -> Result<Option<Fragment>> {
    let SectionData::Sliders(sliders) = data else {
        return Err(mismatch(section, data));
    };
    if sliders.is_empty() {
        return Ok(None);
    }

    let autoplay = match &section.config {
        SectionConfig::HeroSlider(config) => config.autoplay_ms.unwrap_or(DEFAULT_AUTOPLAY_MS),
        _ => DEFAULT_AUTOPLAY_MS,
    };

    let slides = sliders.iter().enumerate().map(|(i, slider)| {
        let src = match ctx.viewport {
            Viewport::Mobile => slider.mobile_image_url.as_deref().or(Some(slider.image_url.as_str())),
            Viewport::Desktop => Some(slider.image_url.as_str()),
        };
        let alt = slider.title.as_deref().unwrap_or(&section.name);

        let caption = slider.title.as_ref().map(|title| {
            Node::el("div")
                .class("hero-caption")
                .child(Node::with_text("h2", title.as_str()))
                .child_opt(slider.subtitle.as_deref().map(|s| Node::with_text("p", s)))
                .child_opt(
                    slider
                        .button_text
                        .as_deref()
                        .map(|b| Node::with_text("span", b).class("hero-button")),
                )
        });

        let mut slide = Node::el("div")
            .class(if i == 0 { "hero-slide active" } else { "hero-slide" })
            .attr("data-index", i.to_string())
            .child(link_or_div(slider.link.as_deref()).child(image(src, alt, ctx)))
            .child_opt(caption);
        // The first slide is above the fold
        if i == 0 {
            slide = slide.attr("data-eager", "true");
        }
        slide
    });

    let dots = (0..sliders.len()).map(|i| {
        Node::el("button")
            .class("hero-dot")
            .attr("type", "button")
            .attr("data-index", i.to_string())
            .attr("aria-label", format!("Slide {}", i + 1))
    });

    let root = Node::el("div")
        .class("hero-slider")
        .attr("data-autoplay", autoplay.to_string())
        .child(Node::el("div").class("hero-track").children(slides))
        .child_opt((sliders.len() > 1).then(|| Node::el("div").class("hero-dots").children(dots)));

    Ok(Some(
        Fragment::new(&section.id, section.section_type(), &section.name, root).with_behavior(Behavior::Carousel),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Slider;
    use crate::section::fixtures::section;
    use crate::section::SectionType;
    use maud::Render;

    fn slider(id: &str, mobile: Option<&str>) -> Slider {
        Slider {
            id: id.into(),
            title: Some(format!("Slide {}", id)),
            subtitle: None,
            image_url: format!("/{}.jpg", id),
            mobile_image_url: mobile.map(String::from),
            link: Some("/offers".into()),
            button_text: Some("Shop".into()),
            order: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_empty_sliders_render_nothing() {
        let s = section("hero", SectionType::HeroSlider, 0);
        let result = render_hero_slider(&s, &SectionData::Sliders(vec![]), &RenderContext::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_slides_and_behavior() {
        let s = section("hero", SectionType::HeroSlider, 0);
        let data = SectionData::Sliders(vec![slider("a", None), slider("b", None)]);
        let fragment = render_hero_slider(&s, &data, &RenderContext::default()).unwrap().unwrap();

        let html = fragment.to_markup().into_string();
        assert!(html.contains("data-behavior=\"carousel\""));
        assert!(html.contains("src=\"/a.jpg\""));
        assert!(html.contains("hero-dots"));
        assert!(html.contains("data-autoplay=\"5000\""));
    }

    #[test]
    fn test_mobile_image() {
        let s = section("hero", SectionType::HeroSlider, 0);
        let data = SectionData::Sliders(vec![slider("a", Some("/a-m.jpg"))]);
        let ctx = RenderContext {
            viewport: Viewport::Mobile,
            ..Default::default()
        };
        let fragment = render_hero_slider(&s, &data, &ctx).unwrap().unwrap();
        let html = fragment.root.render().into_string();
        assert!(html.contains("src=\"/a-m.jpg\""));
        assert!(!html.contains("hero-dots"));
    }
}
