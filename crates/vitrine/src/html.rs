// File: src/html.rs
// Purpose: Server-side HTML for a composed homepage

use crate::config::LazyMode;
use crate::pipeline::{Composition, Document, Slot};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

/// Wires up carousels, tabs, marquees and tickers. Safe to run again after
/// new fragments arrive: initialized elements are marked and skipped.
const BEHAVIOR_SCRIPT: &str = r#"
(function () {
  function init(root) {
    root.querySelectorAll('[data-behavior]').forEach(function (el) {
      if (el.dataset.initialized) return;
      el.dataset.initialized = 'true';
      var kinds = el.dataset.behavior.split(' ');
      if (kinds.indexOf('carousel') >= 0) {
        var track = el.querySelector('.hero-track, .product-track');
        var delay = parseInt((el.querySelector('[data-autoplay]') || el).dataset.autoplay || '0', 10);
        if (track && delay > 0) {
          setInterval(function () {
            var max = track.scrollWidth - track.clientWidth;
            track.scrollTo({ left: track.scrollLeft >= max ? 0 : track.scrollLeft + track.clientWidth, behavior: 'smooth' });
          }, delay);
        }
      }
      if (kinds.indexOf('tabs') >= 0) {
        el.querySelectorAll('[role=tab]').forEach(function (tab) {
          tab.addEventListener('click', function () {
            el.querySelectorAll('[role=tab]').forEach(function (t) { t.classList.toggle('active', t === tab); });
            el.querySelectorAll('[role=tabpanel]').forEach(function (panel) {
              panel.hidden = panel.dataset.tab !== tab.dataset.tab;
            });
          });
        });
      }
      if (kinds.indexOf('marquee') >= 0 || kinds.indexOf('ticker') >= 0) {
        el.classList.add('is-scrolling');
      }
    });
  }
  document.addEventListener('DOMContentLoaded', function () { init(document); });
  document.addEventListener('htmx:afterSwap', function (e) { init(e.target.parentNode || document); });
})();
"#;

/// Full HTML page
pub fn page(title: &str, header: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(HTMX_SRC) defer {}
            }
            body {
                (header)
                (body)
                script { (PreEscaped(BEHAVIOR_SCRIPT)) }
            }
        }
    }
}

/// Endpoint a client-side placeholder loads its section from
pub fn fragment_url(section_id: &str) -> String {
    format!("/sections/{}/fragment", urlencoding::encode(section_id))
}

pub fn slot(slot: &Slot, mode: LazyMode) -> Markup {
    match slot {
        Slot::Rendered(fragment) => fragment.to_markup(),
        Slot::Placeholder(p) => match mode {
            LazyMode::Client => html! {
                div.lazy-section
                    data-section-id=(p.section_id)
                    data-section-type=(p.kind.as_str())
                    hx-get=(fragment_url(&p.section_id))
                    hx-trigger="revealed once"
                    hx-swap="outerHTML" {
                    div.lazy-skeleton aria-busy="true" {}
                }
            },
            // Inline pages load everything before sending; anything left is dropped
            LazyMode::Inline => html! {},
        },
        Slot::Stacked { top, bottom } => html! {
            div.banner-stack {
                (self::slot(top, mode))
                (self::slot(bottom, mode))
            }
        },
        Slot::Error { section_id, kind, message, .. } => html! {
            div.section-error data-section-id=(section_id) data-section-type=(kind.as_str()) style="color:#b91c1c;font-size:.85rem" {
                "Section failed to load: " (message)
            }
        },
    }
}

pub fn document(doc: &Document, mode: LazyMode) -> Markup {
    page(
        "Home",
        html! {
            @for s in &doc.pre_header {
                (slot(s, mode))
            }
            header.site-header {}
        },
        html! {
            main.homepage {
                @for s in &doc.body {
                    (slot(s, mode))
                }
            }
        },
    )
}

pub fn no_content(reason: &str) -> Markup {
    page(
        "Home",
        html! { header.site-header {} },
        html! {
            main.homepage {
                div.no-content data-reason=(reason) {
                    p { "No homepage content is available right now. Please check back soon." }
                }
            }
        },
    )
}

pub fn composition(composition: &Composition, mode: LazyMode) -> Markup {
    match composition {
        Composition::Done(doc) => document(doc, mode),
        Composition::NoContent { reason } => no_content(reason),
    }
}
