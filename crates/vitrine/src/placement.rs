// File: src/placement.rs
// Purpose: Banner Placement Resolver. Turns a location directive into an insertion index.

use crate::error::{Error, Result};
use crate::section::SectionType;
use serde::Serialize;
use tracing::warn;

/// A parsed banner location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Top,
    Bottom,
    Middle,
    BeforeFooter,
    /// `after-section-{id}`
    AfterSection(String),
    /// `after-{token}`: id, alias or name
    After(String),
    Unknown(String),
}

impl Location {
    /// Parse a directive (pure function)
    ///
    /// # Examples
    /// ```
    /// use vitrine::placement::Location;
    ///
    /// assert_eq!(Location::parse(" Top "), Location::Top);
    /// assert_eq!(Location::parse("after-section-42"), Location::AfterSection("42".to_string()));
    /// assert_eq!(Location::parse("after-hero"), Location::After("hero".to_string()));
    /// assert_eq!(Location::parse("sidebar"), Location::Unknown("sidebar".to_string()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let location = raw.trim();
        let lower = location.to_ascii_lowercase();

        match lower.as_str() {
            "top" => return Location::Top,
            "bottom" => return Location::Bottom,
            "middle" => return Location::Middle,
            "before-footer" => return Location::BeforeFooter,
            _ => {}
        }

        if lower.starts_with("after-section-") {
            return Location::AfterSection(location["after-section-".len()..].to_string());
        }
        if lower.starts_with("after-") && location.len() > "after-".len() {
            return Location::After(location["after-".len()..].to_string());
        }
        Location::Unknown(location.to_string())
    }
}

/// One top-level element of the composed flow, as the resolver sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEntry<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub kind: SectionType,
}

/// How an insertion point was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    Top,
    Bottom,
    Middle,
    SectionId,
    Alias,
    Name,
    /// Nothing matched; appended at the end
    Fallback,
}

/// Where to splice a banner: before `flow[index]`, or at the end when `index == flow.len()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub index: usize,
    pub rule: MatchRule,
}

fn alias_matches(token: &str, kind: SectionType) -> bool {
    match token.to_ascii_lowercase().as_str() {
        "hero" | "slider" | "hero-slider" => kind == SectionType::HeroSlider,
        "categories" | "category" => kind.is_category_family(),
        _ => false,
    }
}

fn name_matches(token: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    let token = token.to_lowercase();
    if token.is_empty() {
        return false;
    }
    name.contains(&token) || name.contains(&token.replace(['-', '_'], " "))
}

/// Index just after `anchor`, past any banners already placed there, so
/// banners sharing an anchor keep their relative order
fn after(flow: &[FlowEntry<'_>], anchor: usize) -> usize {
    let mut index = anchor + 1;
    while index < flow.len() && flow[index].kind.is_banner() {
        index += 1;
    }
    index
}

fn at_start(flow: &[FlowEntry<'_>]) -> usize {
    flow.iter().take_while(|e| e.kind.is_banner()).count()
}

/// Resolve a location against the flow, or report why it cannot be (pure function)
pub fn try_place(location: &str, flow: &[FlowEntry<'_>]) -> Result<InsertionPoint> {
    let point = |index, rule| Ok(InsertionPoint { index, rule });

    match Location::parse(location) {
        Location::Top => point(at_start(flow), MatchRule::Top),
        Location::Bottom | Location::BeforeFooter => point(flow.len(), MatchRule::Bottom),
        Location::Middle => point(flow.len() / 2, MatchRule::Middle),
        Location::AfterSection(id) => match flow.iter().position(|e| e.id == id) {
            Some(i) => point(after(flow, i), MatchRule::SectionId),
            None => Err(Error::PlacementFallback {
                location: location.trim().to_string(),
            }),
        },
        Location::After(token) => {
            if let Some(i) = flow.iter().position(|e| e.id == token) {
                return point(after(flow, i), MatchRule::SectionId);
            }
            if let Some(i) = flow.iter().position(|e| alias_matches(&token, e.kind)) {
                return point(after(flow, i), MatchRule::Alias);
            }
            if let Some(i) = flow.iter().position(|e| name_matches(&token, e.name)) {
                return point(after(flow, i), MatchRule::Name);
            }
            Err(Error::PlacementFallback {
                location: location.trim().to_string(),
            })
        }
        Location::Unknown(other) => Err(Error::PlacementFallback { location: other }),
    }
}

/// Resolve a location against the flow. Never fails: anything unresolvable
/// is appended at the end with a warning.
pub fn place(location: &str, flow: &[FlowEntry<'_>]) -> InsertionPoint {
    try_place(location, flow).unwrap_or_else(|e| {
        match Location::parse(location) {
            Location::Unknown(_) => warn!(location, "unknown banner location, appending at bottom"),
            _ => warn!(location, error = %e, "banner anchor not found, appending at bottom"),
        }
        InsertionPoint {
            index: flow.len(),
            rule: MatchRule::Fallback,
        }
    })
}
