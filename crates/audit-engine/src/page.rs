//! Page-state capability interface
//!
//! Every check reads the page through [`PageStateProvider`], one method per
//! query. A browser bridge, a headless renderer or a captured snapshot can
//! all implement it; [`StaticPage`] is the captured-snapshot implementation.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::NavigationTiming;
use std::fs;
use std::path::Path;

/// Queries the audit checks need from the page under inspection
pub trait PageStateProvider {
    /// Document title, if any
    fn title(&self) -> Option<String>;

    /// Value of the root element's language attribute
    fn language(&self) -> Option<String>;

    /// Content of the first meta tag whose `name` or `property` equals `key`.
    ///
    /// A tag that exists without content yields `Some("")`.
    fn meta(&self, key: &str) -> Option<String>;

    /// True if a `<link>` with the given `rel` is present
    fn has_link_rel(&self, rel: &str) -> bool;

    /// Raw bodies of embedded structured-data (JSON-LD) blocks, in document order
    fn structured_data(&self) -> Vec<String>;

    fn images(&self) -> Vec<Image>;

    /// Headings in document order
    fn headings(&self) -> Vec<Heading>;

    fn links(&self) -> Vec<Link>;

    fn interactive_elements(&self) -> Vec<InteractiveElement>;

    fn resource_timings(&self) -> Vec<ResourceTiming>;

    fn navigation_timing(&self) -> Option<NavigationTiming>;

    /// Milliseconds elapsed since navigation started
    fn time_since_navigation_start(&self) -> Option<f64>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl MetaTag {
    fn matches(&self, key: &str) -> bool {
        self.name.as_deref() == Some(key) || self.property.as_deref() == Some(key)
    }
}

/// `<link>` element in the document head
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadLink {
    pub rel: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Image {
    /// Alt text present and not just whitespace
    pub fn has_alt_text(&self) -> bool {
        self.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `h1` through 6 for `h6`
    pub level: u8,
    #[serde(default)]
    pub text: String,
}

/// Anchor element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub rel: Option<String>,
}

impl Link {
    /// True when the link has visible text, a title or an accessible name
    pub fn is_described(&self) -> bool {
        !self.text.trim().is_empty() || non_empty(&self.title) || non_empty(&self.aria_label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractiveKind {
    Button,
    /// Any element with `role="button"`
    RoleButton,
    Input,
    Select,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    pub kind: InteractiveKind,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub aria_labelledby: Option<String>,
    /// Element sits inside a `<label>`
    #[serde(default)]
    pub inside_label: bool,
}

impl InteractiveElement {
    pub fn has_accessible_name(&self) -> bool {
        non_empty(&self.aria_label) || non_empty(&self.aria_labelledby) || self.inside_label
    }
}

/// Resource timing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    pub name: String,
    /// Bytes transferred over the network, 0 when served from cache
    #[serde(default)]
    pub transfer_size: u64,
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Captured page state, typically exported from a browser session as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticPage {
    pub title: Option<String>,
    pub lang: Option<String>,
    pub metas: Vec<MetaTag>,
    pub head_links: Vec<HeadLink>,
    pub structured_data: Vec<String>,
    pub images: Vec<Image>,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub interactive_elements: Vec<InteractiveElement>,
    pub resources: Vec<ResourceTiming>,
    pub navigation_timing: Option<NavigationTiming>,
    /// `performance.now()` at capture time
    pub captured_at: Option<f64>,
}

impl StaticPage {
    /// Load a captured page state from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page state: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("Failed to parse page state JSON")
    }
}

impl PageStateProvider for StaticPage {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn language(&self) -> Option<String> {
        self.lang.clone()
    }

    fn meta(&self, key: &str) -> Option<String> {
        self.metas
            .iter()
            .find(|tag| tag.matches(key))
            .map(|tag| tag.content.clone().unwrap_or_default())
    }

    fn has_link_rel(&self, rel: &str) -> bool {
        self.head_links
            .iter()
            .any(|link| link.rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(rel)))
    }

    fn structured_data(&self) -> Vec<String> {
        self.structured_data.clone()
    }

    fn images(&self) -> Vec<Image> {
        self.images.clone()
    }

    fn headings(&self) -> Vec<Heading> {
        self.headings.clone()
    }

    fn links(&self) -> Vec<Link> {
        self.links.clone()
    }

    fn interactive_elements(&self) -> Vec<InteractiveElement> {
        self.interactive_elements.clone()
    }

    fn resource_timings(&self) -> Vec<ResourceTiming> {
        self.resources.clone()
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self.navigation_timing
    }

    fn time_since_navigation_start(&self) -> Option<f64> {
        let now = self.captured_at?;
        let start = self.navigation_timing.map_or(0.0, |t| t.navigation_start);
        Some((now - start).max(0.0))
    }
}
