//! Blog scrapers: the site adapter registry and the article fetcher.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing**: Pull article URLs from a blog's listing page
//! 2. **Fetching**: Download each article and normalize it to an [`Article`](crate::models::Article)
//!
//! Each supported blog is one row in [`sites::BLOG_SOURCES`]. A row compiles
//! into a [`SiteAdapter`], and [`AdapterRegistry::resolve`] picks the first
//! adapter whose host predicate matches a URL.
//!
//! # Fallbacks
//!
//! - A URL with no adapter still gets its content extracted from `<p>` elements,
//!   but yields no links from a listing page.
//! - An adapter whose content selector finds nothing (layout drift) also falls
//!   back to `<p>` elements rather than failing the article.

pub mod fetcher;
pub mod sites;

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::error::AdapterError;
use crate::utils::collapse_whitespace;

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector"));

/// Uncompiled description of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRule {
    pub name: String,
    pub host: String,
    pub listing: Option<ListingRule>,
    pub content_selector: Option<String>,
}

/// Uncompiled listing-page rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRule {
    pub selector: String,
    pub prefix: String,
    pub contains: Option<String>,
    pub min_href_len: usize,
    pub origin: Option<String>,
}

#[derive(Debug, Clone)]
struct CompiledListing {
    selector: Selector,
    prefix: String,
    contains: Option<String>,
    min_href_len: usize,
    origin: Option<Url>,
}

impl CompiledListing {
    fn accepts(&self, href: &str) -> bool {
        href.starts_with(&self.prefix)
            && href.len() >= self.min_href_len
            && self
                .contains
                .as_deref()
                .is_none_or(|needle| href.contains(needle))
    }

    /// Absolute URL for an accepted href. With an origin, the href must stay
    /// on that origin; protocol-relative or absolute hrefs pointing elsewhere
    /// are rejected.
    fn complete(&self, href: &str) -> Option<String> {
        let resolved = match &self.origin {
            Some(origin) => {
                let url = origin.join(href).ok()?;
                (url.origin() == origin.origin()).then_some(url)
            }
            None => Url::parse(href).ok(),
        };
        resolved.map(String::from)
    }
}

/// Compiled extraction rules for one site.
#[derive(Debug, Clone)]
pub struct SiteAdapter {
    name: String,
    host: String,
    listing: Option<CompiledListing>,
    content: Option<Selector>,
}

fn compile_selector(site: &str, selector: &str) -> Result<Selector, AdapterError> {
    Selector::parse(selector).map_err(|e| AdapterError::Selector {
        site: site.to_string(),
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

impl SiteAdapter {
    pub fn compile(rule: SiteRule) -> Result<Self, AdapterError> {
        let listing = rule
            .listing
            .map(|listing| -> Result<CompiledListing, AdapterError> {
                let origin = listing
                    .origin
                    .map(|origin| {
                        Url::parse(&origin).map_err(|source| AdapterError::Origin {
                            site: rule.name.clone(),
                            origin,
                            source,
                        })
                    })
                    .transpose()?;
                Ok(CompiledListing {
                    selector: compile_selector(&rule.name, &listing.selector)?,
                    prefix: listing.prefix,
                    contains: listing.contains,
                    min_href_len: listing.min_href_len,
                    origin,
                })
            })
            .transpose()?;
        let content = rule
            .content_selector
            .map(|selector| compile_selector(&rule.name, &selector))
            .transpose()?;

        Ok(Self {
            name: rule.name,
            host: rule.host,
            listing,
            content,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn matches_host(&self, host: &str) -> bool {
        host.contains(&self.host)
    }

    /// Absolute article URLs from a listing page, in document order, at most
    /// `max_count`. Repeated links are kept.
    pub fn listing_links(&self, document: &Html, max_count: usize) -> Vec<String> {
        let Some(rule) = &self.listing else {
            return Vec::new();
        };
        document
            .select(&rule.selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| rule.accepts(href))
            .filter_map(|href| rule.complete(href))
            .take(max_count)
            .collect()
    }

    fn site_content(&self, document: &Html) -> Option<String> {
        let selector = self.content.as_ref()?;
        let element = document.select(selector).next()?;
        let text = element
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .join(" ");
        let text = collapse_whitespace(&text);
        (!text.is_empty()).then_some(text)
    }
}

/// Body text of an article page.
///
/// Uses the adapter's content selector when it finds non-empty text, otherwise
/// joins every `<p>` element. Returns an empty string only when the page has
/// no paragraph text at all.
pub fn article_content(adapter: Option<&SiteAdapter>, document: &Html) -> String {
    if let Some(text) = adapter.and_then(|adapter| adapter.site_content(document)) {
        return text;
    }
    if let Some(adapter) = adapter {
        debug!(site = adapter.name(), "Content selector matched nothing; using paragraphs");
    }
    let paragraphs = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| p.text().collect::<String>())
        .join(" ");
    collapse_whitespace(&paragraphs)
}

/// `<title>` text trimmed at both ends, or `url` when the page has none or it
/// is blank.
pub fn page_title(document: &Html, url: &str) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| url.to_string())
}

/// Ordered adapter table with first-match selection.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    adapters: Vec<SiteAdapter>,
}

impl AdapterRegistry {
    pub fn new(rules: impl IntoIterator<Item = SiteRule>) -> Result<Self, AdapterError> {
        let adapters = rules
            .into_iter()
            .map(SiteAdapter::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { adapters })
    }

    /// Registry over every blog in [`sites::BLOG_SOURCES`].
    #[instrument(level = "debug")]
    pub fn builtin() -> Result<Self, AdapterError> {
        Self::new(sites::BLOG_SOURCES.iter().map(SiteRule::from))
    }

    pub fn adapters(&self) -> &[SiteAdapter] {
        &self.adapters
    }

    /// First adapter whose host predicate matches the URL's host.
    pub fn resolve(&self, url: &str) -> Option<&SiteAdapter> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        self.adapters.iter().find(|adapter| adapter.matches_host(host))
    }
}
