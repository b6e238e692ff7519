//! The compiled-in table of supported Japanese tech blogs.
//!
//! Each row names a blog, its listing page, the host substring that selects
//! it, and the rules used to pull article links from the listing page and
//! body text from an article page. Supporting a new blog means adding a row.
//!
//! | Source | Link selector | Kept when href | Content |
//! |--------|---------------|----------------|---------|
//! | Qiita | `a[href^='/']` | contains `/items/` | `div.it-MdContent` |
//! | Zenn | `a[href^='/articles/']` | starts with `/articles/` | `article` |
//! | Hatena, Publickey, CodeIQ | `h2/h3.entry-title a` | absolute entry URL | paragraphs |
//! | Others | `a[href^='/blog/']` etc. | prefix plus slug | paragraphs |

use super::{ListingRule, SiteRule};

/// One supported blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogSource {
    pub name: &'static str,
    pub listing_url: &'static str,
    /// Selects this source when the URL's host contains it.
    pub host: &'static str,
    pub link_selector: &'static str,
    pub link_prefix: &'static str,
    pub link_contains: Option<&'static str>,
    /// Shorter hrefs are bare section links, not articles.
    pub min_href_len: usize,
    /// Base for relative hrefs; `None` when the listing links are absolute.
    pub origin: Option<&'static str>,
    pub content_selector: Option<&'static str>,
}

pub const BLOG_SOURCES: &[BlogSource] = &[
    BlogSource {
        name: "Qiita",
        listing_url: "https://qiita.com/",
        host: "qiita.com",
        link_selector: "a[href^='/']",
        link_prefix: "/",
        link_contains: Some("/items/"),
        min_href_len: 0,
        origin: Some("https://qiita.com"),
        content_selector: Some("div.it-MdContent"),
    },
    BlogSource {
        name: "Zenn",
        listing_url: "https://zenn.dev/",
        host: "zenn.dev",
        link_selector: "a[href^='/articles/']",
        link_prefix: "/articles/",
        link_contains: None,
        min_href_len: 0,
        origin: Some("https://zenn.dev"),
        content_selector: Some("article"),
    },
    BlogSource {
        name: "Japan Dev Blog",
        listing_url: "https://japan-dev.com/blog",
        host: "japan-dev.com",
        link_selector: "a[href^='/blog/']",
        link_prefix: "/blog/",
        link_contains: None,
        min_href_len: 7,
        origin: Some("https://japan-dev.com"),
        content_selector: None,
    },
    BlogSource {
        name: "Hatena Developer Blog",
        listing_url: "https://developer.hatenastaff.com/",
        host: "hatenastaff.com",
        link_selector: "h2.entry-title a",
        link_prefix: "https://developer.hatenastaff.com/entry/",
        link_contains: None,
        min_href_len: 0,
        origin: None,
        content_selector: None,
    },
    BlogSource {
        name: "TechCrunch Japan",
        listing_url: "https://jp.techcrunch.com/",
        host: "techcrunch.com",
        link_selector: "a.post-block__title__link",
        link_prefix: "https://jp.techcrunch.com/20",
        link_contains: None,
        min_href_len: 0,
        origin: None,
        content_selector: None,
    },
    BlogSource {
        name: "CodeIQ Magazine",
        listing_url: "https://codeiq.jp/magazine/",
        host: "codeiq.jp",
        link_selector: "h3.entry-title a",
        link_prefix: "https://codeiq.jp/magazine/",
        link_contains: None,
        min_href_len: 0,
        origin: None,
        content_selector: None,
    },
    BlogSource {
        name: "ITmedia News",
        listing_url: "https://www.itmedia.co.jp/news/",
        host: "itmedia.co.jp",
        link_selector: "a[href^='https://www.itmedia.co.jp/news/articles/']",
        link_prefix: "https://www.itmedia.co.jp/",
        link_contains: Some("/news/articles/"),
        min_href_len: 0,
        origin: None,
        content_selector: None,
    },
    BlogSource {
        name: "Publickey",
        listing_url: "https://www.publickey1.jp/",
        host: "publickey1.jp",
        link_selector: "h2.entry-title a",
        link_prefix: "https://www.publickey1.jp/blog/",
        link_contains: None,
        min_href_len: 0,
        origin: None,
        content_selector: None,
    },
    BlogSource {
        name: "Findy Engineer Lab",
        listing_url: "https://findy-code.io/engineer-lab",
        host: "findy-code.io",
        link_selector: "a[href^='/engineer-lab/']",
        link_prefix: "/engineer-lab/",
        link_contains: None,
        min_href_len: 16,
        origin: Some("https://findy-code.io"),
        content_selector: None,
    },
    BlogSource {
        name: "LIG Blog",
        listing_url: "https://liginc.co.jp/blog/",
        host: "liginc.co.jp",
        link_selector: "a[href^='/blog/']",
        link_prefix: "/blog/",
        link_contains: None,
        min_href_len: 7,
        origin: Some("https://liginc.co.jp"),
        content_selector: None,
    },
    BlogSource {
        name: "Mercari Engineering Blog",
        listing_url: "https://engineering.mercari.com/blog/",
        host: "engineering.mercari.com",
        link_selector: "a[href^='/blog/']",
        link_prefix: "/blog/",
        link_contains: None,
        min_href_len: 7,
        origin: Some("https://engineering.mercari.com"),
        content_selector: None,
    },
    BlogSource {
        name: "LINE Engineering Blog",
        listing_url: "https://engineering.linecorp.com/ja/blog/",
        host: "engineering.linecorp.com",
        link_selector: "a[href^='/ja/blog/']",
        link_prefix: "/ja/blog/",
        link_contains: None,
        min_href_len: 10,
        origin: Some("https://engineering.linecorp.com"),
        content_selector: None,
    },
    BlogSource {
        name: "CyberAgent Developers Blog",
        listing_url: "https://developers.cyberagent.co.jp/blog/",
        host: "developers.cyberagent.co.jp",
        link_selector: "a[href^='/blog/']",
        link_prefix: "/blog/",
        link_contains: None,
        min_href_len: 7,
        origin: Some("https://developers.cyberagent.co.jp"),
        content_selector: None,
    },
    BlogSource {
        name: "Yahoo! JAPAN Tech Blog",
        listing_url: "https://techblog.yahoo.co.jp/",
        host: "techblog.yahoo.co.jp",
        link_selector: "a[href^='/entry/']",
        link_prefix: "/entry/",
        link_contains: None,
        min_href_len: 0,
        origin: Some("https://techblog.yahoo.co.jp"),
        content_selector: None,
    },
];

/// Look a source up by name, ignoring ASCII case.
pub fn find_source(name: &str) -> Option<&'static BlogSource> {
    BLOG_SOURCES
        .iter()
        .find(|source| source.name.eq_ignore_ascii_case(name.trim()))
}

impl From<&BlogSource> for SiteRule {
    fn from(source: &BlogSource) -> Self {
        SiteRule {
            name: source.name.to_string(),
            host: source.host.to_string(),
            listing: Some(ListingRule {
                selector: source.link_selector.to_string(),
                prefix: source.link_prefix.to_string(),
                contains: source.link_contains.map(ToString::to_string),
                min_href_len: source.min_href_len,
                origin: source.origin.map(ToString::to_string),
            }),
            content_selector: source.content_selector.map(ToString::to_string),
        }
    }
}
