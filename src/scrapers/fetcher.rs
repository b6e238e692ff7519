//! HTTP fetching of listing pages and articles.
//!
//! [`ArticleFetcher::fetch`] turns one URL into an [`Article`] or a
//! [`FetchError`]. [`ArticleFetcher::fetch_latest`] indexes a listing page and
//! fetches each linked article one after another, in link order. Failed
//! articles are logged and skipped without failing the batch, and nothing is
//! retried. [`ArticleFetcher::fetch_all`] does the same for a URL list file
//! read with [`load_url_list`].

use std::path::Path;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::{AdapterRegistry, article_content, page_title};
use crate::error::{FetchError, UrlListError};
use crate::models::Article;
use crate::utils::truncate_for_log;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Article URLs from a list file's text, one per line. Blank lines are skipped
/// and surrounding whitespace is trimmed.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub async fn load_url_list(path: impl AsRef<Path>) -> Result<Vec<String>, UrlListError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| UrlListError {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parse_url_list(&text))
}

/// HTTP settings for an [`ArticleFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Whole-request timeout applied to every GET.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    client: Client,
    registry: AdapterRegistry,
}

impl ArticleFetcher {
    pub fn new(registry: AdapterRegistry, config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, registry })
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    async fn get_page(&self, url: &str) -> Result<String, FetchError> {
        Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| {
            if source.is_decode() {
                FetchError::Parse {
                    url: url.to_string(),
                    source,
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        })
    }

    /// Normalize an already downloaded article page.
    pub fn parse_article(&self, url: &str, body: &str) -> Article {
        let document = Html::parse_document(body);
        let adapter = self.registry.resolve(url);
        Article {
            url: url.to_string(),
            title: page_title(&document, url),
            content: article_content(adapter, &document),
        }
    }

    /// Fetch and normalize a single article.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Article, FetchError> {
        let body = match self.get_page(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, %url, "Failed to scrape article");
                return Err(e);
            }
        };
        let article = self.parse_article(url, &body);
        info!(
            title = %truncate_for_log(&article.title, 40),
            bytes = article.content.len(),
            "Fetched article"
        );
        Ok(article)
    }

    /// Article URLs from a listing page, at most `max_count`.
    #[instrument(level = "info", skip(self))]
    pub async fn index_articles(
        &self,
        listing_url: &str,
        max_count: usize,
    ) -> Result<Vec<String>, FetchError> {
        let adapter = self
            .registry
            .resolve(listing_url)
            .ok_or_else(|| FetchError::NoAdapterMatch {
                url: listing_url.to_string(),
            })?;
        let body = self.get_page(listing_url).await?;
        let links = {
            let document = Html::parse_document(&body);
            adapter.listing_links(&document, max_count)
        };
        info!(
            count = links.len(),
            site = adapter.name(),
            source = listing_url,
            "Indexed article URLs"
        );
        debug!(urls = ?links, "Article URLs");
        Ok(links)
    }

    /// Like [`fetch_latest`](Self::fetch_latest), but reports a listing-level
    /// failure instead of returning an empty list.
    #[instrument(level = "info", skip(self))]
    pub async fn try_fetch_latest(
        &self,
        listing_url: &str,
        max_count: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let links = self.index_articles(listing_url, max_count).await?;
        Ok(self.fetch_all(links).await)
    }

    /// Fetch each URL in order, dropping the ones that fail.
    pub async fn fetch_all<I>(&self, urls: I) -> Vec<Article>
    where
        I: IntoIterator<Item = String>,
    {
        let urls: Vec<String> = urls.into_iter().collect();
        let attempted = urls.len();

        let articles: Vec<Article> = stream::iter(urls)
            .then(|url: String| async move {
                match self.fetch(&url).await {
                    Ok(article) => Some(article),
                    Err(e) => {
                        debug!(error = %e, %url, "Dropping article");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(
            attempted,
            fetched = articles.len(),
            "Fetched article contents"
        );
        articles
    }

    /// Newest articles linked from `listing_url`, at most `max_count`.
    ///
    /// Returns an empty list when the listing page cannot be fetched, has no
    /// adapter, or no article could be fetched.
    pub async fn fetch_latest(&self, listing_url: &str, max_count: usize) -> Vec<Article> {
        match self.try_fetch_latest(listing_url, max_count).await {
            Ok(articles) => {
                if articles.is_empty() {
                    warn!(%listing_url, "No articles found; the blog layout may have changed");
                }
                articles
            }
            Err(e) => {
                warn!(error = %e, %listing_url, "Failed to fetch articles");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{ListingRule, SiteRule};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_page(title: &str, body: &str) -> String {
        format!("<html><head><title>{title}</title></head><body><div class=\"body\">{body}</div></body></html>")
    }

    fn test_fetcher(server: &MockServer, timeout: Duration) -> ArticleFetcher {
        let registry = AdapterRegistry::new([SiteRule {
            name: "Local".to_string(),
            host: "127.0.0.1".to_string(),
            listing: Some(ListingRule {
                selector: "a.post".to_string(),
                prefix: "/posts/".to_string(),
                contains: None,
                min_href_len: 8,
                origin: Some(server.uri()),
            }),
            content_selector: Some("div.body".to_string()),
        }])
        .unwrap();
        let config = FetchConfig {
            timeout,
            ..FetchConfig::default()
        };
        ArticleFetcher::new(registry, &config).unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_single_article() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/posts/rust",
            200,
            article_page(" Rust入門 ", "<p>Rust と\n Go</p>"),
        )
        .await;

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let url = format!("{}/posts/rust", server.uri());
        let article = fetcher.fetch(&url).await.unwrap();

        assert_eq!(article.url, url);
        assert_eq!(article.title, "Rust入門");
        assert_eq!(article.content, "Rust と Go");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_typed_failure() {
        let server = MockServer::start().await;
        mount_page(&server, "/posts/gone", 500, String::new()).await;

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let url = format!("{}/posts/gone", server.uri());
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 500));
        assert_eq!(err.url(), url);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let server = MockServer::start().await;
        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_page("slow", "late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server, Duration::from_millis(200));
        let err = fetcher
            .fetch(&format!("{}/posts/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_latest_isolates_failures_and_keeps_link_order() {
        let server = MockServer::start().await;
        let listing = r#"<html><body>
            <a class="post" href="/posts/one">1</a>
            <a class="post" href="/posts/two">2</a>
            <a class="post" href="/posts/missing">3</a>
            <a class="post" href="/posts/three">4</a>
            <a href="/about">about</a>
        </body></html>"#;
        mount_page(&server, "/list", 200, listing.to_string()).await;
        mount_page(&server, "/posts/one", 200, article_page("One", "Python")).await;
        mount_page(&server, "/posts/two", 500, String::new()).await;
        mount_page(&server, "/posts/three", 200, article_page("Three", "Go")).await;

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let articles = fetcher
            .fetch_latest(&format!("{}/list", server.uri()), 10)
            .await;

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three"]);
        assert_eq!(articles[1].content, "Go");
    }

    #[tokio::test]
    async fn test_fetch_latest_respects_max_count() {
        let server = MockServer::start().await;
        let listing = r#"<body>
            <a class="post" href="/posts/one">1</a>
            <a class="post" href="/posts/three">2</a>
        </body>"#;
        mount_page(&server, "/list", 200, listing.to_string()).await;
        mount_page(&server, "/posts/one", 200, article_page("One", "Python")).await;
        mount_page(&server, "/posts/three", 200, article_page("Three", "Go")).await;

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let articles = fetcher
            .fetch_latest(&format!("{}/list", server.uri()), 1)
            .await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "One");
    }

    #[tokio::test]
    async fn test_unreachable_listing_yields_empty_list() {
        let server = MockServer::start().await;
        mount_page(&server, "/list", 503, String::new()).await;

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let listing_url = format!("{}/list", server.uri());
        assert!(fetcher.fetch_latest(&listing_url, 5).await.is_empty());
        assert!(matches!(
            fetcher.try_fetch_latest(&listing_url, 5).await.unwrap_err(),
            FetchError::Status { .. }
        ));
    }

    #[tokio::test]
    async fn test_listing_without_adapter_is_no_adapter_match() {
        let server = MockServer::start().await;
        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let err = fetcher
            .try_fetch_latest("https://unknown.example/blog", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NoAdapterMatch { .. }));
        assert!(fetcher.fetch_latest("https://unknown.example/blog", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_url_list_skips_unreachable_urls() {
        let server = MockServer::start().await;
        mount_page(&server, "/posts/one", 200, article_page("One", "Rust")).await;
        mount_page(&server, "/posts/two", 200, article_page("Two", "Go")).await;

        let mut list = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut list,
            format!(
                "{uri}/posts/one\n\n   \nhttp://127.0.0.1:1/closed\n  {uri}/posts/two  \n{uri}/posts/unmounted\n",
                uri = server.uri()
            )
            .as_bytes(),
        )
        .unwrap();

        let urls = load_url_list(list.path()).await.unwrap();
        assert_eq!(urls.len(), 4);

        let fetcher = test_fetcher(&server, DEFAULT_TIMEOUT);
        let articles = fetcher.fetch_all(urls).await;
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(articles[1].url, format!("{}/posts/two", server.uri()));
    }

    #[test]
    fn test_parse_url_list_trims_and_skips_blank_lines() {
        assert_eq!(
            parse_url_list("https://zenn.dev/a\r\n\n  https://qiita.com/b  \n"),
            vec!["https://zenn.dev/a", "https://qiita.com/b"]
        );
        assert!(parse_url_list("\n \n").is_empty());
    }

    #[tokio::test]
    async fn test_missing_url_list_is_error() {
        let err = load_url_list("/nonexistent/blog_list.txt").await.unwrap_err();
        assert_eq!(err.path, "/nonexistent/blog_list.txt");
    }

    #[test]
    fn test_parse_article_without_adapter_uses_paragraphs() {
        let fetcher = ArticleFetcher::new(AdapterRegistry::new([]).unwrap(), &FetchConfig::default()).unwrap();
        let article = fetcher.parse_article(
            "https://example.com/post",
            "<html><body><p>Kubernetes</p><p>Docker</p></body></html>",
        );
        assert_eq!(article.title, "https://example.com/post");
        assert_eq!(article.content, "Kubernetes Docker");
    }
}
