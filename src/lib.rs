//! # JP Skill Trends
//!
//! Finds which technical skills recent Japanese tech blog posts talk about,
//! and how often.
//!
//! ## Architecture
//!
//! The pipeline has three stages:
//! 1. **Scraping** ([`scrapers`]): Index a blog's listing page through its
//!    site adapter, then fetch each article as an [`Article`]
//! 2. **Extraction** ([`skills`]): Match a bilingual skill dictionary against
//!    each article by substring and by Japanese word segmentation
//! 3. **Aggregation** ([`trends`]): Bucket matches by period and rank them
//!
//! Rendering and persistence of the results live in [`outputs`]. Exported
//! JSON or CSV records can be aggregated too, through [`records`].
//!
//! ## Example
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use jp_skill_trends::{AdapterRegistry, ArticleFetcher, FetchConfig};
//! use jp_skill_trends::{SkillDictionary, SkillExtractor, TrendAggregator};
//!
//! let extractor = SkillExtractor::with_lexical_matcher(SkillDictionary::load("skills_dict.json")?);
//! let fetcher = ArticleFetcher::new(AdapterRegistry::builtin()?, &FetchConfig::default())?;
//!
//! let articles = fetcher.fetch_latest("https://zenn.dev/", 5).await;
//! let table = TrendAggregator::new(&extractor).aggregate(&articles);
//! for (skill, count) in table.rank(10) {
//!     println!("{skill}: {count}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod outputs;
pub mod records;
pub mod scrapers;
pub mod skills;
pub mod trends;
pub mod utils;

pub use error::{AdapterError, DictionaryError, FetchError, RecordsError, UrlListError};
pub use models::Article;
pub use records::Records;
pub use scrapers::fetcher::{ArticleFetcher, FetchConfig};
pub use scrapers::{AdapterRegistry, SiteAdapter};
pub use skills::{LexicalMatcher, MatchOptions, SkillDictionary, SkillExtractor, Tokenize};
pub use trends::{Period, TrendAggregator, TrendTable};
