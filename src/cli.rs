//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Global options can also be provided via environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use jp_skill_trends::scrapers::fetcher::{DEFAULT_USER_AGENT, FetchConfig};
use jp_skill_trends::skills::MatchOptions;
use jp_skill_trends::trends::Period;

/// Command-line arguments for the skill trend analyzer.
///
/// # Examples
///
/// ```sh
/// # List supported blogs
/// jp_skill_trends sources
///
/// # Latest 8 Zenn articles, top 10 skills, saved as JSON
/// jp_skill_trends latest --source Zenn -n 8 -o ./out
///
/// # Fetch a list of article URLs and save them under data/blogs
/// jp_skill_trends scrape blog_list.txt
///
/// # Monthly trends over exported records
/// jp_skill_trends trends all_metadata.csv --text-fields title,description --date-field upload_date
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Skill dictionary (JSON or YAML, category -> list of terms)
    #[arg(long, env = "SKILLS_DICT", default_value = "skills_dict.json", global = true)]
    pub skills: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 15, global = true)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "FETCH_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Match dictionary terms against the text ignoring case
    #[arg(long, global = true)]
    pub case_insensitive: bool,

    /// Directory for JSON output (articles and trend report)
    #[arg(short, long, env = "OUTPUT_DIR", global = true)]
    pub output_dir: Option<String>,

    /// Print the trend report as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the supported tech blogs
    Sources,

    /// Fetch a blog's newest articles and rank the skills they mention
    Latest {
        /// Blog name from `sources`, or a listing page URL
        #[arg(short, long, default_value = "Qiita")]
        source: String,

        /// Number of articles to fetch
        #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(3..=15))]
        max_articles: u8,

        /// Number of skills to show
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },

    /// Analyze a single blog post
    Article {
        /// Article URL
        #[arg(default_value = "https://japan-dev.com/blog/vuejs-in-japan")]
        url: String,

        /// Number of skills to show
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },

    /// Fetch every article listed in a file (one URL per line) and save them
    Scrape {
        /// Text file of article URLs; blank lines are ignored
        #[arg(default_value = "data/blogs/blog_list.txt")]
        input: PathBuf,

        /// Number of skills to show
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },

    /// Aggregate skill trends over exported records
    Trends {
        /// JSON array of objects, or a CSV file with a header row
        input: PathBuf,

        /// Fields whose text is searched for skills
        #[arg(long, value_delimiter = ',', default_value = "title,content")]
        text_fields: Vec<String>,

        /// Field holding each record's date; omit to count the corpus as a whole
        #[arg(long)]
        date_field: Option<String>,

        /// Bucket granularity when a date field is used
        #[arg(long, value_enum, default_value_t = Period::Month)]
        period: Period,

        /// Number of skills to show
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_insensitive: self.case_insensitive,
        }
    }
}
