//! # JP Skill Trends CLI
//!
//! Terminal front end for the skill trend pipeline: fetch a blog's latest
//! articles, analyze a single post, or aggregate exported records.
//!
//! ## Usage
//!
//! ```sh
//! jp_skill_trends latest --source Zenn -n 8
//! jp_skill_trends article https://zenn.dev/someone/articles/abc
//! jp_skill_trends scrape data/blogs/blog_list.txt
//! jp_skill_trends trends all_metadata.csv --date-field upload_date --period month
//! ```
//!
//! "No articles found", "no skills found" and hard errors produce distinct
//! output. Only an unreadable skill dictionary or adapter table, or an
//! unreadable `scrape`/`trends` input file, ends the process with an error.

use std::error::Error;

use clap::Parser;
use jp_skill_trends::outputs::json::{TrendReport, write_articles, write_report};
use jp_skill_trends::outputs::text::{render_articles, render_ranking, render_sources};
use jp_skill_trends::scrapers::fetcher::load_url_list;
use jp_skill_trends::scrapers::sites::{BLOG_SOURCES, find_source};
use jp_skill_trends::utils::{ensure_writable_dir, preview};
use jp_skill_trends::{
    AdapterRegistry, Article, ArticleFetcher, Records, SkillDictionary, SkillExtractor,
    TrendAggregator,
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

const PREVIEW_CHARS: usize = 800;
/// Where `scrape` saves articles when no output directory is given.
const DEFAULT_SCRAPE_DIR: &str = "data/blogs";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if args.command == Command::Sources {
        print!("{}", render_sources(BLOG_SOURCES));
        return Ok(());
    }

    // A dictionary that cannot be loaded is fatal for every analysis command.
    let dictionary = SkillDictionary::load(&args.skills)?;
    let extractor =
        SkillExtractor::with_lexical_matcher(dictionary).with_options(args.match_options());

    match &args.command {
        Command::Sources => {}
        Command::Latest {
            source,
            max_articles,
            top,
        } => run_latest(&args, &extractor, source, usize::from(*max_articles), *top).await?,
        Command::Article { url, top } => run_article(&args, &extractor, url, *top).await?,
        Command::Scrape { input, top } => {
            let urls = load_url_list(input).await?;
            info!(count = urls.len(), path = %input.display(), "Loaded article URLs");
            let fetcher = ArticleFetcher::new(AdapterRegistry::builtin()?, &args.fetch_config())?;
            let articles = fetcher.fetch_all(urls).await;
            if articles.is_empty() {
                println!("No articles could be fetched from {}.", input.display());
                return Ok(());
            }

            let table = TrendAggregator::new(&extractor).aggregate(&articles);
            let label = input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("scraped");
            let report = TrendReport::build(label, table, extractor.dictionary(), *top)
                .with_articles(&articles);
            let output_dir = args.output_dir.as_deref().unwrap_or(DEFAULT_SCRAPE_DIR);
            emit_report(&args, &report, Some(&articles[..]), Some(output_dir)).await?;
        }
        Command::Trends {
            input,
            text_fields,
            date_field,
            period,
            top,
        } => {
            let records = Records::load(input)?;

            let aggregator = TrendAggregator::new(&extractor)
                .text_fields(text_fields.iter().cloned())
                .date_field(date_field.clone())
                .period(*period);
            let table = records.aggregate(&aggregator);
            if table.dropped_rows() > 0 {
                warn!(dropped = table.dropped_rows(), "Records without a usable date were skipped");
            }
            let label = input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("records");
            let report = TrendReport::build(label, table, extractor.dictionary(), *top);
            emit_report(&args, &report, None, args.output_dir.as_deref()).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

#[instrument(level = "info", skip(args, extractor))]
async fn run_latest(
    args: &Cli,
    extractor: &SkillExtractor,
    source: &str,
    max_articles: usize,
    top: usize,
) -> Result<(), Box<dyn Error>> {
    let (name, listing_url) = match find_source(source) {
        Some(blog) => (blog.name, blog.listing_url),
        None if source.starts_with("http://") || source.starts_with("https://") => (source, source),
        None => {
            println!("Unknown blog `{source}`. Run `sources` to list the supported blogs.");
            return Ok(());
        }
    };

    let fetcher = ArticleFetcher::new(AdapterRegistry::builtin()?, &args.fetch_config())?;
    let articles = fetcher.fetch_latest(listing_url, max_articles).await;
    if articles.is_empty() {
        println!("No articles found or failed to fetch. Try another blog or check your connection.");
        return Ok(());
    }

    let table = TrendAggregator::new(extractor).aggregate(&articles);
    let report =
        TrendReport::build(name, table, extractor.dictionary(), top).with_articles(&articles);
    emit_report(args, &report, Some(&articles[..]), args.output_dir.as_deref()).await
}

#[instrument(level = "info", skip(args, extractor))]
async fn run_article(
    args: &Cli,
    extractor: &SkillExtractor,
    url: &str,
    top: usize,
) -> Result<(), Box<dyn Error>> {
    let fetcher = ArticleFetcher::new(AdapterRegistry::builtin()?, &args.fetch_config())?;
    let article = match fetcher.fetch(url).await {
        Ok(article) => article,
        Err(e) => {
            println!("Failed to fetch blog content ({e}). Please check the URL or try another blog.");
            return Ok(());
        }
    };

    if !args.json {
        println!("{}\n<{}>\n", article.title, article.url);
        println!("{}\n", preview(&article.content, PREVIEW_CHARS));
    }

    let articles = [article];
    let table = TrendAggregator::new(extractor).aggregate(&articles);
    let label = articles[0]
        .source_tag()
        .unwrap_or_else(|| "article".to_string());
    let report =
        TrendReport::build(&label, table, extractor.dictionary(), top).with_articles(&articles);
    emit_report(args, &report, Some(&articles[..]), args.output_dir.as_deref()).await
}

/// Print the report and, when `output_dir` is set, save it as JSON.
async fn emit_report(
    args: &Cli,
    report: &TrendReport,
    articles: Option<&[Article]>,
    output_dir: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        if let Some(articles) = articles {
            println!("Articles from {}:", report.source);
            print!("{}", render_articles(articles));
            println!();
        }
        println!("Top skills:");
        print!("{}", render_ranking(&report.top_skills));
        if report.table.buckets().len() > 1 {
            println!("\nBy period:");
            for series in &report.series {
                let points = series
                    .points
                    .iter()
                    .map(|(period, count)| format!("{period}={count}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}: {}", series.skill, points);
            }
        }
    }

    if let Some(output_dir) = output_dir {
        ensure_writable_dir(output_dir).await?;
        if let Some(articles) = articles {
            write_articles(articles, output_dir, &report.source).await?;
        }
        write_report(report, output_dir).await?;
    }
    Ok(())
}
