//! JSON output of scraped articles and trend reports.
//!
//! Files are organized by date, named after the source:
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── zenn_articles.json
//!     └── zenn_trends.json
//! ```
//!
//! Repeated runs on the same day overwrite the previous files for a source.

use chrono::Local;
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::Article;
use crate::skills::SkillDictionary;
use crate::trends::{SkillSeries, TrendTable};
use crate::utils::slugify_title;

/// One row of the ranked skill list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSkill {
    pub skill: String,
    pub category: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRef {
    pub title: String,
    pub url: String,
}

/// Everything the presentation layer needs about one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub local_date: String,
    pub local_time: String,
    pub source: String,
    pub articles: Vec<ArticleRef>,
    pub top_skills: Vec<RankedSkill>,
    pub series: Vec<SkillSeries>,
    pub table: TrendTable,
}

impl TrendReport {
    pub fn build(
        source: &str,
        table: TrendTable,
        dictionary: &SkillDictionary,
        top_n: usize,
    ) -> Self {
        let ranked = table.rank(top_n);
        let top_names: Vec<String> = ranked.iter().map(|(skill, _)| skill.clone()).collect();
        let top_skills = ranked
            .into_iter()
            .map(|(skill, count)| RankedSkill {
                category: dictionary.category_of(&skill).map(ToString::to_string),
                skill,
                count,
            })
            .collect();
        let now = Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            source: source.to_string(),
            articles: Vec::new(),
            top_skills,
            series: table.series(&top_names),
            table,
        }
    }

    #[must_use]
    pub fn with_articles(mut self, articles: &[Article]) -> Self {
        self.articles = articles
            .iter()
            .map(|article| ArticleRef {
                title: article.title.clone(),
                url: article.url.clone(),
            })
            .collect();
        self
    }
}

/// Serialize `value` to `{output_dir}/{local_date}/{stem}.json`.
///
/// Returns the written path.
#[instrument(level = "info", skip_all, fields(%output_dir, %stem))]
pub async fn write_json<T: Serialize>(
    value: &T,
    output_dir: &str,
    stem: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    let full_json_dir = format!(
        "{}/{}",
        output_dir.trim_end_matches('/'),
        Local::now().date_naive()
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{}/{}.json", full_json_dir, stem);
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON file");
    Ok(output_json_filename)
}

/// Write fetched articles as `{source}_articles.json`.
pub async fn write_articles(
    articles: &[Article],
    output_dir: &str,
    source: &str,
) -> Result<String, Box<dyn Error>> {
    write_json(&articles, output_dir, &format!("{}_articles", slugify_title(source))).await
}

/// Write a report as `{source}_trends.json`.
pub async fn write_report(report: &TrendReport, output_dir: &str) -> Result<String, Box<dyn Error>> {
    write_json(report, output_dir, &format!("{}_trends", slugify_title(&report.source))).await
}
