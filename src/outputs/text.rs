//! Plain-text rendering for the terminal.
//!
//! Every renderer returns a `String` so `main` only has to print it. Empty
//! inputs render an explicit "nothing found" line instead of a blank table.

use crate::models::Article;
use crate::scrapers::sites::BlogSource;

use super::json::RankedSkill;

const BAR_WIDTH: usize = 30;

pub fn render_sources(sources: &[BlogSource]) -> String {
    let width = sources.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    sources
        .iter()
        .map(|source| {
            let pad = width - source.name.chars().count();
            format!("{}{}  {}\n", source.name, " ".repeat(pad), source.listing_url)
        })
        .collect()
}

pub fn render_articles(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found. The blog's structure may have changed or there are no recent posts.\n"
            .to_string();
    }
    articles
        .iter()
        .map(|article| format!("- {} <{}>\n", article.title, article.url))
        .collect()
}

/// Horizontal bar chart of ranked skills, scaled to the top count.
pub fn render_ranking(ranked: &[RankedSkill]) -> String {
    let Some(max) = ranked.iter().map(|r| r.count).max().filter(|&max| max > 0) else {
        return "No skills found in the selected articles.\n".to_string();
    };
    let width = ranked.iter().map(|r| r.skill.chars().count()).max().unwrap_or(0);
    ranked
        .iter()
        .map(|row| {
            let pad = width - row.skill.chars().count();
            let bar = (row.count * BAR_WIDTH).div_ceil(max);
            format!("{}{}  {} {}\n", row.skill, " ".repeat(pad), "█".repeat(bar), row.count)
        })
        .collect()
}
