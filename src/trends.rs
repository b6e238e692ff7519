//! Skill trend aggregation.
//!
//! Rows (articles, exported metadata records, ...) are grouped into period
//! buckets by an optional date field, and every skill found in a row adds one
//! to that row's bucket. A skill mentioned ten times in one article still
//! counts once for that article.
//!
//! Without a date field every row lands in the [`UNGROUPED`] bucket. With one,
//! rows whose date is missing or unparseable are left out and counted in
//! [`TrendTable::dropped_rows`].

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, info};

use crate::skills::SkillExtractor;

/// Period key used when rows are not grouped by date.
pub const UNGROUPED: &str = "all";

/// Read access to a row's named text fields.
pub trait FieldSource {
    /// Text of `name`, or `None` when the row has no usable value for it.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Whether the row has a `name` column at all, even an empty or null one.
    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).field(name)
    }

    fn has_field(&self, name: &str) -> bool {
        (**self).has_field(name)
    }
}

impl FieldSource for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|s| Cow::Borrowed(s.as_str()))
    }

    fn has_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// Calendar granularity of period buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// `2024`
    Year,
    /// `2024Q1`
    Quarter,
    /// `2024-01`
    #[default]
    Month,
    /// ISO week, `2024-W01`
    Week,
    /// `2024-01-05`
    Day,
}

impl Period {
    /// Bucket key of `date` at this granularity.
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            Period::Year => date.format("%Y").to_string(),
            Period::Quarter => format!("{}Q{}", date.year(), date.month0() / 3 + 1),
            Period::Month => date.format("%Y-%m").to_string(),
            Period::Week => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Day => date.format("%Y-%m-%d").to_string(),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%Y年%m月%d日"];

/// Parse the calendar date out of a loosely formatted date or timestamp.
///
/// Timezone-aware timestamps keep their own local date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

/// Skill frequency counts that remember first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillTally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl SkillTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, skill: &str, count: usize) {
        match self.index.get(skill) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(skill.to_string(), self.entries.len());
                self.entries.push((skill.to_string(), count));
            }
        }
    }

    pub fn get(&self, skill: &str) -> usize {
        self.index.get(skill).map_or(0, |&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(skill, count)| (skill.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn merge(&mut self, other: &SkillTally) {
        for (skill, count) in other.iter() {
            self.add(skill, count);
        }
    }

    /// The `top_n` most frequent skills; equal counts keep insertion order.
    pub fn most_common(&self, top_n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n);
        ranked
    }
}

impl Serialize for SkillTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (skill, count) in &self.entries {
            map.serialize_entry(skill, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub period: String,
    pub counts: SkillTally,
}

/// Per-period skill counts, buckets in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendTable {
    buckets: Vec<TrendBucket>,
    dropped_rows: usize,
}

/// Counts of one skill across chronologically sorted periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillSeries {
    pub skill: String,
    pub points: Vec<(String, usize)>,
}

impl TrendTable {
    pub fn buckets(&self) -> &[TrendBucket] {
        &self.buckets
    }

    pub fn bucket(&self, period: &str) -> Option<&SkillTally> {
        self.buckets
            .iter()
            .find(|bucket| bucket.period == period)
            .map(|bucket| &bucket.counts)
    }

    /// Rows excluded because their date was missing or unparseable.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn bucket_mut(&mut self, period: String) -> &mut SkillTally {
        let position = match self.buckets.iter().position(|b| b.period == period) {
            Some(position) => position,
            None => {
                self.buckets.push(TrendBucket {
                    period,
                    counts: SkillTally::new(),
                });
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[position].counts
    }

    /// All buckets flattened into one tally.
    pub fn totals(&self) -> SkillTally {
        let mut totals = SkillTally::new();
        for bucket in &self.buckets {
            totals.merge(&bucket.counts);
        }
        totals
    }

    /// The `top_n` skills across every bucket, by descending count.
    pub fn rank(&self, top_n: usize) -> Vec<(String, usize)> {
        self.totals().most_common(top_n)
    }

    /// Zero-filled per-period counts for each of `skills`.
    pub fn series(&self, skills: &[String]) -> Vec<SkillSeries> {
        let mut periods: Vec<&str> = self.buckets.iter().map(|b| b.period.as_str()).collect();
        periods.sort_unstable();
        skills
            .iter()
            .map(|skill| SkillSeries {
                skill: skill.clone(),
                points: periods
                    .iter()
                    .map(|period| {
                        let count = self.bucket(period).map_or(0, |tally| tally.get(skill));
                        (period.to_string(), count)
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Groups rows into period buckets and counts the skills found in each row.
#[derive(Debug)]
pub struct TrendAggregator<'a> {
    extractor: &'a SkillExtractor,
    text_fields: Vec<String>,
    date_field: Option<String>,
    period: Period,
}

impl<'a> TrendAggregator<'a> {
    /// Aggregator over the `title` and `content` fields, ungrouped.
    pub fn new(extractor: &'a SkillExtractor) -> Self {
        Self {
            extractor,
            text_fields: vec!["title".to_string(), "content".to_string()],
            date_field: None,
            period: Period::default(),
        }
    }

    #[must_use]
    pub fn text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn date_field(mut self, field: Option<impl Into<String>>) -> Self {
        self.date_field = field.map(Into::into);
        self
    }

    #[must_use]
    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    fn row_text<R: FieldSource>(&self, row: &R) -> String {
        self.text_fields
            .iter()
            .filter_map(|name| row.field(name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn aggregate<R: FieldSource>(&self, rows: &[R]) -> TrendTable {
        let mut table = TrendTable::default();

        // Group by date only when some row has the column, even if its values are null.
        let date_field = self
            .date_field
            .as_deref()
            .filter(|field| rows.iter().any(|row| row.has_field(field)));

        for row in rows {
            let period = match date_field {
                None => UNGROUPED.to_string(),
                Some(field) => match row.field(field).as_deref().and_then(parse_date) {
                    Some(date) => self.period.key(date),
                    None => {
                        table.dropped_rows += 1;
                        continue;
                    }
                },
            };
            let skills = self.extractor.extract(&self.row_text(row));
            let bucket = table.bucket_mut(period);
            for skill in &skills {
                bucket.add(skill, 1);
            }
        }

        if table.dropped_rows > 0 {
            debug!(dropped = table.dropped_rows, "Rows without a usable date were excluded");
        }
        info!(
            rows = rows.len(),
            buckets = table.buckets.len(),
            dropped = table.dropped_rows,
            "Aggregated skill trends"
        );
        table
    }
}
