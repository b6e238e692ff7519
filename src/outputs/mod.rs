//! Output generation for JSON files and terminal text.
//!
//! # Submodules
//!
//! - [`json`]: Builds [`json::TrendReport`] and writes reports and scraped
//!   articles to dated JSON files
//! - [`text`]: Renders source lists, article lists and ranked skills for the
//!   terminal
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── qiita_articles.json
//!     └── qiita_trends.json
//! ```

pub mod json;
pub mod text;
