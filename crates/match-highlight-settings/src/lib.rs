#![warn(missing_docs)]
//! Persisted configuration for `match-highlight`.
//!
//! Settings are stored as camelCase JSON:
//!
//! ```json
//! {
//!   "rules": [
//!     { "name": "todo", "query": "TODO\\((\\w+)\\)", "isRegex": true,
//!       "color": "#ffcc00", "appliesTo": ["match", "group"] }
//!   ],
//!   "highlightDelay": 0,
//!   "minMatchLength": 3,
//!   "maxMatches": 100,
//!   "stopWords": "the, and"
//! }
//! ```
//!
//! Missing fields take their defaults. [`HighlightSettings::into_config`] validates every rule
//! and produces a [`match_highlight::HighlightConfig`].

mod convert;
mod error;
mod model;

pub use convert::{FALLBACK_CLASS, class_slug};
pub use error::{RuleIssue, SettingsError};
pub use model::{HighlightSettings, Mark, RuleSettings};
