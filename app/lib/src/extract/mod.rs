//! Record extraction from benchmark log text.
//!
//! Each category is extracted independently: [`extract`] walks the log's
//! round headings for that category and applies the category's ordered field
//! matchers inside each round's section. Rounds missing any expected line are
//! skipped, never padded, so the number of records can be smaller than the
//! number of headings.
//!
//! # Example
//!
//! ```
//! use benchdiff::{extract_read, ExtractorConfig};
//!
//! let log = "\
//! === Read Test Round 1 ===
//! ✓ Read 100000 KV pairs in 250.00 ms
//! ✓ Average read latency: 2.50 μs
//! ✓ Tp99 read latency: 9.00 μs
//! ✓ Read throughput: 400000.00 ops/sec
//! === Read Test Round 2 ===
//! ✓ Read 100000 KV pairs in 260.00 ms
//! ";
//!
//! let config = ExtractorConfig::default();
//! let records: Vec<_> = extract_read(log, &config).collect();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].round_index, 1);
//! ```

pub mod matcher;
pub mod plan;
pub mod prep;
pub mod section;

pub use matcher::FieldMatcher;
pub use plan::Incomplete;
pub use prep::{extract_preparation, DataPreparation};
pub use section::{Section, Sections};

use log::{debug, warn};

use crate::config::ExtractorConfig;
use crate::record::{Category, RoundRecord};

/// Lazy iterator over the complete rounds of one category.
///
/// Cloning the iterator, or calling [`extract`] again, restarts it.
#[derive(Debug, Clone)]
pub struct Rounds<'a> {
    sections: Sections<'a>,
    category: Category,
    ops_per_round: u64,
    last_round: Option<u32>,
}

impl<'a> Rounds<'a> {
    /// Category this iterator extracts.
    pub fn category(&self) -> Category {
        self.category
    }
}

impl<'a> Iterator for Rounds<'a> {
    type Item = RoundRecord;

    fn next(&mut self) -> Option<RoundRecord> {
        for section in self.sections.by_ref() {
            if let Some(last) = self.last_round {
                if section.round <= last {
                    warn!(
                        "ignoring {} round {}: does not follow round {}",
                        self.category, section.round, last
                    );
                    continue;
                }
            }

            match plan::extract_round(self.category, &section, self.ops_per_round) {
                Ok(record) => {
                    self.last_round = Some(record.round_index);
                    return Some(record);
                }
                Err(Incomplete::Missing(label)) => {
                    debug!(
                        "skipping {} round {}: no '{}' line",
                        self.category, section.round, label
                    );
                }
                Err(Incomplete::BadCount) => {
                    debug!(
                        "skipping {} round {}: non-integer operation count",
                        self.category, section.round
                    );
                }
            }
        }
        None
    }
}

/// Extract the rounds of `category` from `text`, in log order.
pub fn extract<'a>(text: &'a str, category: Category, config: &ExtractorConfig) -> Rounds<'a> {
    Rounds {
        sections: Sections::new(text, category),
        category,
        ops_per_round: config.ops_per_round,
        last_round: None,
    }
}

/// Extract read rounds.
pub fn extract_read<'a>(text: &'a str, config: &ExtractorConfig) -> Rounds<'a> {
    extract(text, Category::Read, config)
}

/// Extract write rounds.
pub fn extract_write<'a>(text: &'a str, config: &ExtractorConfig) -> Rounds<'a> {
    extract(text, Category::Write, config)
}

/// Extract update rounds.
pub fn extract_update<'a>(text: &'a str, config: &ExtractorConfig) -> Rounds<'a> {
    extract(text, Category::Update, config)
}

/// Extract mixed read-write rounds.
pub fn extract_mixed<'a>(text: &'a str, config: &ExtractorConfig) -> Rounds<'a> {
    extract(text, Category::Mixed, config)
}

/// Extract every category, grouped in canonical category order.
pub fn extract_all(text: &str, config: &ExtractorConfig) -> Vec<RoundRecord> {
    let mut records = Vec::new();
    for category in Category::ALL {
        let before = records.len();
        records.extend(extract(text, category, config));
        debug!("extracted {} {} rounds", records.len() - before, category);
    }
    records
}
