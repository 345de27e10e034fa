//! Culture dictionary — EPA sentiments keyed by concept label.
//!
//! Purpose
//! -------
//! Load a long-form sentiment table (one row per concept, columns `term`,
//! `e`, `p`, `a`, any others ignored) and assemble event fundamentals from
//! concept labels.
//!
//! Key behaviors
//! -------------
//! - Records are deserialized with `serde` through `csv`, so column order is
//!   free and extra columns are skipped.
//! - Lookups return fundamentals in canonical Actor, Behavior, Object
//!   (, Setting) order regardless of row order in the table.
//! - Duplicate labels keep the first occurrence and emit a `tracing` warning.
use std::{collections::HashMap, fs::File, io::Read, path::Path};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    impression::core::epa::{Epa, Fundamentals},
    io::errors::{IoError, IoResult},
};

/// One row of a sentiment table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentimentRecord {
    pub term: String,
    pub e: f64,
    pub p: f64,
    pub a: f64,
}

impl SentimentRecord {
    pub fn epa(&self) -> Epa {
        Epa::new(self.e, self.p, self.a)
    }
}

/// In-memory culture: concept label → EPA sentiment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Culture {
    records: Vec<SentimentRecord>,
    index: HashMap<String, usize>,
}

impl Culture {
    /// Build a dictionary from records; later duplicates are ignored.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SentimentRecord>,
    {
        let mut culture = Culture::default();
        for record in records {
            if culture.index.contains_key(&record.term) {
                warn!(term = %record.term, "duplicate culture label; keeping first rating");
                continue;
            }
            culture.index.insert(record.term.clone(), culture.records.len());
            culture.records.push(record);
        }
        culture
    }

    /// Read a headed CSV sentiment table.
    ///
    /// # Errors
    /// - [`IoError::Csv`] if a row is malformed or lacks `term`, `e`, `p`, `a`.
    pub fn from_reader<R: Read>(reader: R) -> IoResult<Self> {
        let mut csv_reader =
            csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = csv_reader
            .deserialize::<SentimentRecord>()
            .collect::<Result<Vec<_>, csv::Error>>()?;
        let culture = Culture::from_records(records);
        debug!(concepts = culture.len(), "loaded culture dictionary");
        Ok(culture)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        Culture::from_reader(File::open(path)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SentimentRecord] {
        &self.records
    }

    pub fn get(&self, term: &str) -> Option<&SentimentRecord> {
        self.index.get(term).map(|&i| &self.records[i])
    }

    /// EPA rating of `term`, or [`IoError::MissingLabel`].
    pub fn epa(&self, term: &str) -> IoResult<Epa> {
        self.get(term)
            .map(SentimentRecord::epa)
            .ok_or_else(|| IoError::MissingLabel { label: term.to_string() })
    }

    /// Fundamentals of the event "`actor` `behavior` `object`".
    pub fn event_from_labels(&self, actor: &str, behavior: &str, object: &str) -> IoResult<Fundamentals> {
        Ok(Fundamentals::new(self.epa(actor)?, self.epa(behavior)?, self.epa(object)?))
    }

    /// [`Culture::event_from_labels`] with a Setting.
    pub fn event_from_labels_with_setting(
        &self, actor: &str, behavior: &str, object: &str, setting: &str,
    ) -> IoResult<Fundamentals> {
        Ok(self.event_from_labels(actor, behavior, object)?.with_setting(self.epa(setting)?))
    }
}
