//! The feedback store.
//!
//! Keeps every submitted [`FeedbackRecord`] as one JSON array under a single
//! slot key. Each mutation rewrites the whole array. Reads that find nothing,
//! or find content that does not parse, see an empty collection; mutations
//! refuse to overwrite content they cannot parse.

use std::collections::HashSet;

use chrono::{DateTime, Local, SubsecRound, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::record::{FeedbackForm, FeedbackRecord, FilterField, FILTER_ALL};
use crate::render;
use crate::storage::Slot;

/// Slot key holding the serialized collection.
const STORAGE_KEY: &str = "gak_feedbacks";

/// Prefix of every generated record id.
const ID_PREFIX: &str = "feedback_";

/// Length of the random part of a record id.
const ID_SUFFIX_LEN: usize = 9;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Content type of an export file.
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// A serialized copy of the whole collection, ready to be saved as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSnapshot {
    /// Suggested file name, stamped with the local export date.
    pub file_name: String,
    /// MIME type of `content`.
    pub content_type: &'static str,
    /// Pretty-printed JSON array of every stored record.
    pub content: String,
    /// Number of records in the snapshot.
    pub count: usize,
}

/// Persistence and query layer over the saved feedback collection.
#[derive(Debug)]
pub struct FeedbackStore<S> {
    slot: S,
}

impl<S: Slot> FeedbackStore<S> {
    /// Wrap a slot backend.
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Borrow the underlying slot backend.
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Validate a submission and append it to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] if a required field is blank or a
    /// choice is unknown, and [`crate::Error::MalformedCollection`] if the
    /// stored content does not parse. Nothing is written in either case.
    /// Storage failures are propagated.
    pub fn create(&self, form: &FeedbackForm) -> Result<FeedbackRecord> {
        self.create_at(form, Utc::now())
    }

    /// Like [`FeedbackStore::create`], with an explicit creation instant.
    ///
    /// The instant is truncated to milliseconds, the precision it is stored at.
    ///
    /// # Errors
    ///
    /// See [`FeedbackStore::create`].
    pub fn create_at(&self, form: &FeedbackForm, now: DateTime<Utc>) -> Result<FeedbackRecord> {
        let fields = form.validate()?;
        let timestamp = now.trunc_subsecs(3);

        let mut records = self.load_for_update()?;
        let taken: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let id = loop {
            let candidate = generate_id(timestamp);
            if !taken.contains(candidate.as_str()) {
                break candidate;
            }
        };

        let record = fields.into_record(id, timestamp);
        records.push(record.clone());
        self.save(&records)?;

        info!(id = %record.id, tipo = %record.tipo, "Feedback saved");
        Ok(record)
    }

    /// Every stored record, newest first.
    ///
    /// Records with equal timestamps come most recently appended first.
    #[must_use]
    pub fn list(&self) -> Vec<FeedbackRecord> {
        let mut records = self.load();
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Records whose `field` equals `value`, in [`FeedbackStore::list`] order.
    ///
    /// A blank value or [`FILTER_ALL`] matches everything.
    #[must_use]
    pub fn filter(&self, field: FilterField, value: &str) -> Vec<FeedbackRecord> {
        let value = value.trim();
        let records = self.list();
        if value.is_empty() || value == FILTER_ALL {
            return records;
        }
        records
            .into_iter()
            .filter(|r| field.value_of(r) == value)
            .collect()
    }

    /// Number of stored records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// Remove the record with the given id.
    ///
    /// Returns `false`, without writing, if no record has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored content cannot be read or parsed, or
    /// if the updated collection cannot be written.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut records = self.load_for_update()?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            debug!(id, "No feedback with this id");
            return Ok(false);
        }

        self.save(&records)?;
        info!(id, "Feedback deleted");
        Ok(true)
    }

    /// Whether the slot holds any content at all, parseable or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn has_content(&self) -> Result<bool> {
        Ok(self.slot.read(STORAGE_KEY)?.is_some())
    }

    /// Remove every record, returning how many readable records there were.
    ///
    /// Malformed content is removed too, counting as zero records. An absent
    /// slot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or removed.
    pub fn clear(&self) -> Result<usize> {
        let Some(raw) = self.slot.read(STORAGE_KEY)? else {
            return Ok(0);
        };
        let count = parse_records(&raw).map_or(0, |records| records.len());
        self.slot.remove(STORAGE_KEY)?;
        info!(count, "All feedback cleared");
        Ok(count)
    }

    /// Serialize the stored collection for download.
    ///
    /// Returns `None` when there is nothing to export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(&self) -> Result<Option<ExportSnapshot>> {
        self.export_on(Local::now().date_naive())
    }

    /// Like [`FeedbackStore::export`], stamping the file name with `date`.
    ///
    /// # Errors
    ///
    /// See [`FeedbackStore::export`].
    pub fn export_on(&self, date: chrono::NaiveDate) -> Result<Option<ExportSnapshot>> {
        let records = self.load();
        if records.is_empty() {
            debug!("Nothing to export");
            return Ok(None);
        }

        let snapshot = ExportSnapshot {
            file_name: render::export_file_name(date),
            content_type: EXPORT_CONTENT_TYPE,
            content: serde_json::to_string_pretty(&records)?,
            count: records.len(),
        };
        info!(count = snapshot.count, file = %snapshot.file_name, "Feedback exported");
        Ok(Some(snapshot))
    }

    /// Stored records in storage order; empty if absent, unreadable or malformed.
    fn load(&self) -> Vec<FeedbackRecord> {
        let raw = match self.slot.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read stored feedback, treating as empty: {e}");
                return Vec::new();
            }
        };

        match parse_records(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Stored feedback is malformed, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Stored records in storage order, for a read-modify-write.
    fn load_for_update(&self) -> Result<Vec<FeedbackRecord>> {
        match self.slot.read(STORAGE_KEY)? {
            Some(raw) => parse_records(&raw).map_err(|source| {
                warn!("Refusing to overwrite malformed stored feedback: {source}");
                Error::MalformedCollection { source }
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[FeedbackRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.slot.write(STORAGE_KEY, &json)
    }
}

fn parse_records(raw: &str) -> std::result::Result<Vec<FeedbackRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// `feedback_<unix millis>_<random base36>`.
fn generate_id(timestamp: DateTime<Utc>) -> String {
    let uuid = Uuid::new_v4();
    let suffix: String = uuid
        .as_bytes()
        .iter()
        .take(ID_SUFFIX_LEN)
        .map(|byte| char::from(BASE36_DIGITS[usize::from(byte % 36)]))
        .collect();
    format!("{ID_PREFIX}{}_{suffix}", timestamp.timestamp_millis())
}
