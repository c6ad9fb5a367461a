//! Entry domain model.
//!
//! # Responsibility
//! - Define the flat record logged into every domain collection.
//! - Own per-domain validation rules and patch merging.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `recorded_at` is UTC with millisecond precision; calendar days are only
//!   derived through [`Entry::local_date`].
//! - `amount`, when present, is finite.

use crate::model::domain::Domain;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable entry identifier.
///
/// UUID v7 values sort by creation time, so id order doubles as insertion
/// order within one millisecond.
pub type EntryId = Uuid;

/// One logged record within a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub domain: Domain,
    pub recorded_at: DateTime<Utc>,
    /// Category label, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-text payload (measurement text, journal body).
    pub value: Option<String>,
    /// Numeric payload (finance amount, addiction count, measurements).
    pub amount: Option<f64>,
    /// Finance spending category.
    pub category: Option<String>,
    /// Journal mood emoji.
    pub mood: Option<String>,
    /// Ritual completion flag.
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

/// Caller-supplied fields for a new entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEntry {
    pub kind: String,
    pub value: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

impl NewEntry {
    /// Starts a new entry with only its category label set.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update merged into an existing entry. `None` keeps the old value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub kind: Option<String>,
    pub value: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl EntryPatch {
    /// Returns whether this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validation failures for entry writes and persisted rows.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    BlankKind,
    NonFiniteAmount(f64),
    MissingAmount(Domain),
    NegativeCount(f64),
    MissingCompletion,
    BlankJournalBody,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankKind => write!(f, "entry type must not be blank"),
            Self::NonFiniteAmount(value) => write!(f, "entry amount must be finite, got {value}"),
            Self::MissingAmount(domain) => write!(f, "{domain} entries require an amount"),
            Self::NegativeCount(value) => {
                write!(f, "addiction count must not be negative, got {value}")
            }
            Self::MissingCompletion => write!(f, "rituals entries require a completion flag"),
            Self::BlankJournalBody => write!(f, "journal entries require non-blank content"),
        }
    }
}

impl Error for EntryValidationError {}

impl Entry {
    /// Builds a stored entry from caller input with a fresh id.
    pub fn create(domain: Domain, input: NewEntry, recorded_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::now_v7(), domain, input, recorded_at)
    }

    /// Builds an entry with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(
        id: EntryId,
        domain: Domain,
        input: NewEntry,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            domain,
            recorded_at: truncate_to_millis(recorded_at),
            kind: input.kind,
            value: input.value,
            amount: input.amount,
            category: input.category,
            mood: input.mood,
            completed: input.completed,
            notes: input.notes,
        }
    }

    /// Checks per-domain required fields.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.kind.trim().is_empty() {
            return Err(EntryValidationError::BlankKind);
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() {
                return Err(EntryValidationError::NonFiniteAmount(amount));
            }
        }

        match self.domain {
            Domain::Finance if self.amount.is_none() => {
                Err(EntryValidationError::MissingAmount(Domain::Finance))
            }
            Domain::Addiction => match self.amount {
                None => Err(EntryValidationError::MissingAmount(Domain::Addiction)),
                Some(count) if count < 0.0 => Err(EntryValidationError::NegativeCount(count)),
                Some(_) => Ok(()),
            },
            Domain::Rituals if self.completed.is_none() => {
                Err(EntryValidationError::MissingCompletion)
            }
            Domain::Journal
                if self
                    .value
                    .as_deref()
                    .map_or(true, |body| body.trim().is_empty()) =>
            {
                Err(EntryValidationError::BlankJournalBody)
            }
            _ => Ok(()),
        }
    }

    /// Merges patch fields into this entry. Does not validate.
    pub fn apply_patch(&mut self, patch: &EntryPatch) {
        if let Some(kind) = &patch.kind {
            self.kind = kind.clone();
        }
        if let Some(value) = &patch.value {
            self.value = Some(value.clone());
        }
        if let Some(amount) = patch.amount {
            self.amount = Some(amount);
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(mood) = &patch.mood {
            self.mood = Some(mood.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = Some(completed);
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(recorded_at) = patch.recorded_at {
            self.recorded_at = truncate_to_millis(recorded_at);
        }
    }

    /// Calendar day of this entry as seen from `offset`.
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.recorded_at.with_timezone(offset).date_naive()
    }

    /// Whether this entry counts as done. Entries without a flag count as done.
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(true)
    }
}

/// Drops sub-millisecond precision so values survive storage unchanged.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    from_epoch_ms(value.timestamp_millis()).unwrap_or(value)
}

/// Converts epoch milliseconds into a UTC timestamp.
pub fn from_epoch_ms(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryPatch, EntryValidationError, NewEntry};
    use crate::model::domain::Domain;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn create_truncates_timestamp_to_millis() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let entry = Entry::create(Domain::Physical, NewEntry::new("Steps"), at);
        assert_eq!(entry.recorded_at.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn validate_enforces_domain_required_fields() {
        let now = Utc::now();
        let finance = Entry::create(Domain::Finance, NewEntry::new("Income"), now);
        assert_eq!(
            finance.validate(),
            Err(EntryValidationError::MissingAmount(Domain::Finance))
        );

        let addiction = Entry::create(
            Domain::Addiction,
            NewEntry::new("Cigarettes").with_amount(-1.0),
            now,
        );
        assert_eq!(
            addiction.validate(),
            Err(EntryValidationError::NegativeCount(-1.0))
        );

        let ritual = Entry::create(Domain::Rituals, NewEntry::new("Prayer"), now);
        assert_eq!(
            ritual.validate(),
            Err(EntryValidationError::MissingCompletion)
        );

        let journal = Entry::create(
            Domain::Journal,
            NewEntry::new("Entry").with_value("   "),
            now,
        );
        assert_eq!(
            journal.validate(),
            Err(EntryValidationError::BlankJournalBody)
        );

        let blank = Entry::create(Domain::Mental, NewEntry::new("  "), now);
        assert_eq!(blank.validate(), Err(EntryValidationError::BlankKind));

        let nan = Entry::create(
            Domain::Physical,
            NewEntry::new("Weight").with_amount(f64::NAN),
            now,
        );
        assert!(matches!(
            nan.validate(),
            Err(EntryValidationError::NonFiniteAmount(_))
        ));
    }

    #[test]
    fn apply_patch_keeps_untouched_fields() {
        let mut entry = Entry::create(
            Domain::Journal,
            NewEntry::new("Entry").with_value("draft").with_mood("😐"),
            Utc::now(),
        );
        let original_id = entry.id;
        let original_at = entry.recorded_at;

        entry.apply_patch(&EntryPatch {
            value: Some("final".to_string()),
            ..EntryPatch::default()
        });

        assert_eq!(entry.id, original_id);
        assert_eq!(entry.recorded_at, original_at);
        assert_eq!(entry.value.as_deref(), Some("final"));
        assert_eq!(entry.mood.as_deref(), Some("😐"));
    }

    #[test]
    fn local_date_respects_offset() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let entry = Entry::create(Domain::Physical, NewEntry::new("Steps"), at);

        let utc = FixedOffset::east_opt(0).unwrap();
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(
            entry.local_date(&utc),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            entry.local_date(&ist),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }
}
