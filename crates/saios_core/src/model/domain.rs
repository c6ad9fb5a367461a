//! Tracked life domains.
//!
//! # Invariants
//! - `Domain::key()` values are stable; they are the storage collection key
//!   and the top-level export bundle key.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One tracked life area owning an independent entry collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Physical,
    Mental,
    Finance,
    Addiction,
    Rituals,
    Journal,
}

/// Label used for journal entries, which carry no category of their own.
pub const JOURNAL_ENTRY_KIND: &str = "Entry";

const PHYSICAL_KINDS: &[&str] = &[
    "Workout",
    "Weight",
    "Water Intake",
    "Steps",
    "Sleep Hours",
    "Heart Rate",
    "Blood Pressure",
];

const MENTAL_KINDS: &[&str] = &[
    "Meditation",
    "Therapy",
    "Mood",
    "Anxiety Level",
    "Stress Level",
    "Sleep Quality",
    "Energy Level",
];

const FINANCE_KINDS: &[&str] = &["Income", "Expense", "Savings"];

const ADDICTION_KINDS: &[&str] = &[
    "Cigarettes",
    "Porn",
    "Screen Time",
    "Social Media",
    "Gaming",
    "Alcohol",
    "Junk Food",
];

const RITUAL_KINDS: &[&str] = &[
    "Early Wake-up",
    "Temple Visit",
    "Morning Walk",
    "Evening Walk",
    "Prayer",
    "Reading",
    "Exercise",
    "Meditation",
];

impl Domain {
    /// All domains in navigation order.
    pub const ALL: [Domain; 6] = [
        Domain::Physical,
        Domain::Mental,
        Domain::Finance,
        Domain::Addiction,
        Domain::Rituals,
        Domain::Journal,
    ];

    /// Stable collection key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
            Self::Finance => "finance",
            Self::Addiction => "addiction",
            Self::Rituals => "rituals",
            Self::Journal => "journal",
        }
    }

    /// Parses a collection key. Accepts a few legacy aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physical" => Some(Self::Physical),
            "mental" => Some(Self::Mental),
            "finance" | "financial" => Some(Self::Finance),
            "addiction" => Some(Self::Addiction),
            "rituals" | "ritual" => Some(Self::Rituals),
            "journal" => Some(Self::Journal),
            _ => None,
        }
    }

    /// Default category labels offered for this domain.
    pub fn default_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Physical => PHYSICAL_KINDS,
            Self::Mental => MENTAL_KINDS,
            Self::Finance => FINANCE_KINDS,
            Self::Addiction => ADDICTION_KINDS,
            Self::Rituals => RITUAL_KINDS,
            Self::Journal => &[JOURNAL_ENTRY_KIND],
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
