// ☠️ Severity - Ordered toxicity levels for plant/symptom associations
//
// mild < moderate < severe < fatal
//
// Stored as lowercase text in plant_symptoms.severity, aggregated per plant
// as a numeric level (1-4, 0 = no symptoms recorded).

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Fatal,
}

impl Severity {
    /// All levels in ascending order
    pub const ALL: [Severity; 4] = [
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Fatal => "fatal",
        }
    }

    /// Numeric level used by the listing aggregate (mild=1 .. fatal=4)
    pub fn level(&self) -> i64 {
        match self {
            Severity::Mild => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
            Severity::Fatal => 4,
        }
    }

    /// Inverse of `level`. Anything outside 1..=4 means "no severity".
    pub fn from_level(level: i64) -> Option<Severity> {
        match level {
            1 => Some(Severity::Mild),
            2 => Some(Severity::Moderate),
            3 => Some(Severity::Severe),
            4 => Some(Severity::Fatal),
            _ => None,
        }
    }

    /// Exact label match, as stored in the database
    pub fn parse(label: &str) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.as_str() == label)
    }

    /// Minimum level requested by a `severity` query filter.
    /// Unrecognized labels map to 0, which keeps every plant.
    pub fn filter_level(label: &str) -> i64 {
        Severity::parse(label).map(|s| s.level()).unwrap_or(0)
    }

    /// Lenient normalization for imported free text.
    ///
    /// "Moderate." -> moderate, "Mild to Severe" -> severe (highest mentioned),
    /// "unknown" -> None.
    pub fn normalize(text: &str) -> Option<Severity> {
        let cleaned = text.trim().trim_end_matches('.').to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        if let Some(exact) = Severity::parse(&cleaned) {
            return Some(exact);
        }

        Severity::ALL
            .into_iter()
            .filter(|s| cleaned.contains(s.as_str()))
            .max()
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Moderate
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SQLITE MAPPING (stored as its lowercase label)
// ============================================================================

impl ToSql for Severity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Severity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        Severity::parse(label)
            .ok_or_else(|| FromSqlError::Other(format!("unknown severity: {}", label).into()))
    }
}
