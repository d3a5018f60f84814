//! Run report types: build statistics, notices, and report aggregation.

use std::fmt;

/// Severity level of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational.
    Info,
    /// Something in the input was ambiguous or suspicious; the run continued.
    Warning,
}

impl Severity {
    /// Short tag used when printing notices.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
        }
    }
}

/// A single notice produced while building the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Stage that produced the notice (`registry`, `reasoner`, ...).
    pub stage: String,
    /// Human-readable message.
    pub message: String,
    /// Severity of the notice.
    pub severity: Severity,
    /// Optional additional detail lines.
    pub details: Vec<String>,
}

impl Notice {
    /// Creates an informational notice.
    pub fn info(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            severity: Severity::Info,
            details: Vec::new(),
        }
    }

    /// Creates a warning.
    pub fn warn(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            severity: Severity::Warning,
            details: Vec::new(),
        }
    }

    /// Creates a warning with additional detail lines.
    pub fn warn_with_details(
        stage: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::warn(stage, message)
        }
    }

    /// Returns true if this notice is a warning.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Counters maintained by the graph builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Instance statements offered to the builder.
    pub statements: u64,
    /// Dropped because an identifier uses the `file://` scheme.
    pub provenance_dropped: u64,
    /// Dropped because the subject or object is a placeholder.
    pub placeholder_dropped: u64,
    /// Predicate outside the recognised model, or an unusable object.
    pub skipped: u64,
    /// Edges created from direct statements.
    pub direct_edges: u64,
    /// Edges added by transitive materialization.
    pub closure_edges: u64,
    /// Datatype values attached to nodes (including overwrites).
    pub attributes: u64,
    /// Type statements that contributed at least one label.
    pub typed: u64,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} statements ({} provenance, {} placeholder, {} skipped), {} direct + {} closure edges",
            self.statements,
            self.provenance_dropped,
            self.placeholder_dropped,
            self.skipped,
            self.direct_edges,
            self.closure_edges
        )
    }
}

/// Aggregated report of one conversion.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Notices from every stage, in the order they were raised.
    pub notices: Vec<Notice>,
    /// Builder counters.
    pub stats: BuildStats,
}

impl RunReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a notice.
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Appends many notices.
    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.notices.extend(notices);
    }

    /// Returns the count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.notices.iter().filter(|n| n.is_warning()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_warnings() {
        let mut report = RunReport::new();
        report.push(Notice::info("reasoner", "3 facts"));
        report.extend([
            Notice::warn("registry", "conflict"),
            Notice::warn_with_details("registry", "conflict", vec!["detail".into()]),
        ]);
        assert_eq!(report.warning_count(), 2);
        assert_eq!(report.notices[2].details, vec!["detail".to_string()]);
    }
}
