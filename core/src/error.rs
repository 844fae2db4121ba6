/// Reasons a quote cannot enter a snapshot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid quote from {venue}: {reason}")]
    InvalidQuote { venue: String, reason: String },

    #[error("Duplicate venue in snapshot: {0}")]
    DuplicateVenue(String),
}
