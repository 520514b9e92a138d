use uuid::Uuid;

/// A target role submitted by a client. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}
