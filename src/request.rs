use crate::serde::Deserialize;

/// Body of the vote form. `choice` is kept as text so that a missing or
/// malformed value re-renders the form instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}
