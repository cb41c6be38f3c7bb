use crate::pipeline::domain::Candidate;

/// Picks the candidate nearest the region center.
///
/// Among exactly equal distances the earliest candidate wins.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector {
    min_token_len: usize,
}

impl CandidateSelector {
    pub fn new(min_token_len: usize) -> Self {
        Self { min_token_len }
    }

    pub fn select(&self, candidates: Vec<Candidate>) -> Option<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| candidate.token().len() >= self.min_token_len)
            .min_by(|a, b| a.distance().total_cmp(&b.distance()))
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new(3)
    }
}
