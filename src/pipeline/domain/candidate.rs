use super::region::BoundingBox;

/// One text region reported by the detection engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextRegion {
    pub text: String,
    pub bbox: Option<BoundingBox>,
}

impl RawTextRegion {
    pub fn new(text: impl Into<String>, bbox: Option<BoundingBox>) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    pub fn located(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self::new(text, Some(bbox))
    }
}

/// A cleaned token scored by its squared distance to the region center.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    token: String,
    distance: f32,
}

impl Candidate {
    pub fn new(token: impl Into<String>, distance: f32) -> Self {
        Self {
            token: token.into(),
            distance,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn into_token(self) -> String {
        self.token
    }
}

/// Strips whitespace and everything outside `[A-Za-z0-9]`.
pub fn clean_token(text: &str) -> String {
    text.chars().filter(char::is_ascii_alphanumeric).collect()
}
