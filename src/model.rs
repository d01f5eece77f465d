use chrono::NaiveDate;

pub const DONE_GLYPH: &str = "✔";
pub const PENDING_GLYPH: &str = "✘";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub done: bool,
}

impl Task {
    pub fn status_glyph(&self) -> &'static str {
        if self.done { DONE_GLYPH } else { PENDING_GLYPH }
    }

    /// The done flag `up` writes back: toggles, never forces.
    pub fn toggled(&self) -> bool {
        !self.done
    }
}
