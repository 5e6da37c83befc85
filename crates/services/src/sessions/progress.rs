/// Aggregated view of session progress, useful for live display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
    pub best_streak: u32,
    /// Questions left in a bounded run; `None` for unlimited runs.
    pub remaining: Option<usize>,
    pub is_complete: bool,
}
