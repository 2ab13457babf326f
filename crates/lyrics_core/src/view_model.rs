use crate::{RunId, RunStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsView {
    pub input: String,
    pub run: Option<RunView>,
    pub input_exhausted: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunView {
    pub run_id: RunId,
    pub query: String,
    pub status: RunStatus,
    pub fragments: Vec<String>,
}

impl LyricsView {
    /// Text for the output display: the live run's fragments, one per line.
    pub fn lyrics_text(&self) -> String {
        self.run
            .as_ref()
            .map(|run| run.fragments.join("\n"))
            .unwrap_or_default()
    }
}
