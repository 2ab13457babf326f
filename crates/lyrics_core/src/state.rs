use crate::view_model::{LyricsView, RunView};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Searching,
    Streaming,
    Completed,
    /// Failed and contained. The lyrics shown so far stay on screen.
    Stalled,
}

impl RunStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Stalled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    pub(crate) run_id: RunId,
    pub(crate) query: String,
    pub(crate) status: RunStatus,
    pub(crate) fragments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    current: Option<Run>,
    input_exhausted: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> LyricsView {
        LyricsView {
            input: self.input.clone(),
            run: self.current.as_ref().map(|run| RunView {
                run_id: run.run_id,
                query: run.query.clone(),
                status: run.status,
                fragments: run.fragments.clone(),
            }),
            input_exhausted: self.input_exhausted,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Runs are numbered in start order; an older id never replaces a newer run.
    pub(crate) fn start_run(&mut self, run_id: RunId, query: String) -> bool {
        if self.current.as_ref().is_some_and(|run| run.run_id >= run_id) {
            return false;
        }
        self.current = Some(Run {
            run_id,
            query,
            status: RunStatus::Searching,
            fragments: Vec::new(),
        });
        self.mark_dirty();
        true
    }

    /// The live run, if `run_id` names it and it can still change.
    pub(crate) fn live_run_mut(&mut self, run_id: RunId) -> Option<&mut Run> {
        self.current
            .as_mut()
            .filter(|run| run.run_id == run_id && !run.status.is_settled())
    }

    pub(crate) fn exhaust_input(&mut self) {
        if !self.input_exhausted {
            self.input_exhausted = true;
            self.mark_dirty();
        }
    }

    /// Input is over and the last run (if any) has settled.
    pub(crate) fn is_finished(&self) -> bool {
        self.input_exhausted
            && self
                .current
                .as_ref()
                .map_or(true, |run| run.status.is_settled())
    }
}
