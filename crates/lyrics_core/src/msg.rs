use crate::RunId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search text.
    InputChanged(String),
    /// The input source reached its end.
    InputClosed,
    /// Engine started a run for a debounced query.
    RunStarted { run_id: RunId, query: String },
    /// Engine extracted one lyrics fragment.
    LyricsFragment { run_id: RunId, text: String },
    /// Engine finished a run.
    RunCompleted { run_id: RunId, fragments: usize },
    /// Engine contained a failed run; it will not produce output.
    RunContained { run_id: RunId },
    /// Engine dispatched every query it will ever receive.
    InputExhausted,
}
