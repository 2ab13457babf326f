#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand a text-change event to the engine's debouncer.
    ForwardInput { text: String },
    /// No more input; let the engine dispatch what is pending.
    CloseInput,
    /// Nothing is live and nothing more can arrive.
    Shutdown,
}
