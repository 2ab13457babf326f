use crate::{AppState, Effect, Msg, RunId, RunStatus};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text.clone());
            vec![Effect::ForwardInput { text }]
        }
        Msg::InputClosed => vec![Effect::CloseInput],
        Msg::RunStarted { run_id, query } => {
            state.start_run(run_id, query);
            Vec::new()
        }
        Msg::LyricsFragment { run_id, text } => {
            // Fragments of a superseded or settled run are dropped.
            if let Some(run) = state.live_run_mut(run_id) {
                run.status = RunStatus::Streaming;
                run.fragments.push(text);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RunCompleted { run_id, .. } => settle(&mut state, run_id, RunStatus::Completed),
        Msg::RunContained { run_id } => settle(&mut state, run_id, RunStatus::Stalled),
        Msg::InputExhausted => {
            state.exhaust_input();
            shutdown_if_finished(&state)
        }
    };

    (state, effects)
}

fn settle(state: &mut AppState, run_id: RunId, status: RunStatus) -> Vec<Effect> {
    let Some(run) = state.live_run_mut(run_id) else {
        return Vec::new();
    };
    run.status = status;
    state.mark_dirty();
    shutdown_if_finished(state)
}

fn shutdown_if_finished(state: &AppState) -> Vec<Effect> {
    if state.is_finished() {
        vec![Effect::Shutdown]
    } else {
        Vec::new()
    }
}
