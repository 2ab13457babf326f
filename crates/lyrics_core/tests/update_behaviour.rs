use std::sync::Once;

use lyrics_core::{update, AppState, Effect, Msg, RunStatus};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter().fold((state, Vec::new()), |(state, mut all), msg| {
        let (state, effects) = update(state, msg);
        all.extend(effects);
        (state, all)
    })
}

fn started(run_id: u64, query: &str) -> Msg {
    Msg::RunStarted {
        run_id,
        query: query.to_string(),
    }
}

fn fragment(run_id: u64, text: &str) -> Msg {
    Msg::LyricsFragment {
        run_id,
        text: text.to_string(),
    }
}

#[test]
fn input_is_recorded_and_forwarded() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::InputChanged("imag".to_string()));

    assert_eq!(state.view().input, "imag");
    assert_eq!(
        effects,
        vec![Effect::ForwardInput {
            text: "imag".to_string()
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn fragments_accumulate_in_order_for_live_run() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            started(1, "imagine"),
            fragment(1, "Imagine there's no heaven"),
            fragment(1, "It's easy if you try"),
        ],
    );
    let view = state.view();
    let run = view.run.as_ref().unwrap();

    assert!(effects.is_empty());
    assert_eq!(run.query, "imagine");
    assert_eq!(run.status, RunStatus::Streaming);
    assert_eq!(
        view.lyrics_text(),
        "Imagine there's no heaven\nIt's easy if you try"
    );
}

#[test]
fn new_run_replaces_display_and_drops_stale_fragments() {
    init_logging();
    let (mut state, _) = apply(
        AppState::new(),
        vec![started(1, "imagine"), fragment(1, "old"), started(2, "yesterday")],
    );
    assert!(state.consume_dirty());
    assert_eq!(state.view().lyrics_text(), "");

    let (mut state, _) = update(state, fragment(1, "stale"));
    assert!(!state.consume_dirty());

    let (state, _) = update(state, fragment(2, "Yesterday"));
    assert_eq!(state.view().lyrics_text(), "Yesterday");
}

#[test]
fn late_start_of_older_run_is_ignored() {
    init_logging();
    let (state, _) = apply(AppState::new(), vec![started(2, "new"), started(1, "old")]);
    assert_eq!(state.view().run.unwrap().query, "new");
}

#[test]
fn contained_run_keeps_shown_lyrics() {
    init_logging();
    let (state, _) = apply(
        AppState::new(),
        vec![
            started(1, "imagine"),
            fragment(1, "kept"),
            Msg::RunContained { run_id: 1 },
            fragment(1, "after failure"),
        ],
    );
    let view = state.view();
    assert_eq!(view.run.as_ref().unwrap().status, RunStatus::Stalled);
    assert_eq!(view.lyrics_text(), "kept");
}

#[test]
fn input_closed_asks_engine_to_close() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::InputClosed);
    assert_eq!(effects, vec![Effect::CloseInput]);
}

#[test]
fn exhausted_input_with_no_run_shuts_down() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::InputExhausted);
    assert_eq!(effects, vec![Effect::Shutdown]);
}

#[test]
fn exhausted_input_waits_for_live_run_to_settle() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![started(1, "imagine"), Msg::InputExhausted],
    );
    assert!(effects.is_empty());

    let (_, effects) = update(
        state,
        Msg::RunCompleted {
            run_id: 1,
            fragments: 0,
        },
    );
    assert_eq!(effects, vec![Effect::Shutdown]);
}

#[test]
fn contained_run_also_allows_shutdown() {
    init_logging();
    let (_, effects) = apply(
        AppState::new(),
        vec![
            started(1, "zzzzzz"),
            Msg::InputExhausted,
            Msg::RunContained { run_id: 1 },
        ],
    );
    assert_eq!(effects, vec![Effect::Shutdown]);
}

#[test]
fn completion_of_superseded_run_is_ignored() {
    init_logging();
    let (state, effects) = apply(
        AppState::new(),
        vec![
            started(1, "imagine"),
            started(2, "yesterday"),
            Msg::InputExhausted,
            Msg::RunCompleted {
                run_id: 1,
                fragments: 3,
            },
        ],
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().run.unwrap().status, RunStatus::Searching);
}
