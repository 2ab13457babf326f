use engine_logging::{clip, engine_debug, engine_info, DEFAULT_CLIP_CHARS};
use lyrics_core::{Effect, Msg};
use lyrics_engine::{EngineEvent, LyricsSession};

pub struct EffectRunner {
    session: LyricsSession,
}

impl EffectRunner {
    pub fn new(session: LyricsSession) -> Self {
        Self { session }
    }

    /// Executes effects; returns `false` once a shutdown was requested.
    pub fn run(&self, effects: Vec<Effect>) -> bool {
        let mut keep_running = true;
        for effect in effects {
            match effect {
                Effect::ForwardInput { text } => {
                    engine_debug!("input {:?}", clip(&text, DEFAULT_CLIP_CHARS));
                    self.session.input(text);
                }
                Effect::CloseInput => {
                    engine_info!("input closed");
                    self.session.close_input();
                }
                Effect::Shutdown => keep_running = false,
            }
        }
        keep_running
    }

    /// Next engine event translated for the core, if one is ready.
    pub fn poll(&self, timeout: std::time::Duration) -> Option<Msg> {
        self.session.recv_timeout(timeout).map(map_event)
    }

    pub fn stop(self) {
        self.session.stop();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RunStarted { run_id, query } => Msg::RunStarted { run_id, query },
        EngineEvent::Fragment { run_id, text } => Msg::LyricsFragment { run_id, text },
        EngineEvent::RunCompleted { run_id, fragments } => Msg::RunCompleted { run_id, fragments },
        EngineEvent::RunContained { run_id, .. } => Msg::RunContained { run_id },
        EngineEvent::InputExhausted => Msg::InputExhausted,
    }
}
