use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use lyrics_core::{update, AppState, Msg};
use lyrics_engine::LyricsSession;

use crate::config::{load_config, AppConfig, DEFAULT_CONFIG_FILENAME};
use crate::effects::EffectRunner;
use crate::logging;
use crate::render::Renderer;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let (config, config_problem) = match load_config(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    logging::initialize(config.log_destination);
    if let Some(err) = config_problem {
        engine_warn!("{err}; using defaults");
    }

    let engine_config = config
        .engine_config()
        .context("invalid lyrics site configuration")?;
    let session = LyricsSession::start(engine_config).context("failed to start lyrics engine")?;
    let effects = EffectRunner::new(session);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_input_reader(msg_tx);
    eprintln!("Type a song title, one edit per line. Ctrl-D to finish.");

    let mut state = AppState::new();
    let mut renderer = Renderer::default();
    let stdout = io::stdout();
    let mut keep_running = true;

    while keep_running {
        let mut inbox: Vec<Msg> = msg_rx.try_iter().collect();
        if let Some(msg) = effects.poll(POLL_INTERVAL) {
            inbox.push(msg);
            while let Some(msg) = effects.poll(Duration::ZERO) {
                inbox.push(msg);
            }
        }

        for msg in inbox {
            let (next, pending) = update(state, msg);
            state = next;
            keep_running &= effects.run(pending);
        }

        if state.consume_dirty() {
            renderer.render(&state.view(), &mut stdout.lock())?;
        }
    }

    effects.stop();
    engine_info!("lyrics_app finished");
    Ok(())
}

/// Each stdin line is one text-change event; EOF closes the input.
fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(text) => {
                    if msg_tx.send(Msg::InputChanged(text)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
        let _ = msg_tx.send(Msg::InputClosed);
    });
}
