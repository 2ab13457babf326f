use std::time::Duration;

use engine_logging::{clip, engine_debug, engine_trace, DEFAULT_CLIP_CHARS};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct DebounceSettings {
    pub quiet_period: Duration,
    /// Inputs shorter than this many characters never reach the pipeline.
    pub min_chars: usize,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(400),
            min_chars: 5,
        }
    }
}

/// Length filter, then debounce, then change filter.
#[derive(Debug, Clone, Default)]
pub struct InputDebouncer {
    settings: DebounceSettings,
}

impl InputDebouncer {
    pub fn new(settings: DebounceSettings) -> Self {
        Self { settings }
    }

    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() >= self.settings.min_chars
    }

    /// Runs until `input` closes or `cancel` fires.
    ///
    /// A value still waiting for its quiet period when `input` closes is flushed.
    /// Rejected short inputs do not restart the quiet period.
    pub async fn run(
        self,
        mut input: mpsc::UnboundedReceiver<String>,
        output: mpsc::UnboundedSender<String>,
        cancel: CancellationToken,
    ) {
        let mut pending: Option<String> = None;
        let mut last_forwarded: Option<String> = None;
        let timer = sleep_until(Instant::now());
        tokio::pin!(timer);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = input.recv() => match event {
                    Some(text) if self.accepts(&text) => {
                        engine_trace!("input accepted: {}", clip(&text, DEFAULT_CLIP_CHARS));
                        pending = Some(text);
                        timer.as_mut().reset(Instant::now() + self.settings.quiet_period);
                    }
                    Some(_) => {}
                    None => {
                        if let Some(value) = pending.take() {
                            forward(value, &mut last_forwarded, &output);
                        }
                        break;
                    }
                },
                _ = &mut timer, if pending.is_some() => {
                    if let Some(value) = pending.take() {
                        forward(value, &mut last_forwarded, &output);
                    }
                }
            }
        }
        engine_debug!("input debouncer stopped");
    }
}

fn forward(
    value: String,
    last_forwarded: &mut Option<String>,
    output: &mpsc::UnboundedSender<String>,
) {
    if last_forwarded.as_deref() == Some(value.as_str()) {
        engine_trace!("unchanged query suppressed");
        return;
    }
    engine_debug!("query forwarded: {}", clip(&value, DEFAULT_CLIP_CHARS));
    let _ = output.send(value.clone());
    *last_forwarded = Some(value);
}
