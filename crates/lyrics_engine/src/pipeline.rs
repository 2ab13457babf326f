use std::sync::Arc;

use engine_logging::{clip, engine_debug, engine_info, engine_warn, DEFAULT_CLIP_CHARS};
use tokio_util::sync::CancellationToken;

use crate::adapter::SiteAdapter;
use crate::extract::extract;
use crate::fetch::Fetcher;
use crate::{EngineEvent, PipelineError, RunId};

/// Receives everything a session produces. Emission must not block.
pub trait LyricsSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelLyricsSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelLyricsSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl LyricsSink for ChannelLyricsSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// search -> first result link -> lyrics page -> lyrics fragments.
pub struct QueryPipeline {
    fetcher: Arc<dyn Fetcher>,
    adapter: Arc<SiteAdapter>,
}

impl QueryPipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, adapter: Arc<SiteAdapter>) -> Self {
        Self { fetcher, adapter }
    }

    /// Runs every stage for `query`, emitting fragments as they are extracted.
    ///
    /// Returns the number of fragments emitted. The first error of any stage ends
    /// the run; cancellation surfaces as [`PipelineError::Cancelled`].
    pub async fn run(
        &self,
        run_id: RunId,
        query: &str,
        cancel: &CancellationToken,
        sink: &dyn LyricsSink,
    ) -> Result<usize, PipelineError> {
        let search_page = self.search_request(query, cancel).await?;
        let link = self.search_results(&search_page)?;
        engine_debug!("run {run_id}: first result {}", clip(&link, DEFAULT_CLIP_CHARS));
        let lyrics_page = self.request(&link, cancel).await?;
        self.lyrics(run_id, &lyrics_page, cancel, sink)
    }

    /// [`run`](Self::run) wrapped in error containment.
    ///
    /// A failed run is logged, reported once as [`EngineEvent::RunContained`], and
    /// then stays silent without returning until `cancel` fires. Callers that
    /// supervise runs therefore see a failed run exactly like an idle live one.
    pub async fn run_contained(
        &self,
        run_id: RunId,
        query: &str,
        cancel: &CancellationToken,
        sink: &dyn LyricsSink,
    ) {
        match self.run(run_id, query, cancel, sink).await {
            Ok(fragments) => {
                engine_info!("run {run_id}: {fragments} lyrics fragment(s)");
                sink.emit(EngineEvent::RunCompleted { run_id, fragments });
            }
            Err(PipelineError::Cancelled) => {
                engine_debug!("run {run_id}: superseded");
            }
            Err(err) => {
                handle_error(run_id, query, &err, sink);
                cancel.cancelled().await;
            }
        }
    }

    async fn search_request(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let params = [(self.adapter.query_param(), query)];
        let page = self
            .fetcher
            .fetch(self.adapter.search_endpoint().as_str(), &params, cancel)
            .await?;
        Ok(page)
    }

    /// First result link only; later matches are never extracted.
    fn search_results(&self, html: &str) -> Result<String, PipelineError> {
        let descriptor = self.adapter.result_links();
        let first = extract(html, descriptor)?.first();
        let link = first.ok_or_else(|| PipelineError::NoMatch {
            selector: descriptor.selector().to_string(),
        })?;
        match self.adapter.resolve_link(&link) {
            Some(url) => Ok(url.into()),
            None => Err(PipelineError::NoMatch {
                selector: descriptor.selector().to_string(),
            }),
        }
    }

    async fn request(&self, uri: &str, cancel: &CancellationToken) -> Result<String, PipelineError> {
        Ok(self.fetcher.fetch(uri, &[], cancel).await?)
    }

    fn lyrics(
        &self,
        run_id: RunId,
        html: &str,
        cancel: &CancellationToken,
        sink: &dyn LyricsSink,
    ) -> Result<usize, PipelineError> {
        let extraction = extract(html, self.adapter.lyrics())?;
        let mut emitted = 0;
        for text in extraction.strings() {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            sink.emit(EngineEvent::Fragment { run_id, text });
            emitted += 1;
        }
        Ok(emitted)
    }
}

fn handle_error(run_id: RunId, query: &str, err: &PipelineError, sink: &dyn LyricsSink) {
    engine_warn!(
        "run {run_id} for {:?} failed: {err}",
        clip(query, DEFAULT_CLIP_CHARS)
    );
    if let Some(kind) = err.kind() {
        sink.emit(EngineEvent::RunContained { run_id, kind });
    }
}
