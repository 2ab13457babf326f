use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{clip, engine_debug, engine_error, engine_info, DEFAULT_CLIP_CHARS};
use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::adapter::SiteAdapter;
use crate::debounce::{DebounceSettings, InputDebouncer};
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::pipeline::{ChannelLyricsSink, LyricsSink, QueryPipeline};
use crate::{EngineError, EngineEvent, RunId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub adapter: SiteAdapter,
    pub fetch: FetchSettings,
    pub debounce: DebounceSettings,
}

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps at most one pipeline run alive: each new query cancels the previous run.
///
/// Must be driven on a single-threaded (`current_thread`) tokio runtime. A
/// superseded run stops emitting because it checks its token between
/// synchronous emits; on a multi-thread runtime an emit already in progress
/// could still land after the next `RunStarted`.
pub struct RunSupervisor {
    pipeline: Arc<QueryPipeline>,
    sink: Arc<dyn LyricsSink>,
    shutdown: CancellationToken,
    current: Option<ActiveRun>,
    last_run_id: RunId,
}

impl RunSupervisor {
    pub fn new(
        pipeline: Arc<QueryPipeline>,
        sink: Arc<dyn LyricsSink>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            sink,
            shutdown,
            current: None,
            last_run_id: 0,
        }
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current.as_ref().map(|run| run.run_id)
    }

    /// Supersede the live run (if any) and start a new one for `query`.
    pub fn submit(&mut self, query: String) -> RunId {
        if let Some(previous) = self.current.take() {
            engine_debug!("run {} superseded", previous.run_id);
            previous.cancel.cancel();
        }

        self.last_run_id += 1;
        let run_id = self.last_run_id;
        let cancel = self.shutdown.child_token();
        engine_info!("run {run_id}: searching {:?}", clip(&query, DEFAULT_CLIP_CHARS));
        self.sink.emit(EngineEvent::RunStarted {
            run_id,
            query: query.clone(),
        });

        let pipeline = self.pipeline.clone();
        let sink = self.sink.clone();
        let run_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            pipeline
                .run_contained(run_id, &query, &run_cancel, sink.as_ref())
                .await;
        });

        self.current = Some(ActiveRun {
            run_id,
            cancel,
            handle,
        });
        run_id
    }

    /// Submit every query from `queries` until shutdown.
    ///
    /// A closed query channel is reported once as [`EngineEvent::InputExhausted`];
    /// the live run keeps going until shutdown.
    /// The `shutdown` token passed to [`new`](Self::new) ends the loop.
    pub async fn drive(mut self, mut queries: async_mpsc::UnboundedReceiver<String>) {
        let mut open = true;
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                query = queries.recv(), if open => match query {
                    Some(query) => {
                        self.submit(query);
                    }
                    None => {
                        open = false;
                        self.sink.emit(EngineEvent::InputExhausted);
                    }
                },
            }
        }
        self.stop().await;
    }

    /// Cancel everything and wait for the live run to unwind.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(run) = self.current.take() {
            run.cancel.cancel();
            let _ = run.handle.await;
        }
    }
}

/// Session-scoped engine: a worker thread with a single-threaded runtime hosting
/// the debouncer and the run supervisor. Stopped explicitly or on drop.
pub struct LyricsSession {
    input_tx: Mutex<Option<async_mpsc::UnboundedSender<String>>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl LyricsSession {
    pub fn start(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(config.fetch).map_err(EngineError::Client)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (input_tx, input_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();

        let pipeline = Arc::new(QueryPipeline::new(
            Arc::new(fetcher),
            Arc::new(config.adapter),
        ));
        let sink: Arc<dyn LyricsSink> = Arc::new(ChannelLyricsSink::new(event_tx));
        let debouncer = InputDebouncer::new(config.debounce);
        let worker_shutdown = shutdown.clone();

        let worker = thread::Builder::new()
            .name("lyrics-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let (query_tx, query_rx) = async_mpsc::unbounded_channel();
                    let debounce_task =
                        tokio::spawn(debouncer.run(input_rx, query_tx, worker_shutdown.clone()));
                    RunSupervisor::new(pipeline, sink, worker_shutdown)
                        .drive(query_rx)
                        .await;
                    if let Err(err) = debounce_task.await {
                        engine_error!("input debouncer task failed: {err}");
                    }
                });
                engine_debug!("engine worker stopped");
            })?;

        engine_info!("lyrics session started");
        Ok(Self {
            input_tx: Mutex::new(Some(input_tx)),
            event_rx,
            shutdown,
            worker: Some(worker),
        })
    }

    /// Feed one text-change event.
    pub fn input(&self, text: impl Into<String>) {
        if let Ok(guard) = self.input_tx.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(text.into());
            }
        }
    }

    /// No more input will arrive; the pending value (if any) is still dispatched.
    pub fn close_input(&self) {
        if let Ok(mut guard) = self.input_tx.lock() {
            guard.take();
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Cancel every run, stop the worker and wait for it to exit.
    pub fn stop(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        self.shutdown.cancel();
        self.close_input();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                engine_error!("engine worker panicked");
            }
            engine_info!("lyrics session stopped");
        }
    }
}

impl Drop for LyricsSession {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
