//! Lyrics engine: cancellable fetch/extract pipeline and its session runtime.
mod adapter;
mod debounce;
mod decode;
mod engine;
mod extract;
mod fetch;
mod pipeline;
mod types;

pub use adapter::{
    AdapterError, SiteAdapter, AZLYRICS_LYRICS_SELECTOR, AZLYRICS_RESULT_LINK_SELECTOR,
    AZLYRICS_SEARCH_ENDPOINT, DEFAULT_QUERY_PARAM,
};
pub use debounce::{DebounceSettings, InputDebouncer};
pub use decode::{decode_body, DecodedBody};
pub use engine::{EngineConfig, LyricsSession, RunSupervisor};
pub use extract::{
    extract, href_attribute, trimmed_text, ExtractError, Extraction, NodeExtractor,
    QueryDescriptor, SelectorError,
};
pub use fetch::{build_url, FetchSettings, Fetcher, ReqwestFetcher};
pub use pipeline::{ChannelLyricsSink, LyricsSink, QueryPipeline};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    EngineError, EngineEvent, ErrorKind, FailureKind, FetchError, PipelineError, RunId,
};
