//! The two-phase lead crawl: discovery over search results, enrichment over
//! profile pages, and delivery of retained records to a sink.

pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod orchestrator;
pub mod sink;

pub use discovery::discover_candidates;
pub use enrichment::{enrich_candidates, EnrichmentOutcome, EnrichmentPolicy};
pub use error::{PipelineError, SinkError};
pub use orchestrator::{run_pipeline, RunSummary};
pub use sink::{JsonFileSink, MemorySink, RecordSink};
