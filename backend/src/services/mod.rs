pub mod llm;
pub mod record_store;

pub use llm::{ChatCompletion, LLMClient, SvgService};
pub use record_store::{PocketBaseClient, RecordStore, StoreError};
