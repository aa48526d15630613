//! Request filtering pipeline.
//!
//! ```text
//!   Inbound request (body fully read)
//!        │
//!        ▼
//!   RequestContext ── config snapshot, remote host, body, lazy transaction cache
//!        │
//!        ▼
//!   ┌──────────────────────────┐
//!   │ 1. valid_json            │ ─► INVALID_JSON
//!   │ 2. max_transactions      │ ─► TOO_MANY_TRANSACTIONS
//!   │ 3. max_transaction_size  │ ─► INVALID_TRANSACTION_SIZE
//!   │ 4. max_signatures        │ ─► INVALID_NUMBER_SIGNATURES
//!   │ 5. contract_blacklist    │ ─► BLACKLISTED_CONTRACT
//!   └──────────────────────────┘     (any of 2-5 may also yield PARSE_ERROR)
//!        │ all pass
//!        ▼
//!   Forwarder ─► upstream node
//! ```
//!
//! Stages 2-5 share one decode of the body through [`RequestContext::transactions`]; the
//! first stage that needs transactions triggers it.

pub mod context;
pub mod pipeline;
pub mod rules;

pub use context::{extract_transactions, BodyShape, ExtractionError, RequestContext};
pub use pipeline::{Pipeline, PipelineBuilder, Rejection};
pub use rules::{
    ContractBlacklist, MaxSignatures, MaxTransactionSize, MaxTransactions, Stage, ValidJson,
};
