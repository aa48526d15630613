//! Rule stages of the filter pipeline.
//!
//! Each stage inspects the request through its [`RequestContext`] and either lets it through
//! or names the [`RejectReason`] that halts it. Stages that need transactions pull them from
//! the context, which decodes the body once and shares the result with later stages.

use super::context::RequestContext;
use crate::types::{RejectReason, Transaction};
use serde::de::IgnoredAny;

/// One validation rule.
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Checks the request against this rule.
    ///
    /// # Errors
    ///
    /// Returns the reason the request must be rejected.
    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason>;
}

/// Pulls the cached transactions, mapping a decode failure to `PARSE_ERROR`.
fn transactions(ctx: &RequestContext) -> Result<&[Transaction], RejectReason> {
    ctx.transactions().map_err(|e| {
        tracing::debug!(error = %e, host = ctx.remote_host(), "transaction extraction failed");
        RejectReason::ParseError
    })
}

/// A non-empty body must be syntactically valid JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson;

impl Stage for ValidJson {
    fn name(&self) -> &'static str {
        "valid_json"
    }

    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason> {
        let body = ctx.body();
        if body.is_empty() {
            return Ok(());
        }

        serde_json::from_slice::<IgnoredAny>(body)
            .map(|_| ())
            .map_err(|_| RejectReason::InvalidJson)
    }
}

/// Batch size must not exceed `maxTransactions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxTransactions;

impl Stage for MaxTransactions {
    fn name(&self) -> &'static str {
        "max_transactions"
    }

    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason> {
        if transactions(ctx)?.len() > ctx.config().max_transactions {
            return Err(RejectReason::TooManyTransactions);
        }
        Ok(())
    }
}

/// Every action's `data` must fit in `maxTransactionSize` bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxTransactionSize;

impl Stage for MaxTransactionSize {
    fn name(&self) -> &'static str {
        "max_transaction_size"
    }

    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason> {
        let limit = ctx.config().max_transaction_size;
        let oversized = transactions(ctx)?
            .iter()
            .flat_map(|transaction| &transaction.actions)
            .any(|action| action.data.len() > limit);

        if oversized {
            return Err(RejectReason::InvalidTransactionSize);
        }
        Ok(())
    }
}

/// No transaction may carry more than `maxSignatures` signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxSignatures;

impl Stage for MaxSignatures {
    fn name(&self) -> &'static str {
        "max_signatures"
    }

    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason> {
        let limit = ctx.config().max_signatures;
        if transactions(ctx)?.iter().any(|transaction| transaction.signatures.len() > limit) {
            return Err(RejectReason::InvalidNumberSignatures);
        }
        Ok(())
    }
}

/// No action may target a blacklisted contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractBlacklist;

impl Stage for ContractBlacklist {
    fn name(&self) -> &'static str {
        "contract_blacklist"
    }

    fn check(&self, ctx: &RequestContext) -> Result<(), RejectReason> {
        let config = ctx.config();
        let blacklisted = transactions(ctx)?
            .iter()
            .flat_map(|transaction| &transaction.actions)
            .any(|action| config.is_blacklisted(&action.code));

        if blacklisted {
            return Err(RejectReason::BlacklistedContract);
        }
        Ok(())
    }
}
