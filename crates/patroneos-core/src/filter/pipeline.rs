use super::{
    context::RequestContext,
    rules::{ContractBlacklist, MaxSignatures, MaxTransactionSize, MaxTransactions, Stage, ValidJson},
};
use crate::types::RejectReason;
use std::fmt;

/// A request halted by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    /// Name of the stage that refused the request.
    pub stage: &'static str,
    pub reason: RejectReason,
}

/// Ordered chain of rule stages, built once at startup and shared by every request.
///
/// Stages run in order and the first rejection stops evaluation: later stages and the
/// forwarder never see the request.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The standard chain: cheapest and most fundamental checks first.
    #[must_use]
    pub fn standard() -> Self {
        Self::builder()
            .stage(ValidJson)
            .stage(MaxTransactions)
            .stage(MaxTransactionSize)
            .stage(MaxSignatures)
            .stage(ContractBlacklist)
            .build()
    }

    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`]; no stage after it is evaluated.
    pub fn evaluate(&self, ctx: &RequestContext) -> Result<(), Rejection> {
        self.stages.iter().try_for_each(|stage| {
            stage.check(ctx).map_err(|reason| Rejection { stage: stage.name(), reason })
        })
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stage_names()).finish()
    }
}

/// Assembles a [`Pipeline`] from stages in evaluation order.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    /// Appends a stage; stages run in the order they are added.
    #[must_use]
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline { stages: self.stages }
    }
}
