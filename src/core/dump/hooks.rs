//! Before/after hooks around row production
//!
//! Hooks are plain functions over the run context, registered by name and run
//! strictly in registration order. A before hook may return
//! [`HookFlow::Halt`]; the chain then stops without producing rows or running
//! any after hook.

use super::context::DumpContext;
use crate::core::producers::RowProducer;
use crate::domain::Result;

/// Whether the chain should go on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFlow {
    Continue,
    Halt,
}

/// Result of running the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// All before hooks, production and all after hooks ran
    Completed,
    /// A before hook stopped the chain
    Halted { hook: String },
}

type HookFn = Box<dyn Fn(&mut DumpContext) -> Result<HookFlow> + Send + Sync>;

struct Hook {
    name: String,
    run: HookFn,
}

/// Ordered before/after hook registry
#[derive(Default)]
pub struct HookChain {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook that runs before rows are produced
    pub fn before<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut DumpContext) -> Result<HookFlow> + Send + Sync + 'static,
    {
        self.before.push(Hook {
            name: name.into(),
            run: Box::new(hook),
        });
        self
    }

    /// Register a hook that runs after rows are produced
    ///
    /// The returned flow is ignored; there is nothing left to halt.
    pub fn after<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut DumpContext) -> Result<HookFlow> + Send + Sync + 'static,
    {
        self.after.push(Hook {
            name: name.into(),
            run: Box::new(hook),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run before hooks, the producer, then after hooks
    ///
    /// # Errors
    ///
    /// Errors from hooks or the producer propagate unchanged; later steps
    /// are not run.
    pub async fn around(
        &self,
        ctx: &mut DumpContext,
        producer: &dyn RowProducer,
    ) -> Result<ChainOutcome> {
        for hook in &self.before {
            if (hook.run)(ctx)? == HookFlow::Halt {
                tracing::info!(
                    hook = %hook.name,
                    project_id = %ctx.project.id,
                    "Dump halted by hook"
                );
                return Ok(ChainOutcome::Halted {
                    hook: hook.name.clone(),
                });
            }
        }

        producer.generate_rows(ctx).await?;

        for hook in &self.after {
            (hook.run)(ctx)?;
        }
        Ok(ChainOutcome::Completed)
    }
}
