//! Squad gate on approach-action construction
//!
//! Whatever the turn cycle decided, this is where a waiting squad member is
//! actually held back: it gets an empty action instead of an approach.

use crate::battle::ai::roster::is_squad_gated;
use crate::battle::host::ApproachActionBuilder;
use crate::battle::units::SquadMember;
use crate::core::config::SquadConfig;

/// Wraps a host builder; squad members not yet activated stand by
#[derive(Debug, Clone)]
pub struct SquadGatedBuilder<B> {
    inner: B,
    config: SquadConfig,
}

impl<B> SquadGatedBuilder<B> {
    pub fn new(inner: B, config: SquadConfig) -> Self {
        Self { inner, config }
    }
}

impl<U, B> ApproachActionBuilder<U> for SquadGatedBuilder<B>
where
    U: SquadMember,
    B: ApproachActionBuilder<U>,
{
    type Action = B::Action;
    type Context = B::Context;

    fn build_approach_action(&mut self, unit: &U, context: &Self::Context) -> Self::Action {
        if is_squad_gated(unit, &self.config) {
            tracing::trace!("{:?} is waiting for its squad", unit.id());
            return self.inner.build_empty_action();
        }
        self.inner.build_approach_action(unit, context)
    }

    fn build_empty_action(&mut self) -> Self::Action {
        self.inner.build_empty_action()
    }
}
