//! Growth clock: the periodic tick that advances time-driven state.
//!
//! Each tick runs two phases against the wall-clock time the host passes in:
//!
//! 1. **Growth** -- every growing plant whose current cycle has elapsed
//!    becomes ready. Cycle length is the initial duration on the first cycle
//!    and the regrow duration afterwards.
//! 2. **Restock** -- if the restock interval has elapsed since the last
//!    restock, every seed's stock is redrawn.
//!
//! Ticks are idempotent: calling twice with the same `now` changes nothing
//! the second time. A tick that changed nothing does not save.

use tracing::debug;

use zengarden_types::{CellPos, EpochMillis, GameEvent, Notice};

use crate::garden::Garden;
use crate::store::StateStore;

/// What one tick changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// Cells that became ready, row-major.
    pub grown: Vec<CellPos>,
    /// Whether the shop restocked.
    pub restocked: bool,
    /// Milliseconds until the next restock after this tick.
    pub next_restock_in_ms: u64,
}

impl<S: StateStore> Garden<S> {
    /// Advance growth and the restock timer to `now`.
    pub fn tick(&mut self, now: EpochMillis) -> TickSummary {
        let grown = self.state.plot.advance(now, &self.catalog);
        for &pos in &grown {
            let message = self.state.plot.get(pos).map_or_else(
                || format!("The plant at {pos} has grown!"),
                |plant| format!("{} at {pos} has grown!", self.display_name(&plant.seed_id)),
            );
            self.notices.push(Notice::success(message));
            self.events.push(GameEvent::Grown { pos });
        }

        let check = self.state.shop.check_restock(
            &self.catalog,
            self.config.shop.stock_policy,
            self.config.garden.restock_interval_ms,
            now,
            &mut self.rng,
        );
        if check.restocked {
            self.notices
                .push(Notice::info("The seed shop has been restocked!"));
            self.events.push(GameEvent::Restocked { at: now });
        }

        let summary = TickSummary {
            grown,
            restocked: check.restocked,
            next_restock_in_ms: check.remaining_ms,
        };
        if summary.restocked || !summary.grown.is_empty() {
            debug!(now, grown = summary.grown.len(), restocked = summary.restocked, "Tick changed state");
            self.persist();
        }
        summary
    }
}
