//! Time-boxed iterative-deepening search over placements.
//!
//! One `BoardState` clone is mutated in place for the whole decision: every
//! placement is committed through [`Committed`], which unplaces on drop, so
//! a deadline exit halfway down the tree still leaves the clone exact.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use rustc_hash::FxHashMap;
use stacker_core::Placement;
use stacker_engine::{find_path, generate_placements, BoardState, Clears, InputPath, PlacementList};
use stacker_eval::{Evaluator, Features};
use tracing::{debug, info, trace};

use crate::cache::{node_key, terminal_key, SearchCache};
use crate::config::SearchConfig;
use crate::deadline::Deadline;

/// Value of a branch whose next piece cannot spawn
pub const DEAD_END: f32 = -1.0e6;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub pruned: u64,
    /// Deepest fully completed iteration
    pub depth: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub placement: Placement,
    pub inputs: InputPath,
    pub value: f32,
    pub depth: u32,
    pub stats: SearchStats,
}

/// A placement that is undone when dropped
struct Committed<'a> {
    state: &'a mut BoardState,
    clears: Clears,
}

impl<'a> Committed<'a> {
    fn place(state: &'a mut BoardState, placement: &Placement) -> Option<Self> {
        let clears = state.place_at(placement)?;
        Some(Self { state, clears })
    }
}

impl Deref for Committed<'_> {
    type Target = BoardState;

    fn deref(&self) -> &BoardState {
        self.state
    }
}

impl DerefMut for Committed<'_> {
    fn deref_mut(&mut self) -> &mut BoardState {
        self.state
    }
}

impl Drop for Committed<'_> {
    fn drop(&mut self) {
        self.state.unplace(&self.clears);
    }
}

struct Context {
    deadline: Deadline,
    threshold: f32,
    discount: f32,
    window: usize,
    stats: SearchStats,
}

pub struct SearchEngine<E> {
    evaluator: E,
    config: SearchConfig,
    threshold: f32,
    cache: SearchCache,
}

impl<E: Evaluator> SearchEngine<E> {
    pub fn new(evaluator: E, config: SearchConfig) -> Self {
        let threshold = config
            .threshold
            .max(config.threshold_min)
            .min(config.threshold_max);
        Self {
            evaluator,
            config,
            threshold,
            cache: SearchCache::new(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Current pruning threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn decide(&mut self, state: &BoardState) -> Option<Decision> {
        self.decide_within(state, self.config.time_budget())
    }

    /// Best placement for the current piece and the inputs that reach it.
    /// `None` when no iteration completed before the deadline.
    pub fn decide_within(&mut self, state: &BoardState, budget: Duration) -> Option<Decision> {
        let span = tracing::info_span!("decide", budget_ms = budget.as_millis() as u64);
        let _enter = span.enter();

        if self.cache.trim(self.config.cache_capacity) {
            debug!("caches cleared");
        }

        let mut ctx = Context {
            deadline: Deadline::after(budget),
            threshold: self.threshold,
            discount: self.config.discount,
            window: self.config.cache_depth,
            stats: SearchStats::default(),
        };
        let mut local = state.clone();
        let max_depth = self.max_depth(state);
        let mut paths: FxHashMap<Placement, Option<InputPath>> = FxHashMap::default();
        let mut best: Option<Decision> = None;

        for depth in 1..=max_depth {
            let Some(values) = self.search_root(&mut ctx, &mut local, depth) else {
                break;
            };
            // the root set is the same at every depth
            let Some((placement, value, inputs)) = select(state, &values, &mut paths) else {
                break;
            };
            ctx.stats.depth = depth;
            debug!(depth, value, nodes = ctx.stats.nodes, "depth complete");
            best = Some(Decision {
                placement,
                inputs,
                value,
                depth,
                stats: ctx.stats,
            });
        }

        ctx.stats.elapsed = ctx.deadline.elapsed();
        self.adapt_threshold(&ctx, max_depth);

        let mut decision = best?;
        decision.stats = ctx.stats;
        info!(
            depth = decision.depth,
            value = decision.value,
            nodes = ctx.stats.nodes,
            cache_hits = ctx.stats.cache_hits,
            pruned = ctx.stats.pruned,
            elapsed_us = ctx.stats.elapsed.as_micros() as u64,
            "decision"
        );
        Some(decision)
    }

    /// Pieces that can be placed: current plus previews, capped by config
    fn max_depth(&self, state: &BoardState) -> u32 {
        if state.current().is_none() {
            return 0;
        }
        let visible = 1 + state.queue().len() as u32;
        visible.min(self.config.max_depth)
    }

    fn search_root(
        &mut self,
        ctx: &mut Context,
        state: &mut BoardState,
        depth: u32,
    ) -> Option<Vec<(Placement, f32)>> {
        if ctx.deadline.expired() {
            return None;
        }
        let root_value = self.terminal_value(state, 0.0);
        let mut list = PlacementList::new();
        generate_placements(state, &mut list);

        let mut values = Vec::with_capacity(list.len());
        for placement in &list {
            let Some(mut next) = Committed::place(state, placement) else {
                continue;
            };
            let garbage = next.clears.garbage as f32;
            let weight = ctx.discount;
            let value = self.search_node(ctx, &mut next, depth - 1, garbage, weight, root_value)?;
            values.push((*placement, value));
        }
        Some(values)
    }

    /// `None` only when the deadline passed somewhere below
    fn search_node(
        &mut self,
        ctx: &mut Context,
        state: &mut BoardState,
        depth: u32,
        garbage: f32,
        weight: f32,
        parent: f32,
    ) -> Option<f32> {
        if ctx.deadline.expired() {
            return None;
        }
        ctx.stats.nodes += 1;
        if state.topped_out() {
            return Some(DEAD_END);
        }

        let value = self.terminal_value(state, garbage);
        if depth == 0 {
            return Some(value);
        }
        if value - parent < ctx.threshold {
            ctx.stats.pruned += 1;
            return Some(value);
        }

        let key = node_key(state, ctx.window, depth, garbage, weight);
        if let Some(cached) = self.cache.placement(key) {
            ctx.stats.cache_hits += 1;
            return Some(cached);
        }

        let mut list = PlacementList::new();
        generate_placements(state, &mut list);

        let mut best: Option<f32> = None;
        for placement in &list {
            let Some(mut next) = Committed::place(state, placement) else {
                continue;
            };
            let child_garbage = garbage + next.clears.garbage as f32 * weight;
            let child_weight = weight * ctx.discount;
            let v = self.search_node(ctx, &mut next, depth - 1, child_garbage, child_weight, value)?;
            best = Some(best.map_or(v, |b| b.max(v)));
        }

        // no placements: queue ran dry
        let best = best.unwrap_or(value);
        self.cache.store_placement(key, best);
        Some(best)
    }

    fn terminal_value(&mut self, state: &BoardState, garbage: f32) -> f32 {
        let key = terminal_key(state, garbage);
        if let Some(value) = self.cache.terminal(key) {
            return value;
        }
        let value = self
            .evaluator
            .evaluate(&Features::extract(state.mask(), garbage));
        self.cache.store_terminal(key, value);
        value
    }

    /// Spare time loosens the threshold toward zero so more branches are
    /// pruned next time; a timeout short of the target depth tightens it
    /// (more negative) in proportion to the missing depth.
    fn adapt_threshold(&mut self, ctx: &Context, max_depth: u32) {
        let config = &self.config;
        let factor = if ctx.deadline.is_expired() {
            let target = config.target_depth.min(max_depth);
            let shortfall = target.saturating_sub(ctx.stats.depth) as f32;
            (config.shortfall_gain * shortfall).exp()
        } else {
            let budget = ctx.deadline.budget().as_secs_f32();
            let spare = if budget > 0.0 {
                (1.0 - ctx.stats.elapsed.as_secs_f32() / budget).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (-config.spare_gain * spare).exp()
        };

        let before = self.threshold;
        self.threshold = (before * factor)
            .max(config.threshold_min)
            .min(config.threshold_max);
        trace!(before, after = self.threshold, factor, "threshold adapted");
    }
}

/// Highest value with a verified path; ties go to the shorter path
fn select(
    state: &BoardState,
    values: &[(Placement, f32)],
    paths: &mut FxHashMap<Placement, Option<InputPath>>,
) -> Option<(Placement, f32, InputPath)> {
    let mut best: Option<(Placement, f32, InputPath)> = None;
    for &(placement, value) in values {
        if best.as_ref().is_some_and(|(_, b, _)| value < *b) {
            continue;
        }
        let path = paths
            .entry(placement)
            .or_insert_with(|| find_path(state, &placement));
        let Some(path) = path else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((_, b, inputs)) => value > *b || path.len() < inputs.len(),
        };
        if better {
            best = Some((placement, value, path.clone()));
        }
    }
    best
}
