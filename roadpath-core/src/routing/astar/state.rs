use std::cmp::Ordering;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;

use crate::routing::assembler::PathStep;
use crate::{EdgeId, NodeId, Seconds};

#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    /// `g + h`
    pub(super) estimate: f64,
    pub(super) cost: Seconds,
    pub(super) slot: usize,
}

// Min-heap by estimate. Equal estimates prefer the larger known cost (the
// node closer to the goal), then the node discovered first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// Per-search bookkeeping, indexed by dense slots handed out in discovery order
pub(super) struct SearchTree {
    ids: Vec<NodeId>,
    slots: HashMap<NodeId, usize>,
    pub(super) best: Vec<Seconds>,
    /// Slot and segment the best path arrives from
    pub(super) parent: Vec<Option<(usize, EdgeId)>>,
    /// Cached lower bound to the goal
    pub(super) bound: Vec<Option<f64>>,
    closed: FixedBitSet,
}

impl SearchTree {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            best: Vec::with_capacity(capacity),
            parent: Vec::with_capacity(capacity),
            bound: Vec::with_capacity(capacity),
            closed: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Slot of `id`, registering it as unreached when first seen
    pub(super) fn slot(&mut self, id: NodeId) -> usize {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id);
        self.slots.insert(id, slot);
        self.best.push(Seconds::MAX);
        self.parent.push(None);
        self.bound.push(None);
        if self.closed.len() <= slot {
            self.closed.grow((slot + 1).max(self.closed.len() * 2));
        }
        slot
    }

    pub(super) fn id(&self, slot: usize) -> NodeId {
        self.ids[slot]
    }

    pub(super) fn is_closed(&self, slot: usize) -> bool {
        self.closed.contains(slot)
    }

    pub(super) fn close(&mut self, slot: usize) {
        self.closed.insert(slot);
    }

    /// Walks the parent chain back from `goal`, returning steps in travel order
    pub(super) fn path_to(&self, goal: usize) -> Vec<PathStep> {
        let mut steps = Vec::new();
        let mut current = Some(goal);
        while let Some(slot) = current {
            let parent = self.parent[slot];
            steps.push(PathStep {
                node: self.ids[slot],
                via: parent.map(|(_, edge)| edge),
            });
            current = parent.map(|(prev, _)| prev);
        }
        steps.reverse();
        steps
    }
}
