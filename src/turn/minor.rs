//! Minor-action bookkeeping.
//!
//! Declarations queue up while the window is open and drain strictly in
//! declaration order. Each combatant gets one minor action per round.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{ActionRequest, CombatantId};

/// FIFO of declared minor actions plus the set of spent opportunities.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MinorQueue {
    queue: VecDeque<ActionRequest>,
    spent: FxHashSet<CombatantId>,
}

impl MinorQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give everyone their opportunity back and forget queued entries.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.spent.clear();
    }

    /// Check if `id` already used its minor action this round.
    #[must_use]
    pub fn is_spent(&self, id: CombatantId) -> bool {
        self.spent.contains(&id)
    }

    /// Queue a declaration, spending the actor's opportunity.
    pub fn declare(&mut self, request: ActionRequest) {
        self.spent.insert(request.actor);
        self.queue.push_back(request);
    }

    /// Next entry in declaration order.
    pub fn pop(&mut self) -> Option<ActionRequest> {
        self.queue.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionRequest> {
        self.queue.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
