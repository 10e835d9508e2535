//! Network builder: expands a downline into a labeled tree.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{Network, NodeData, ROOT_LABEL};
use crate::domain::entities::Downline;
use crate::domain::error::{DomainError, DomainResult};

/// Chooses which node of the previous generation sponsors a new affiliate.
///
/// Implementations only decide placement; bonus calculation never sees them.
pub trait ParentAssignment {
    /// Position (0-based) in the previous generation for the affiliate at
    /// `position` of `generation`. `previous_count` is always non-zero.
    fn assign(&self, generation: usize, position: usize, previous_count: usize) -> usize;
}

/// Spreads children across the previous generation by `position mod previous_count`.
///
/// A visualization convenience, not a real sponsorship model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl ParentAssignment for RoundRobin {
    fn assign(&self, _generation: usize, position: usize, previous_count: usize) -> usize {
        position % previous_count
    }
}

/// Constructs the downline network for a member.
#[derive(Debug, Default)]
pub struct NetworkBuilder<A = RoundRobin> {
    assignment: A,
}

impl NetworkBuilder<RoundRobin> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: ParentAssignment> NetworkBuilder<A> {
    pub fn with_assignment(assignment: A) -> Self {
        Self { assignment }
    }

    /// Build the tree: root `self`, then `G{g}-{j}` for every affiliate.
    ///
    /// Fails with `InvalidTopology` when a populated generation follows an empty one.
    #[instrument(level = "debug", skip(self, downline), fields(generations = downline.len()))]
    pub fn build(&self, downline: &Downline) -> DomainResult<Network> {
        let mut network = Network::new();
        let root = network.insert_node(
            NodeData {
                label: ROOT_LABEL.to_string(),
                generation: 0,
            },
            None,
        );

        let mut previous: Vec<Index> = vec![root];
        for (offset, record) in downline.iter().enumerate() {
            let generation = offset + 1;
            let count = record.affiliate_count as usize;
            if previous.is_empty() && count > 0 {
                return Err(DomainError::InvalidTopology {
                    generation,
                    affiliate_count: record.affiliate_count,
                });
            }

            let mut current = Vec::with_capacity(count);
            for position in 0..count {
                let parent = if generation == 1 {
                    root
                } else {
                    let slot = self.assignment.assign(generation, position, previous.len());
                    *previous.get(slot).ok_or(DomainError::InvalidTopology {
                        generation,
                        affiliate_count: record.affiliate_count,
                    })?
                };
                let data = NodeData {
                    label: format!("G{generation}-{}", position + 1),
                    generation,
                };
                current.push(network.insert_node(data, Some(parent)));
            }
            debug!("generation {generation}: {count} nodes");
            previous = current;
        }

        Ok(network)
    }
}

/// Build a network with round-robin parent assignment.
pub fn build_network(downline: &Downline) -> DomainResult<Network> {
    NetworkBuilder::new().build(downline)
}
