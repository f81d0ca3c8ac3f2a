//! Block traversal: arena slots to emission order.
//!
//! Code generation numbers blocks in depth-first preorder from the start
//! block, following edges in edge order. [`BlockOrder`] computes that order
//! once per function; every later cross-reference (jump targets, labels,
//! error labels) uses the dense position it assigns.

use rustc_hash::FxHashMap;

use crate::graph::FlowGraph;
use crate::ids::BlockId;

/// Reachable blocks in traversal order, with their label numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockOrder {
    order: Vec<BlockId>,
    numbers: FxHashMap<BlockId, u32>,
}

impl BlockOrder {
    /// Walk the graph from its start block.
    ///
    /// Iterative DFS; produces the same preorder as the recursive walk.
    /// Edges to ids outside the arena are skipped here and reported by the
    /// code generator when it resolves the jump.
    pub fn compute(graph: &FlowGraph) -> Self {
        let num_blocks = graph.blocks.len();
        let mut visited = vec![false; num_blocks];
        let mut order = Vec::with_capacity(num_blocks);
        let mut stack = vec![graph.startblock];

        while let Some(id) = stack.pop() {
            let Some(block) = graph.block(id) else {
                continue;
            };
            if visited[id.index()] {
                continue;
            }
            visited[id.index()] = true;
            order.push(id);

            for succ in block.successors().into_iter().rev() {
                if succ.index() < num_blocks && !visited[succ.index()] {
                    stack.push(succ);
                }
            }
        }

        let numbers = order
            .iter()
            .enumerate()
            .map(|(n, &id)| (id, u32::try_from(n).unwrap_or(u32::MAX)))
            .collect();

        Self { order, numbers }
    }

    /// Blocks in emission order. The start block is first.
    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.order
    }

    /// The label number of a reachable block.
    #[inline]
    pub fn number(&self, id: BlockId) -> Option<u32> {
        self.numbers.get(&id).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
