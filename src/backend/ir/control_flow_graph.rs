use std::{
    fmt::{self, Display},
    ops::{Index, IndexMut},
};

use bitvec::prelude::*;
use smallvec::SmallVec;

use super::{IRFunction, IRLabel};

pub struct ControlFlowNode {
    pub predecessors: SmallVec<[IRLabel; 4]>,
    pub successors: SmallVec<[IRLabel; 4]>,
    pub label: IRLabel,
}

impl Display for ControlFlowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {} -> {:?}",
            self.predecessors, self.label, self.successors
        )
    }
}

impl ControlFlowNode {
    pub fn new(label: IRLabel) -> ControlFlowNode {
        ControlFlowNode {
            predecessors: SmallVec::new(),
            successors: SmallVec::new(),
            label,
        }
    }
}

/// The edges between the basic blocks of a function
pub struct ControlFlowGraph {
    pub graph: Vec<ControlFlowNode>,
}

pub type CFG = ControlFlowGraph;

impl Display for ControlFlowGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.graph {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl ControlFlowGraph {
    fn find_successors(cfg: &mut ControlFlowGraph, function: &IRFunction) {
        for (node, block) in cfg.graph.iter_mut().zip(function.blocks.iter()) {
            if let Some(terminator) = block.terminator() {
                for successor in terminator.successors() {
                    if !node.successors.contains(&successor) {
                        node.successors.push(successor);
                    }
                }
            }
        }
    }

    fn find_predecessors(cfg: &mut ControlFlowGraph) {
        for block in 0..cfg.graph.len() {
            for successor in cfg.graph[block].successors.clone() {
                cfg.graph[successor as usize]
                    .predecessors
                    .push(block as IRLabel);
            }
        }
    }

    pub fn construct(function: &IRFunction) -> ControlFlowGraph {
        log::info!("Constructing CFG of {}", function.name);
        let mut cfg = ControlFlowGraph {
            graph: function
                .blocks
                .iter()
                .map(|block| ControlFlowNode::new(block.label))
                .collect(),
        };
        CFG::find_successors(&mut cfg, function);
        CFG::find_predecessors(&mut cfg);
        log::trace!("CFG:\n{}", cfg);
        cfg
    }

    // The blocks that can be reached from the entry block
    pub fn reachable(&self) -> BitVec {
        let mut visited = bitvec![0; self.len()];
        let mut stack: Vec<IRLabel> = Vec::new();
        if !self.graph.is_empty() {
            stack.push(0);
        }
        while let Some(label) = stack.pop() {
            if visited[label as usize] {
                continue;
            }
            visited.set(label as usize, true);
            for &successor in &self[label].successors {
                if !visited[successor as usize] {
                    stack.push(successor);
                }
            }
        }
        visited
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ControlFlowNode> {
        self.into_iter()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

impl Index<usize> for ControlFlowGraph {
    type Output = ControlFlowNode;
    fn index(&self, index: usize) -> &Self::Output {
        &self.graph[index]
    }
}
impl IndexMut<usize> for ControlFlowGraph {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.graph[index]
    }
}
impl Index<u32> for ControlFlowGraph {
    type Output = ControlFlowNode;
    fn index(&self, index: u32) -> &Self::Output {
        &self[index as usize]
    }
}
impl IndexMut<u32> for ControlFlowGraph {
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        &mut self[index as usize]
    }
}
impl<'a> IntoIterator for &'a ControlFlowGraph {
    type IntoIter = std::slice::Iter<'a, ControlFlowNode>;
    type Item = &'a ControlFlowNode;
    fn into_iter(self) -> Self::IntoIter {
        self.graph.iter()
    }
}
