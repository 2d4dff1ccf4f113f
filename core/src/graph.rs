//! Graph-of-accounts view derived from the transaction history.
//!
//! RULE: the graph is a value, rebuilt by a pure function of
//! (history, registry). Nothing mutates a built graph in place.

use crate::{
    blacklist::BlacklistRegistry,
    transaction::Transaction,
    types::AccountId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id:             AccountId,
    #[serde(default)]
    pub in_degree:      u32,
    #[serde(default)]
    pub out_degree:     u32,
    #[serde(default)]
    pub is_blacklisted: bool,
}

impl Node {
    fn new(id: AccountId) -> Self {
        Self { id, in_degree: 0, out_degree: 0, is_blacklisted: false }
    }
}

/// One edge per transaction. Parallel edges are kept, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: AccountId,
    pub target: AccountId,
    #[serde(default)]
    pub value:  f64,
}

/// The renderer consumes `{nodes, links}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<Node>,
    #[serde(rename = "links")]
    pub edges: Vec<Edge>,
}

impl GraphModel {
    /// Rebuild from history and registry in a single pass.
    /// Node order is first-seen order; consumers must not rely on it.
    pub fn rebuild<'a, I>(history: I, registry: &BlacklistRegistry) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index: HashMap<AccountId, usize> = HashMap::new();
        let mut edges = Vec::new();

        for tx in history {
            let s = node_slot(&mut nodes, &mut index, &tx.sender);
            nodes[s].out_degree += 1;
            let r = node_slot(&mut nodes, &mut index, &tx.receiver);
            nodes[r].in_degree += 1;

            edges.push(Edge {
                source: tx.sender.clone(),
                target: tx.receiver.clone(),
                value:  tx.amount,
            });
        }

        for node in &mut nodes {
            node.is_blacklisted = registry.contains(&node.id);
        }

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn fraud_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_blacklisted).count()
    }

    pub fn safe_node_count(&self) -> usize {
        self.nodes.len() - self.fraud_node_count()
    }

    /// An edge is drawn hot when either endpoint is blacklisted.
    pub fn is_hot_edge(&self, edge: &Edge) -> bool {
        [&edge.source, &edge.target]
            .into_iter()
            .any(|id| self.node(id).is_some_and(|n| n.is_blacklisted))
    }
}

fn node_slot(nodes: &mut Vec<Node>, index: &mut HashMap<AccountId, usize>, id: &AccountId) -> usize {
    *index.entry(id.clone()).or_insert_with(|| {
        nodes.push(Node::new(id.clone()));
        nodes.len() - 1
    })
}
