//! Build phase tracking.
//!
//! Targets are registered into three ordered phases: `build`, `stage` and
//! `dist`. Each phase has an aggregate alias node whose members are every
//! target registered in that phase. A stage or dist target depends on the
//! previous phase's alias as a whole, never on individual targets, so all
//! staging waits on the complete build phase.
//!
//! Edges in the graph point from a dependency to its dependent.

use std::collections::HashMap;
use std::fmt;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed, Walker};
use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// A build phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Build,
  Stage,
  Dist,
}

impl Phase {
  pub const ALL: [Phase; 3] = [Phase::Build, Phase::Stage, Phase::Dist];

  /// Name of the phase's aggregate alias.
  pub fn alias(&self) -> &'static str {
    match self {
      Self::Build => "build",
      Self::Stage => "stage",
      Self::Dist => "dist",
    }
  }

  /// The phase whose alias this phase's targets depend on.
  pub fn previous(&self) -> Option<Phase> {
    match self {
      Self::Build => None,
      Self::Stage => Some(Self::Build),
      Self::Dist => Some(Self::Stage),
    }
  }

  fn index(&self) -> usize {
    match self {
      Self::Build => 0,
      Self::Stage => 1,
      Self::Dist => 2,
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.alias())
  }
}

/// Opaque handle to a build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Target(pub String);

impl Target {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// One target or an arbitrarily nested list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
  One(Target),
  Many(Vec<TargetSpec>),
}

impl TargetSpec {
  /// Flatten depth-first, preserving order.
  pub fn flatten(self) -> Vec<Target> {
    let mut out = Vec::new();
    self.flatten_into(&mut out);
    out
  }

  fn flatten_into(self, out: &mut Vec<Target>) {
    match self {
      Self::One(target) => out.push(target),
      Self::Many(specs) => {
        for spec in specs {
          spec.flatten_into(out);
        }
      }
    }
  }
}

impl From<Target> for TargetSpec {
  fn from(target: Target) -> Self {
    Self::One(target)
  }
}

impl From<&str> for TargetSpec {
  fn from(name: &str) -> Self {
    Self::One(Target::new(name))
  }
}

impl<T: Into<TargetSpec>> From<Vec<T>> for TargetSpec {
  fn from(items: Vec<T>) -> Self {
    Self::Many(items.into_iter().map(Into::into).collect())
  }
}

/// A node in the phase graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Node {
  Target(Target),
  Alias(Phase),
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Target(target) => write!(f, "{target}"),
      Self::Alias(phase) => write!(f, "alias:{phase}"),
    }
  }
}

/// Append-only registry of phase targets and their dependency graph.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
  phases: [Vec<Target>; 3],
  defaults: Vec<Target>,
  graph: DiGraph<Node, ()>,
  nodes: HashMap<Node, NodeIndex>,
}

impl Default for PhaseTracker {
  fn default() -> Self {
    Self::new()
  }
}

impl PhaseTracker {
  /// Create a tracker with the three aliases defined and empty.
  pub fn new() -> Self {
    let mut tracker = Self {
      phases: Default::default(),
      defaults: Vec::new(),
      graph: DiGraph::new(),
      nodes: HashMap::new(),
    };
    for phase in Phase::ALL {
      tracker.node(Node::Alias(phase));
    }
    tracker
  }

  fn node(&mut self, node: Node) -> NodeIndex {
    if let Some(&idx) = self.nodes.get(&node) {
      return idx;
    }
    let idx = self.graph.add_node(node.clone());
    self.nodes.insert(node, idx);
    idx
  }

  /// Register targets in a phase. Nested lists are flattened; an empty spec is a no-op.
  pub fn mark(&mut self, phase: Phase, spec: impl Into<TargetSpec>) {
    for target in spec.into().flatten() {
      self.mark_one(phase, target);
    }
  }

  fn mark_one(&mut self, phase: Phase, target: Target) {
    debug!(phase = %phase, target = %target, "registering target");

    if phase == Phase::Build {
      self.defaults.push(target.clone());
    }
    self.phases[phase.index()].push(target.clone());

    let target_idx = self.node(Node::Target(target));
    if let Some(previous) = phase.previous() {
      let previous_alias = self.node(Node::Alias(previous));
      self.graph.update_edge(previous_alias, target_idx, ());
    }

    self.refresh_alias(phase);
  }

  /// Point a phase's alias at its complete member list.
  fn refresh_alias(&mut self, phase: Phase) {
    let alias = self.node(Node::Alias(phase));
    let members: Vec<Target> = self.phases[phase.index()].clone();
    for member in members {
      let member_idx = self.node(Node::Target(member));
      self.graph.update_edge(member_idx, alias, ());
    }
  }

  pub fn mark_build(&mut self, spec: impl Into<TargetSpec>) {
    self.mark(Phase::Build, spec);
  }

  pub fn mark_stage(&mut self, spec: impl Into<TargetSpec>) {
    self.mark(Phase::Stage, spec);
  }

  pub fn mark_dist(&mut self, spec: impl Into<TargetSpec>) {
    self.mark(Phase::Dist, spec);
  }

  /// Targets registered in a phase, in registration order.
  pub fn targets(&self, phase: Phase) -> &[Target] {
    &self.phases[phase.index()]
  }

  /// Targets built when no phase is requested.
  pub fn defaults(&self) -> &[Target] {
    &self.defaults
  }

  /// Direct dependencies of a node.
  pub fn dependencies(&self, node: &Node) -> Vec<Node> {
    let Some(&idx) = self.nodes.get(node) else {
      return Vec::new();
    };
    let mut deps: Vec<Node> = self
      .graph
      .neighbors_directed(idx, Direction::Incoming)
      .map(|n| self.graph[n].clone())
      .collect();
    // petgraph yields neighbors newest-first
    deps.reverse();
    deps
  }

  /// True if `node` directly depends on `dependency`.
  pub fn depends_on(&self, node: &Node, dependency: &Node) -> bool {
    match (self.nodes.get(node), self.nodes.get(dependency)) {
      (Some(&n), Some(&d)) => self.graph.contains_edge(d, n),
      _ => false,
    }
  }

  /// Everything needed to reach a phase's alias, dependencies first.
  ///
  /// # Errors
  ///
  /// Returns `CycleDetected` if the graph is not acyclic, for example when
  /// a target is registered in both `build` and `stage`.
  pub fn closure(&self, phase: Phase) -> Result<Vec<Node>> {
    let order = toposort(&self.graph, None).map_err(|cycle| {
      let node = &self.graph[cycle.node_id()];
      ConfigError::CycleDetected(node.to_string())
    })?;

    let Some(&root) = self.nodes.get(&Node::Alias(phase)) else {
      return Ok(Vec::new());
    };
    let reversed = Reversed(&self.graph);
    let reachable: Vec<NodeIndex> = Dfs::new(reversed, root).iter(reversed).collect();

    Ok(
      order
        .into_iter()
        .filter(|idx| reachable.contains(idx))
        .map(|idx| self.graph[idx].clone())
        .collect(),
    )
  }
}
