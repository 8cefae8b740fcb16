//! Dependency graph and execution order.
//!
//! The graph is built once from the static wiring table. Only CURRENT edges
//! constrain the order within a year; LAGGED edges read the previous sealed
//! snapshot and may therefore close cycles.

use digisim_kernel::{ConfigError, DependencyEdge, DependencyKind, ModuleId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Validated dependency table over a fixed set of modules.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Module ids in registration order (ties in the sort follow it)
    modules: Vec<ModuleId>,

    /// Registration index per id
    index: HashMap<ModuleId, usize>,

    /// All declared edges
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Builds the graph, rejecting duplicate modules, unknown endpoints,
    /// repeated edges and LAGGED edges without a rationale.
    pub fn new(modules: Vec<ModuleId>, edges: Vec<DependencyEdge>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(modules.len());
        for (i, id) in modules.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateModule(id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for edge in &edges {
            for endpoint in [&edge.consumer, &edge.producer] {
                if !index.contains_key(endpoint) {
                    return Err(ConfigError::UnknownModule(endpoint.to_string()));
                }
            }
            if !seen.insert((&edge.consumer, &edge.producer)) {
                return Err(ConfigError::DuplicateDependency {
                    consumer: edge.consumer.clone(),
                    producer: edge.producer.clone(),
                });
            }
            if edge.kind == DependencyKind::Lagged && edge.rationale.trim().is_empty() {
                return Err(ConfigError::UndocumentedLag {
                    consumer: edge.consumer.clone(),
                    producer: edge.producer.clone(),
                });
            }
        }

        Ok(Self {
            modules,
            index,
            edges,
        })
    }

    /// Registered module ids.
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// All declared edges.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Edges whose consumer is `module`, in declaration order.
    pub fn dependencies_of<'a>(&'a self, module: &'a ModuleId) -> impl Iterator<Item = &'a DependencyEdge> + 'a {
        self.edges.iter().filter(move |e| &e.consumer == module)
    }

    /// Topological order over CURRENT edges (Kahn's algorithm).
    ///
    /// Among the modules ready at any point, the earliest registered runs
    /// first, so the order is fully deterministic.
    pub fn execution_order(&self) -> Result<Vec<ModuleId>, ConfigError> {
        let n = self.modules.len();
        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in self.edges.iter().filter(|e| e.kind == DependencyKind::Current) {
            let consumer = self.index[&edge.consumer];
            let producer = self.index[&edge.producer];
            in_degree[consumer] += 1;
            dependents[producer].push(consumer);
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(next) = ready.pop_first() {
            order.push(self.modules[next].clone());
            for &dependent in &dependents[next] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != n {
            let involved = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.modules[i].clone())
                .collect();
            return Err(ConfigError::CyclicDependency { involved });
        }

        Ok(order)
    }
}
