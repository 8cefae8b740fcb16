//! The year loop.
//!
//! For every year of the horizon the orchestrator runs each module once, in
//! topological order, resolving its inputs through the lag policy:
//!
//! - CURRENT dependency: the producer's output from this year
//! - LAGGED dependency: the producer's output from the previous sealed
//!   snapshot, or an empty mapping in the start year
//!
//! The year's outputs are then namespaced, sealed into a [`YearSnapshot`]
//! and appended to the [`ResultsHistory`]. Runs are single-threaded and
//! fully deterministic.

use crate::config::{Horizon, SimConfig};
use crate::graph::DependencyGraph;
use crate::loader::DataLoader;
use crate::results::{ResultsHistory, YearSnapshot};
use digisim_core::{build_modules, dependency_table};
use digisim_kernel::{
    namespaced_key, ConfigError, DependencyEdge, DependencyKind, Diagnostic, DiagnosticLog,
    DiagnosticSink, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, Resolution, SimError,
    SimModule,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A module together with everything the loop needs to step it.
struct Slot {
    id: ModuleId,
    schema: MetricSchema,
    dependencies: Vec<DependencyEdge>,
    module: Box<dyn SimModule>,
}

/// A configured simulation run.
pub struct Simulation {
    /// Inclusive range of years
    horizon: Horizon,

    /// Run label (scenario name)
    label: String,

    /// Modules in execution order
    slots: Vec<Slot>,

    /// Sealed years so far
    history: ResultsHistory,

    /// Recorded diagnostics
    diagnostics: DiagnosticLog,

    /// Additional diagnostic receiver
    sink: Option<Box<dyn DiagnosticSink + Send>>,

    /// Cooperative cancellation, checked between years
    cancel: Option<Arc<AtomicBool>>,

    /// Next year to simulate; `None` once the last representable year is sealed
    next_year: Option<i32>,
}

impl Simulation {
    /// Builds the full twelve-module simulation from configuration.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let horizon = config.horizon()?;
        let scenario = config.selected_scenario()?;
        let params = DataLoader::new(&config.historical, horizon.start_year).merge(&config.modules)?;
        let modules = build_modules(&scenario, &params, config.seed)?;

        info!(
            "Simulation '{}' over {} ({} years, seed={})",
            scenario.name(),
            horizon,
            horizon.num_years(),
            config.seed
        );
        Self::from_parts(horizon, scenario.name(), modules, dependency_table())
    }

    /// Assembles a simulation from arbitrary modules and wiring.
    ///
    /// Fails if the wiring is invalid, the CURRENT subgraph has a cycle, a
    /// schema is malformed or two modules would produce the same snapshot
    /// key. No year is run in that case.
    pub fn from_parts(
        horizon: Horizon,
        label: impl Into<String>,
        modules: Vec<Box<dyn SimModule>>,
        edges: Vec<DependencyEdge>,
    ) -> Result<Self, ConfigError> {
        let ids: Vec<ModuleId> = modules.iter().map(|m| m.id()).collect();
        let graph = DependencyGraph::new(ids.clone(), edges)?;
        let order = graph.execution_order()?;

        let mut produced: BTreeMap<String, ModuleId> = BTreeMap::new();
        for module in &modules {
            let id = module.id();
            let schema = module.schema();
            schema.validate(&id)?;
            for metric in schema.names() {
                let key = namespaced_key(&id, metric);
                if let Some(first) = produced.get(&key) {
                    return Err(ConfigError::MetricKeyCollision {
                        key,
                        first: first.clone(),
                        second: id,
                    });
                }
                produced.insert(key, id.clone());
            }
        }

        let mut by_id: BTreeMap<ModuleId, Box<dyn SimModule>> = ids.into_iter().zip(modules).collect();
        let slots = order
            .iter()
            .filter_map(|id| {
                let module = by_id.remove(id)?;
                Some(Slot {
                    id: id.clone(),
                    schema: module.schema(),
                    dependencies: graph.dependencies_of(id).cloned().collect(),
                    module,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "Execution order: {}",
            slots.iter().map(|s| s.id.as_str()).collect::<Vec<_>>().join(" -> ")
        );

        Ok(Self {
            horizon,
            label: label.into(),
            slots,
            history: ResultsHistory::new(),
            diagnostics: DiagnosticLog::new(),
            sink: None,
            cancel: None,
            next_year: Some(horizon.start_year),
        })
    }

    /// Installs a cancellation flag checked between years.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Forwards every diagnostic to `sink` as well.
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Module ids in execution order.
    pub fn execution_order(&self) -> Vec<ModuleId> {
        self.slots.iter().map(|s| s.id.clone()).collect()
    }

    /// Sealed years so far.
    pub fn history(&self) -> &ResultsHistory {
        &self.history
    }

    /// Hands the history over to the caller.
    pub fn into_history(self) -> ResultsHistory {
        self.history
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Next year still to be simulated within the horizon.
    fn pending_year(&self) -> Option<i32> {
        self.next_year.filter(|&year| year <= self.horizon.end_year)
    }

    /// True once every year of the horizon has been sealed.
    pub fn is_finished(&self) -> bool {
        self.pending_year().is_none()
    }

    /// Runs all remaining years.
    ///
    /// A raised cancellation flag stops the loop between years with
    /// [`SimError::Cancelled`]; the years sealed so far stay available.
    pub fn run(&mut self) -> Result<&ResultsHistory, SimError> {
        while let Some(next_year) = self.pending_year() {
            if self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                warn!("Simulation '{}' cancelled before {}", self.label, next_year);
                return Err(SimError::Cancelled { next_year });
            }
            self.step_year()?;
        }

        info!(
            "Simulation '{}' finished: {} years sealed, {} diagnostics",
            self.label,
            self.history.len(),
            self.diagnostics.len()
        );
        Ok(&self.history)
    }

    /// Simulates and seals the next year. Returns `None` past the horizon.
    ///
    /// If a module breaks its schema the year is not sealed.
    pub fn step_year(&mut self) -> Result<Option<&YearSnapshot>, SimError> {
        let Some(year) = self.pending_year() else {
            return Ok(None);
        };
        let previous = self.history.last();
        let mut current: BTreeMap<ModuleId, ModuleOutput> = BTreeMap::new();
        let mut events = Vec::new();
        let mut violation = None;

        for slot in &mut self.slots {
            let output = {
                let mut inputs = ModuleInputs::new();
                for edge in &slot.dependencies {
                    let producer = edge.producer.clone();
                    match edge.kind {
                        DependencyKind::Current => {
                            if let Some(out) = current.get(&edge.producer) {
                                inputs.insert(producer, out, Resolution::Current);
                            }
                        }
                        DependencyKind::Lagged => match previous.and_then(|s| s.output(&edge.producer)) {
                            Some(out) => inputs.insert(producer, out, Resolution::Lagged),
                            None => inputs.insert_initial(producer),
                        },
                    }
                }

                let output = slot.module.step(year, &inputs);
                events.extend(inputs.take_missing().into_iter().map(|miss| Diagnostic::MissingInput {
                    year,
                    consumer: slot.id.clone(),
                    producer: miss.producer,
                    metric: miss.metric,
                    default: miss.default,
                    initial: miss.initial,
                }));
                output
            };

            if let Err(detail) = slot.schema.check(&output) {
                violation = Some(SimError::SchemaViolation {
                    module: slot.id.clone(),
                    year,
                    detail,
                });
                break;
            }
            current.insert(slot.id.clone(), output);
        }

        for event in events {
            self.record(event);
        }
        if let Some(err) = violation {
            return Err(err);
        }

        let snapshot = YearSnapshot::seal(year, current);
        debug!("Sealed {} ({} values)", year, snapshot.len());
        self.history.push(snapshot);
        self.next_year = year.checked_add(1);
        Ok(self.history.last())
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(diagnostic.clone());
        }
        self.diagnostics.record(diagnostic);
    }
}
