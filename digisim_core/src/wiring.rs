//! Static dependency table between the twelve sub-models.
//!
//! CURRENT edges order the modules within a year. Every LAGGED edge carries
//! the reason the consumer reads last year's value instead.

use crate::ids::*;
use digisim_kernel::DependencyEdge;

/// Returns the full wiring, grouped by consumer in registration order.
pub fn dependency_table() -> Vec<DependencyEdge> {
    vec![
        DependencyEdge::current(INFRA, POLICY),
        DependencyEdge::lagged(SKILLS, ECONOMY, "labour demand shapes training capacity a year later"),
        DependencyEdge::lagged(SKILLS, INCLUSION, "literacy gains reach training programmes a year later"),
        DependencyEdge::lagged(SKILLS, SOCIETY, "adoption is only observed once society has run"),
        DependencyEdge::current(INCLUSION, INFRA),
        DependencyEdge::current(INCLUSION, SKILLS),
        DependencyEdge::current(INCLUSION, POLICY),
        DependencyEdge::current(CYBER, INFRA),
        DependencyEdge::current(CYBER, POLICY),
        DependencyEdge::lagged(CYBER, SOCIETY, "society reads trust from cyber, so adoption feeds back a year later"),
        DependencyEdge::current(SOCIETY, INFRA),
        DependencyEdge::current(SOCIETY, INCLUSION),
        DependencyEdge::current(SOCIETY, CYBER),
        DependencyEdge::current(INNOVATION, SKILLS),
        DependencyEdge::current(INNOVATION, POLICY),
        DependencyEdge::lagged(INNOVATION, ECONOMY, "growth conditions funding with a year's delay"),
        DependencyEdge::current(EMERGING, INFRA),
        DependencyEdge::current(EMERGING, SKILLS),
        DependencyEdge::current(EMERGING, INNOVATION),
        DependencyEdge::current(ECONOMY, INFRA),
        DependencyEdge::current(ECONOMY, SKILLS),
        DependencyEdge::current(ECONOMY, POLICY),
        DependencyEdge::current(SECTORAL, INFRA),
        DependencyEdge::current(SECTORAL, SKILLS),
        DependencyEdge::current(SECTORAL, ECONOMY),
        DependencyEdge::current(SECTORAL, EMERGING),
        DependencyEdge::current(GOV, INFRA),
        DependencyEdge::current(GOV, POLICY),
        DependencyEdge::current(INTEGRATION, INFRA),
        DependencyEdge::current(INTEGRATION, ECONOMY),
        DependencyEdge::current(INTEGRATION, POLICY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use digisim_kernel::DependencyKind;
    use std::collections::BTreeSet;

    #[test]
    fn test_every_lag_is_documented() {
        for edge in dependency_table() {
            if edge.kind == DependencyKind::Lagged {
                assert!(!edge.rationale.is_empty(), "{} <- {}", edge.consumer, edge.producer);
            }
        }
    }

    #[test]
    fn test_edges_are_unique_and_known() {
        let table = dependency_table();
        let pairs: BTreeSet<_> = table
            .iter()
            .map(|e| (e.consumer.as_str(), e.producer.as_str()))
            .collect();

        assert_eq!(pairs.len(), table.len());
        for (consumer, producer) in pairs {
            assert!(is_known(consumer) && is_known(producer));
            assert_ne!(consumer, producer);
        }
    }

    #[test]
    fn test_lagged_edges() {
        let lagged: Vec<_> = dependency_table()
            .into_iter()
            .filter(|e| e.kind == DependencyKind::Lagged)
            .map(|e| format!("{}<-{}", e.consumer, e.producer))
            .collect();

        assert_eq!(
            lagged,
            vec![
                "skills<-economy",
                "skills<-inclusion",
                "skills<-society",
                "cyber<-society",
                "innovation<-economy",
            ]
        );
    }
}
