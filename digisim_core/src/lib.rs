//! digisim Core - the twelve domain sub-models
//!
//! Each sub-model tracks one facet of a national digital-transformation
//! trajectory and advances one year per `step`:
//!
//! | id            | facet                                 |
//! |---------------|---------------------------------------|
//! | `policy`      | legal frameworks, scenario levers     |
//! | `infra`       | connectivity and bandwidth            |
//! | `skills`      | literacy, ICT talent                  |
//! | `inclusion`   | equitable access                      |
//! | `cyber`       | threats, protection, trust            |
//! | `society`     | adoption and online culture           |
//! | `innovation`  | startups, VC, R&D                     |
//! | `emerging`    | AI, IoT, blockchain                   |
//! | `economy`     | growth, digital share                 |
//! | `sectoral`    | vertical digitalization               |
//! | `gov`         | e-services, digital ID, open data     |
//! | `integration` | exports, connectivity, digital trade  |
//!
//! The formulas are deliberately thin. What matters to the engine is the
//! uniform [`SimModule`](digisim_kernel::SimModule) interface, the declared
//! schemas, and the static [`wiring::dependency_table`].

pub mod ids;
pub mod params;
pub mod registry;
pub mod scenario;
pub mod shocks;
pub mod wiring;

pub mod cybersecurity;
pub mod digital_economy;
pub mod digital_government;
pub mod digital_inclusion;
pub mod digital_infrastructure;
pub mod digital_policy;
pub mod digital_skills;
pub mod digital_society;
pub mod emerging_technology;
pub mod innovation_ecosystem;
pub mod international_integration;
pub mod sectoral_transformation;

// Re-export key types for convenience
pub use registry::build_modules;
pub use scenario::{BuiltinScenario, Scenario, ScenarioCatalog};
pub use shocks::ShockSource;
pub use wiring::dependency_table;
