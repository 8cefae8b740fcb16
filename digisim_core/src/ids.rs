//! Module identifiers (and snapshot namespaces) of the twelve sub-models.

use digisim_kernel::ModuleId;

pub const POLICY: ModuleId = ModuleId::from_static("policy");
pub const INFRA: ModuleId = ModuleId::from_static("infra");
pub const SKILLS: ModuleId = ModuleId::from_static("skills");
pub const INCLUSION: ModuleId = ModuleId::from_static("inclusion");
pub const CYBER: ModuleId = ModuleId::from_static("cyber");
pub const SOCIETY: ModuleId = ModuleId::from_static("society");
pub const INNOVATION: ModuleId = ModuleId::from_static("innovation");
pub const EMERGING: ModuleId = ModuleId::from_static("emerging");
pub const ECONOMY: ModuleId = ModuleId::from_static("economy");
pub const SECTORAL: ModuleId = ModuleId::from_static("sectoral");
pub const GOV: ModuleId = ModuleId::from_static("gov");
pub const INTEGRATION: ModuleId = ModuleId::from_static("integration");

/// All module ids in registration order.
///
/// Registration order breaks ties in the topological sort.
pub const ALL: [ModuleId; 12] = [
    POLICY,
    INFRA,
    SKILLS,
    INCLUSION,
    CYBER,
    SOCIETY,
    INNOVATION,
    EMERGING,
    ECONOMY,
    SECTORAL,
    GOV,
    INTEGRATION,
];

/// Returns true if `id` names one of the twelve sub-models.
pub fn is_known(id: &str) -> bool {
    ALL.iter().any(|m| m.as_str() == id)
}
