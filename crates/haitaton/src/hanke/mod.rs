//! Hanke aggregate: domain model, contact reconciliation, persistence seam, and
//! the service facade used by the HTTP layer.

pub mod contact;
pub mod domain;
pub mod memory;
pub mod patch;
pub mod reconcile;
pub mod repository;
pub mod router;
pub mod service;
pub mod tunnus;

#[cfg(test)]
mod tests;

pub use contact::{ContactDetails, ContactEntry, ContactId, ContactInput, ContactRole};
pub use domain::{
    Actor, Hanke, HankeFields, HankeId, HankeInput, HankeSearch, HankeStateFlags, HankeTunnus,
    LaneDisruption, NuisanceLevel, Phase, PlanningPhase, SaveType, WorkSiteSize, WorkSiteType,
};
pub use memory::InMemoryHankeRepository;
pub use patch::Patch;
pub use reconcile::{prepare_creation, reconcile, ReconcileError};
pub use repository::{
    ContactMutation, ContactUpdate, HankeChangeSet, HankeRecord, HankeRepository, NewContact,
    PersistedContact, PersistedHanke, RepositoryError, StateInconsistency,
};
pub use router::{actor_from_headers, hanke_router, ACTOR_HEADER};
pub use service::{HankeService, HankeServiceError};
pub use tunnus::{SequenceTunnusGenerator, TunnusGenerator, DEFAULT_TUNNUS_PREFIX};
