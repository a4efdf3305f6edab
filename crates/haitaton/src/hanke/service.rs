use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::domain::{Actor, Hanke, HankeInput, HankeSearch, HankeStateFlags, HankeTunnus};
use super::reconcile::{prepare_creation, reconcile, ReconcileError};
use super::repository::{HankeRepository, PersistedHanke, RepositoryError, StateInconsistency};
use super::tunnus::TunnusGenerator;

/// Service composing the Hanke repository, code generator, and reconciliation.
pub struct HankeService<R, G> {
    repository: Arc<R>,
    tunnus: Arc<G>,
}

impl<R, G> HankeService<R, G>
where
    R: HankeRepository + 'static,
    G: TunnusGenerator + 'static,
{
    pub fn new(repository: Arc<R>, tunnus: Arc<G>) -> Self {
        Self { repository, tunnus }
    }

    /// Lists Hanke records: all when the search is empty, by save type when
    /// one is given, otherwise those overlapping the requested period.
    pub fn load_all(&self, search: Option<&HankeSearch>) -> Result<Vec<Hanke>, HankeServiceError> {
        let stored = match search {
            None => self.repository.find_all()?,
            Some(search) if search.is_empty() => self.repository.find_all()?,
            Some(HankeSearch {
                save_type: Some(save_type),
                ..
            }) => self.repository.find_all_by_save_type(*save_type)?,
            Some(HankeSearch {
                period_begin: Some(begin),
                period_end: Some(end),
                ..
            }) => self.load_between(*begin, *end)?,
            Some(_) => {
                return Err(HankeServiceError::InvalidSearch(
                    "period search needs both period_begin and period_end",
                ))
            }
        };

        to_domain(stored)
    }

    fn load_between(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PersistedHanke>, HankeServiceError> {
        if end < begin {
            return Err(HankeServiceError::InvalidSearch(
                "period_end is before period_begin",
            ));
        }
        Ok(self.repository.find_all_between(begin, end)?)
    }

    pub fn load(&self, tunnus: &HankeTunnus) -> Result<Option<Hanke>, HankeServiceError> {
        match self.repository.find_by_tunnus(tunnus)? {
            Some(stored) => Ok(Some(stored.to_hanke()?)),
            None => Ok(None),
        }
    }

    /// Creates a Hanke under a freshly generated tunnus. Any tunnus or state
    /// flags in the payload are ignored.
    pub fn create(&self, input: HankeInput, actor: &Actor) -> Result<Hanke, HankeServiceError> {
        let tunnus = self.tunnus.next_tunnus();
        let changes = prepare_creation(&input, tunnus, actor, Utc::now())?;

        debug!(tunnus = %changes.record.tunnus, input = %input.log_summary(), "creating hanke");
        let stored = self.repository.save(changes)?;
        debug!(tunnus = %stored.record.tunnus, "created hanke");

        Ok(stored.to_hanke()?)
    }

    pub fn update(&self, input: HankeInput, actor: &Actor) -> Result<Hanke, HankeServiceError> {
        let tunnus = input.tunnus.clone().ok_or_else(|| {
            HankeServiceError::State(StateInconsistency(
                "update requested for hanke without tunnus".to_string(),
            ))
        })?;
        let existing = self
            .repository
            .find_by_tunnus(&tunnus)?
            .ok_or_else(|| HankeServiceError::NotFound(tunnus.clone()))?;

        let changes = reconcile(&input, &existing, actor, Utc::now())?;

        debug!(
            %tunnus,
            version = changes.record.version,
            mutations = changes.mutations.len(),
            input = %input.log_summary(),
            "saving hanke"
        );
        let stored = self.repository.save(changes)?;
        debug!(%tunnus, "saved hanke");

        Ok(stored.to_hanke()?)
    }

    /// Stores the three state flags without touching version or audit fields.
    pub fn update_state_flags(
        &self,
        tunnus: &HankeTunnus,
        flags: HankeStateFlags,
    ) -> Result<(), HankeServiceError> {
        if self.repository.find_by_tunnus(tunnus)?.is_none() {
            return Err(HankeServiceError::NotFound(tunnus.clone()));
        }
        self.repository.save_state_flags(tunnus, flags)?;
        Ok(())
    }
}

fn to_domain(stored: Vec<PersistedHanke>) -> Result<Vec<Hanke>, HankeServiceError> {
    stored
        .iter()
        .map(|hanke| hanke.to_hanke().map_err(HankeServiceError::from))
        .collect()
}

/// Error raised by the Hanke service.
#[derive(Debug, thiserror::Error)]
pub enum HankeServiceError {
    #[error("hanke {0} not found")]
    NotFound(HankeTunnus),
    #[error("invalid hanke search: {0}")]
    InvalidSearch(&'static str),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    State(#[from] StateInconsistency),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
