use crate::core::selection::{self, SortOption};
use crate::domain::model::{GoalTag, Tutor};
use crate::domain::ports::Storage;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::validate_range;
use std::collections::{HashMap, HashSet};

/// The loaded tutor list, in stored order, with an id index.
#[derive(Debug, Clone)]
pub struct Catalog {
    tutors: Vec<Tutor>,
    by_id: HashMap<u32, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting data that breaks the tutor invariants.
    pub fn new(tutors: Vec<Tutor>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(tutors.len());

        for (position, tutor) in tutors.iter().enumerate() {
            check_tutor(tutor)?;
            if by_id.insert(tutor.id, position).is_some() {
                return Err(unavailable(format!("duplicate tutor id {}", tutor.id)));
            }
        }

        Ok(Self { tutors, by_id })
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let tutors: Vec<Tutor> = serde_json::from_slice(data)
            .map_err(|e| unavailable(format!("malformed tutor data: {}", e)))?;
        Self::new(tutors)
    }

    pub fn tutors(&self) -> &[Tutor] {
        &self.tutors
    }

    pub fn len(&self) -> usize {
        self.tutors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tutors.is_empty()
    }

    pub fn lookup_by_id(&self, id: u32) -> Option<&Tutor> {
        self.by_id.get(&id).map(|&position| &self.tutors[position])
    }

    pub fn require(&self, id: u32) -> Result<&Tutor> {
        self.lookup_by_id(id)
            .ok_or_else(|| BookingError::not_found("tutor", id))
    }
}

fn unavailable(reason: String) -> BookingError {
    BookingError::CatalogUnavailable { reason }
}

fn check_tutor(tutor: &Tutor) -> Result<()> {
    let id = tutor.id;
    if id == 0 {
        return Err(unavailable("tutor id must be positive".to_string()));
    }
    validate_range("rating", tutor.rating, 0.0, 5.0)
        .map_err(|e| unavailable(format!("tutor {}: {}", id, e)))?;
    if tutor.price == 0 {
        return Err(unavailable(format!("tutor {} has no price", id)));
    }
    if tutor.goals.is_empty() {
        return Err(unavailable(format!("tutor {} has no goals", id)));
    }
    if tutor.goals.iter().collect::<HashSet<_>>().len() != tutor.goals.len() {
        return Err(unavailable(format!("tutor {} lists a goal twice", id)));
    }
    if let Some((day, _)) = tutor.free.iter().find(|(_, slots)| slots.is_empty()) {
        return Err(unavailable(format!(
            "tutor {} has an empty slot list for {}",
            id, day
        )));
    }
    Ok(())
}

#[derive(Debug)]
enum CatalogState {
    Loaded(Catalog),
    Unavailable { reason: String },
}

/// Owns the catalog for the lifetime of the process.
///
/// Built once at startup with [`CatalogStore::load`] and shared behind an
/// `Arc`. Loading never fails outright: a missing or broken tutor file leaves
/// the store `Unavailable`, and every read then returns
/// [`BookingError::CatalogUnavailable`] so callers can answer with a service
/// error instead of crashing.
#[derive(Debug)]
pub struct CatalogStore {
    state: CatalogState,
}

impl CatalogStore {
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Self {
        match Self::read_catalog(storage, path).await {
            Ok(catalog) => {
                tracing::info!("Loaded {} tutors from {}", catalog.len(), path);
                Self::from_catalog(catalog)
            }
            Err(e) => {
                let reason = match e {
                    BookingError::CatalogUnavailable { reason } => reason,
                    other => other.to_string(),
                };
                tracing::error!("Tutor catalog unavailable ({}): {}", path, reason);
                Self::unavailable(reason)
            }
        }
    }

    async fn read_catalog<S: Storage>(storage: &S, path: &str) -> Result<Catalog> {
        if !storage.exists(path).await? {
            return Err(unavailable(format!("{} not found", path)));
        }
        let data = storage.read_file(path).await?;
        Catalog::from_json(&data)
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            state: CatalogState::Loaded(catalog),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: CatalogState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, CatalogState::Loaded(_))
    }

    pub fn catalog(&self) -> Result<&Catalog> {
        match &self.state {
            CatalogState::Loaded(catalog) => Ok(catalog),
            CatalogState::Unavailable { reason } => Err(unavailable(reason.clone())),
        }
    }

    pub fn list_all(&self) -> Result<&[Tutor]> {
        Ok(self.catalog()?.tutors())
    }

    /// `Ok(None)` means no such tutor; `Err` means the catalog itself is down.
    pub fn lookup_by_id(&self, id: u32) -> Result<Option<&Tutor>> {
        Ok(self.catalog()?.lookup_by_id(id))
    }

    pub fn sample(&self, n: usize) -> Result<Vec<&Tutor>> {
        let catalog = self.catalog()?;
        Ok(selection::sample(catalog.tutors(), n, &mut rand::thread_rng()))
    }

    pub fn by_goal(&self, goal: GoalTag) -> Result<Vec<&Tutor>> {
        Ok(selection::by_goal(self.catalog()?.tutors(), goal))
    }

    /// Goal pages use 1-based indexes; anything outside 1..=5 is `NotFound`.
    pub fn by_goal_index(&self, index: usize) -> Result<(GoalTag, Vec<&Tutor>)> {
        let catalog = self.catalog()?;
        let goal = GoalTag::from_index(index).ok_or_else(|| BookingError::not_found("goal", index))?;
        Ok((goal, selection::by_goal(catalog.tutors(), goal)))
    }

    pub fn sort_by(&self, option: SortOption) -> Result<Vec<&Tutor>> {
        let catalog = self.catalog()?;
        Ok(selection::sort_by(
            catalog.tutors(),
            option,
            &mut rand::thread_rng(),
        ))
    }

    /// Parses the raw select-box value first; unknown values are rejected.
    /// The parsed option comes back with the list so the page can show which
    /// ordering is selected.
    pub fn sort_by_key(&self, key: &str) -> Result<(SortOption, Vec<&Tutor>)> {
        let option: SortOption = key.parse()?;
        Ok((option, self.sort_by(option)?))
    }
}
