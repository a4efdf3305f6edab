use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Partial-update value for a single Hanke field.
///
/// A field missing from the payload deserializes to `Omitted` (keep the stored
/// value), an explicit `null` to `Clear`, and anything else to `Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Omitted,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Omitted
    }
}

impl<T> Patch<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Patch::Omitted)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Omitted | Patch::Clear => None,
        }
    }

    /// Writes the patch into `target`, converting provided values with `convert`.
    pub fn apply_with<U, F>(&self, target: &mut Option<U>, convert: F)
    where
        F: FnOnce(&T) -> U,
    {
        match self {
            Patch::Omitted => {}
            Patch::Clear => *target = None,
            Patch::Set(value) => *target = Some(convert(value)),
        }
    }
}

impl<T: Clone> Patch<T> {
    pub fn apply_to(&self, target: &mut Option<T>) {
        self.apply_with(target, T::clone);
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Omitted | Patch::Clear => serializer.serialize_none(),
        }
    }
}
