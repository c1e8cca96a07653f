use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A recorded yes/no outcome that may also be missing from the record.
///
/// On the wire this is a nullable boolean: `true`, `false`, or `null`/absent.
/// Keeping the third state explicit stops "not recorded" from being rendered
/// as "no".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unrecorded,
}

impl TriState {
    pub fn label<'a>(self, yes: &'a str, no: &'a str, unrecorded: &'a str) -> &'a str {
        match self {
            TriState::Yes => yes,
            TriState::No => no,
            TriState::Unrecorded => unrecorded,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
            None => TriState::Unrecorded,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unrecorded => None,
        }
    }
}

impl Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label("yes", "no", "unrecorded"))
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Option::<bool>::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriState::from)
    }
}
