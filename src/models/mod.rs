use serde::{Deserialize, Serialize};

/// A labeled category attachable to notes and to user interest profiles.
///
/// Ids are strings client-side; the wire carries numeric ids and the API
/// layer converts at the boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Tag {
    pub id: String,
    pub label: String,
}

/// A note as held in the store: tag references only. Tag objects are
/// resolved against the global catalog at render time, never stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    pub markdown: String,
    pub username: String,
    pub tag_ids: Vec<String>,
}

/// A note annotated with its resolved tag objects (derived view).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteView {
    pub id: String,
    pub title: String,
    pub markdown: String,
    pub username: String,
    pub tags: Vec<Tag>,
}

/// The application's own user record, distinct from the external identity
/// record, linked by a one-time lookup keyed on the external id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DbUser {
    pub id: i64,
    #[serde(default)]
    pub email: String,
}

/// Local-user resolution result, decided at the network boundary.
///
/// `Unresolved` covers both "lookup not attempted yet" and "lookup failed";
/// either way the onboarding screen is what renders.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum LocalUser {
    #[default]
    Unresolved,
    Resolved(DbUser),
}

impl LocalUser {
    pub fn resolved(&self) -> Option<&DbUser> {
        match self {
            LocalUser::Resolved(u) => Some(u),
            LocalUser::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_user_contract_deserialize() {
        // Contract: GET /users/by-supabase/{uuid}
        let json = r#"{"id": 12, "email": "u@example.com"}"#;
        let parsed: DbUser = serde_json::from_str(json).expect("db user should parse");
        assert_eq!(parsed.id, 12);
        assert_eq!(parsed.email, "u@example.com");
    }

    #[test]
    fn local_user_defaults_to_unresolved() {
        let u = LocalUser::default();
        assert!(!u.is_resolved());
        assert!(u.resolved().is_none());
    }
}
