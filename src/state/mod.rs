use crate::api::ApiClient;
use crate::auth::{AuthClient, Identity};
use crate::models::LocalUser;
use crate::state::gate::{access_gate, AccessGate};
use crate::store::{reduce, CollectionsAction, CollectionsState};
use leptos::prelude::*;

pub(crate) mod gate;

// Copy: every field is an arena handle, so the whole state is cheap to
// capture in as many closures as the pages need.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api: StoredValue<ApiClient>,
    pub auth: StoredValue<AuthClient>,

    /// True once the initial session check has settled (either way).
    pub session_checked: RwSignal<bool>,
    pub identity: RwSignal<Option<Identity>>,
    pub local_user: RwSignal<LocalUser>,

    /// Note/tag/interest collections; written only through [`dispatch`].
    ///
    /// [`dispatch`]: AppState::dispatch
    pub collections: RwSignal<CollectionsState>,
    pub notes_loading: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api: StoredValue::new(ApiClient::from_env()),
            auth: StoredValue::new(AuthClient::from_env()),
            session_checked: RwSignal::new(false),
            identity: RwSignal::new(None),
            local_user: RwSignal::new(LocalUser::Unresolved),
            collections: RwSignal::new(CollectionsState::default()),
            notes_loading: RwSignal::new(false),
        }
    }

    /// Apply a pure reducer transition to the collections.
    pub fn dispatch(&self, action: CollectionsAction) {
        self.collections.update(|state| {
            let prev = std::mem::take(state);
            *state = reduce(prev, action);
        });
    }

    /// Current gate tier; reactive when read inside a tracking context.
    pub fn gate(&self) -> AccessGate {
        let interest_count = self
            .collections
            .with(|c| c.interest_tag_ids.len());
        self.local_user.with(|local_user| {
            access_gate(
                self.session_checked.get(),
                self.identity.with(|id| id.is_some()),
                local_user,
                interest_count,
            )
        })
    }

    /// Drop everything scoped to the signed-in user. Runs on sign-out and
    /// on forced re-auth.
    pub fn clear_user_state(&self) {
        self.identity.set(None);
        self.local_user.set(LocalUser::Unresolved);
        self.dispatch(CollectionsAction::InterestsLoaded(vec![]));
        self.dispatch(CollectionsAction::NotesCleared);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
