use crate::api::ApiErrorKind;
use crate::auth::AuthClient;
use crate::state::AppContext;
use crate::storage::SESSION_KEY;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};

/// Scoped handle for the session-change subscription. Must be disposed on
/// every unmount path of the component tree that started it.
pub(crate) struct SessionSubscription {
    handle: Option<WindowListenerHandle>,
}

impl SessionSubscription {
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.remove();
        }
    }
}

/// Establish the identity signal: one initial session check, then a push
/// subscription for session-change events (login, logout, token refresh —
/// surfaced as `storage` events on the session key, so changes made in
/// another tab propagate too).
///
/// The initial check has no retry policy; any failure leaves the identity
/// `None`, which the gate treats as logged out.
pub(crate) fn start_session_watcher(app_state: AppContext) -> SessionSubscription {
    let state = app_state.clone();
    spawn_local(async move {
        match AuthClient::load_session() {
            None => {
                state.0.identity.set(None);
            }
            Some(session) => {
                let auth = state.0.auth.get_value();
                match auth.fetch_user(&session.access_token).await {
                    Ok(user) => state.0.identity.set(Some(user)),
                    Err(e) if e.kind == ApiErrorKind::Unauthorized => {
                        // Expired session: drop credentials and force
                        // re-auth instead of limping along.
                        leptos::logging::warn!("session expired, signing out");
                        AuthClient::clear_session();
                        state.0.clear_user_state();
                    }
                    Err(e) => {
                        leptos::logging::error!("session check failed: {e}");
                        state.0.identity.set(None);
                    }
                }
            }
        }
        state.0.session_checked.set(true);
    });

    let state = app_state;
    let handle = window_event_listener(ev::storage, move |ev: web_sys::StorageEvent| {
        if ev.key().as_deref() != Some(SESSION_KEY) {
            return;
        }
        match AuthClient::load_session() {
            Some(session) => state.0.identity.set(Some(session.user)),
            None => state.0.clear_user_state(),
        }
    });

    SessionSubscription {
        handle: Some(handle),
    }
}
