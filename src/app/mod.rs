use crate::auth::watcher::start_session_watcher;
use crate::models::LocalUser;
use crate::pages::{
    EditPitchPage, InterestSelectionPage, LoginPage, NewPitchPage, OAuthCallbackPage,
    PitchListPage, PitchPage, RedirectHome, RootGate,
};
use crate::state::{AppContext, AppState};
use crate::store::CollectionsAction;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppContext(AppState::new());
    provide_context(app_state);

    // Session watcher: one initial check plus a change subscription whose
    // handle is released with this component.
    let mut subscription = start_session_watcher(app_state);
    on_cleanup(move || subscription.dispose());

    // Global tag catalog.
    Effect::new(move |_| {
        spawn_local(async move {
            match app_state.0.api.get_value().get_tags().await {
                Ok(tags) => app_state.0.dispatch(CollectionsAction::TagsLoaded(tags)),
                Err(e) => leptos::logging::error!("tag catalog fetch failed: {e}"),
            }
        });
    });

    // Identity -> local user record, one lookup, no retry. A failed lookup
    // leaves the user on onboarding.
    Effect::new(move |_| {
        let Some(identity) = app_state.0.identity.get() else {
            app_state.0.local_user.set(LocalUser::Unresolved);
            return;
        };
        let external_id = identity.id.clone();
        spawn_local(async move {
            match app_state
                .0
                .api
                .get_value()
                .get_user_by_external_id(&external_id)
                .await
            {
                Ok(user) => app_state.0.local_user.set(LocalUser::Resolved(user)),
                Err(e) => leptos::logging::error!("local user lookup failed: {e}"),
            }
        });
    });

    // Local user -> interest tag ids.
    Effect::new(move |_| {
        let LocalUser::Resolved(user) = app_state.0.local_user.get() else {
            return;
        };
        spawn_local(async move {
            match app_state.0.api.get_value().get_user_tags(user.id).await {
                Ok(tags) => app_state.0.dispatch(CollectionsAction::InterestsLoaded(
                    tags.into_iter().map(|t| t.id).collect(),
                )),
                Err(e) => leptos::logging::error!("interest tags fetch failed: {e}"),
            }
        });
    });

    // Interest set -> filtered notes, re-fetched whenever the set changes.
    // An empty set clears the list without issuing a request ("no interests
    // yet" shows nothing — unlike the view-level filters, where empty means
    // show all).
    let interest_ids = Memo::new(move |_| {
        app_state
            .0
            .collections
            .with(|c| c.interest_tag_ids.clone())
    });
    let local_user_resolved = Memo::new(move |_| app_state.0.local_user.with(|u| u.is_resolved()));
    Effect::new(move |_| {
        let ids = interest_ids.get();
        if !local_user_resolved.get() || ids.is_empty() {
            app_state.0.dispatch(CollectionsAction::NotesCleared);
            app_state.0.notes_loading.set(false);
            return;
        }

        app_state.0.notes_loading.set(true);
        spawn_local(async move {
            // Overlapping fetches are not sequenced or cancelled; the last
            // response to resolve wins.
            match app_state.0.api.get_value().get_notes_by_tags(&ids).await {
                Ok(notes) => app_state.0.dispatch(CollectionsAction::NotesLoaded(notes)),
                Err(e) => {
                    leptos::logging::error!("filtered notes fetch failed: {e}");
                    app_state.0.dispatch(CollectionsAction::NotesCleared);
                }
            }
            app_state.0.notes_loading.set(false);
        });
    });

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <RedirectHome /> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("oauth-callback") view=OAuthCallbackPage />
                <Route path=path!("interests") view=move || view! {
                    <RootGate>
                        <InterestSelectionPage />
                    </RootGate>
                } />
                <Route path=path!("new") view=move || view! {
                    <RootGate>
                        <NewPitchPage />
                    </RootGate>
                } />
                <Route path=path!(":id/edit") view=move || view! {
                    <RootGate>
                        <EditPitchPage />
                    </RootGate>
                } />
                <Route path=path!(":id") view=move || view! {
                    <RootGate>
                        <PitchPage />
                    </RootGate>
                } />
                <Route path=path!("") view=move || view! {
                    <RootGate>
                        <PitchListPage />
                    </RootGate>
                } />
            </Routes>
        </Router>
    }
}
