use crate::auth::AuthClient;
use crate::components::tag_select::TagMultiSelect;
use crate::components::ui::{
    Alert, AlertDescription, Badge, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Dialog, DialogDescription, DialogHeader, DialogTitle,
    Input, Label, Spinner, Textarea,
};
use crate::markdown::markdown_to_html;
use crate::models::{LocalUser, NoteView, Tag};
use crate::state::gate::{interests_satisfy_minimum, AccessGate, MIN_INTERESTS};
use crate::state::AppContext;
use crate::store::derive::{compose_note_views, notes_with_tags};
use crate::store::{swap_tmp_tag_id, CollectionsAction};
use crate::util::temp_tag_id;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params, use_query_map};
use leptos_router::params::Params;

#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="flex min-h-screen items-center justify-center gap-2 text-sm text-muted-foreground">
            <Spinner />
            "Loading user data..."
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let on_login = move |_| {
        let origin = window().location().origin().unwrap_or_default();
        let url = app_state
            .0
            .auth
            .get_value()
            .sign_in_url("github", &format!("{origin}/oauth-callback"));
        let _ = window().location().set_href(&url);
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Pitch Haven"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Welcome to Pitch Haven"</CardTitle>
                        <CardDescription class="text-xs">
                            "Log in with GitHub to continue."
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <Button class="w-full" on:click=on_login>"Log in with GitHub"</Button>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let query = use_query_map();
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let started = StoredValue::new(false);

    Effect::new(move |_| {
        if started.get_value() {
            return;
        }
        let code = query.get().get("code").unwrap_or_default();
        if code.trim().is_empty() {
            error.set(Some("Missing authorization code.".to_string()));
            return;
        }
        started.set_value(true);

        spawn_local(async move {
            match app_state.0.auth.get_value().exchange_code(&code).await {
                Ok(session) => {
                    app_state.0.identity.set(Some(session.user));
                    app_state.0.session_checked.set(true);
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    leptos::logging::error!("code exchange failed: {e}");
                    error.set(Some("Authentication failed. Try logging in again.".to_string()));
                }
            }
        });
    });

    view! {
        <div class="flex min-h-screen items-center justify-center px-4">
            {move || match error.get() {
                Some(msg) => view! {
                    <Alert class="max-w-sm border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">{msg}</AlertDescription>
                    </Alert>
                }
                .into_any(),
                None => view! {
                    <div class="flex items-center gap-2 text-sm text-muted-foreground">
                        <Spinner />
                        "Authenticating..."
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
pub fn InterestSelectionPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let interests: RwSignal<Vec<Tag>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let selected_ids: RwSignal<Vec<String>> = RwSignal::new(vec![]);
    let saving: RwSignal<bool> = RwSignal::new(false);

    // Full catalog for the checklist.
    Effect::new(move |_| {
        spawn_local(async move {
            match app_state.0.api.get_value().get_tags().await {
                Ok(tags) => interests.set(tags),
                Err(e) => leptos::logging::error!("interest catalog fetch failed: {e}"),
            }
            loading.set(false);
        });
    });

    // Pre-select the user's current set once the local user resolves.
    Effect::new(move |_| {
        let LocalUser::Resolved(user) = app_state.0.local_user.get() else {
            return;
        };
        spawn_local(async move {
            match app_state.0.api.get_value().get_user_tags(user.id).await {
                Ok(tags) => selected_ids.set(tags.into_iter().map(|t| t.id).collect()),
                Err(e) => leptos::logging::error!("user interests fetch failed: {e}"),
            }
        });
    });

    let toggle = move |id: String| {
        selected_ids.update(|ids| {
            if let Some(pos) = ids.iter().position(|x| x == &id) {
                ids.remove(pos);
            } else {
                ids.push(id);
            }
        });
    };

    let on_save = move |_| {
        let LocalUser::Resolved(user) = app_state.0.local_user.get_untracked() else {
            let _ = window().alert_with_message("You are not signed in yet.");
            return;
        };
        let ids = selected_ids.get_untracked();
        // Below the floor no request goes out; the button is disabled too.
        if !interests_satisfy_minimum(ids.len()) {
            return;
        }

        saving.set(true);
        spawn_local(async move {
            let api = app_state.0.api.get_value();
            match api.replace_user_tags(user.id, &ids).await {
                Ok(()) => {
                    // Re-fetch the confirmed set; reaching the floor is what
                    // flips the gate to Active.
                    match api.get_user_tags(user.id).await {
                        Ok(tags) => app_state.0.dispatch(CollectionsAction::InterestsLoaded(
                            tags.into_iter().map(|t| t.id).collect(),
                        )),
                        Err(e) => leptos::logging::error!("interest refetch failed: {e}"),
                    }
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    leptos::logging::error!("interest save failed: {e}");
                    let _ = window()
                        .alert_with_message("Failed to save interests. Please try again.");
                }
            }
            saving.set(false);
        });
    };

    view! {
        <div class="mx-auto w-full max-w-[720px] px-4 py-10">
            <h2 class="mb-2 text-center text-xl font-semibold">"Select your interests"</h2>
            <p class="mb-4 text-center text-sm text-muted-foreground">
                "Choose the topics that interest you the most. They personalize your pitch feed."
            </p>

            <Show when=move || selected_ids.get().len() < MIN_INTERESTS fallback=|| ().into_view()>
                <p class="mb-4 text-center text-sm text-destructive">
                    "Please select at least 3 interests to continue."
                </p>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=move || view! {
                    <div class="flex justify-center py-10"><Spinner /></div>
                }
            >
                <div class="grid grid-cols-2 gap-2 sm:grid-cols-3">
                    {move || {
                        interests
                            .get()
                            .into_iter()
                            .map(|tag| {
                                let id = tag.id.clone();
                                let id_for_change = tag.id.clone();
                                let input_id = format!("interest-{}", tag.id);
                                let input_id_for = input_id.clone();
                                view! {
                                    <div class="flex items-center gap-2 rounded-md border px-3 py-2">
                                        <input
                                            type="checkbox"
                                            id=input_id
                                            prop:checked=move || selected_ids.get().contains(&id)
                                            on:change=move |_| toggle(id_for_change.clone())
                                        />
                                        <Label html_for=input_id_for class="text-sm">
                                            {tag.label.clone()}
                                        </Label>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>

                <div class="mt-6 flex justify-center">
                    <Button
                        attr:disabled=move || {
                            !interests_satisfy_minimum(selected_ids.get().len()) || saving.get()
                        }
                        on:click=on_save
                    >
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || saving.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if saving.get() { "Saving..." } else { "Save & Continue" }}
                        </span>
                    </Button>
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn AppNavbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let username = move || {
        app_state
            .0
            .identity
            .get()
            .map(|i| i.username().to_string())
            .unwrap_or_default()
    };
    let avatar = move || {
        app_state
            .0
            .identity
            .get()
            .map(|i| i.avatar_url())
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        spawn_local(async move {
            let token = AuthClient::load_session()
                .map(|s| s.access_token)
                .unwrap_or_default();
            match app_state.0.auth.get_value().sign_out(&token).await {
                Ok(()) => {
                    app_state.0.clear_user_state();
                    let _ = window().location().set_href("/login");
                }
                Err(e) => leptos::logging::error!("sign-out failed: {e}"),
            }
        });
    };

    view! {
        <header class="sticky top-0 z-40 border-b bg-background">
            <div class="mx-auto flex w-full max-w-[1080px] items-center justify-between px-4 py-3">
                <a href="/" class="text-sm font-semibold text-foreground">
                    "Pitch " <span class="text-primary">"Haven"</span>
                </a>

                <nav class="flex items-center gap-3">
                    <a href="/new" class="text-sm text-muted-foreground hover:text-foreground">
                        "New pitch"
                    </a>
                    <a href="/interests" class="text-sm text-muted-foreground hover:text-foreground">
                        "Update interests"
                    </a>
                    <img class="size-8 rounded-full border" src=avatar alt=username />
                    <span class="text-sm text-muted-foreground">{username}</span>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_logout>
                        "Sign out"
                    </Button>
                </nav>
            </div>
        </header>
    }
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let children = StoredValue::new(children);

    view! {
        <div class="min-h-screen bg-background">
            <AppNavbar />
            <main class="mx-auto w-full max-w-[1080px] px-4 py-6">
                {move || children.with_value(|c| c())}
            </main>
        </div>
    }
}

/// Renders children only in the `Active` gate tier; the lower tiers map to
/// their own screens. Loss of identity lands back on the login screen.
#[component]
pub fn RootGate(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let children = StoredValue::new(children);

    view! {
        {move || match app_state.0.gate() {
            AccessGate::Loading => view! { <LoadingScreen /> }.into_any(),
            AccessGate::Anonymous => view! { <LoginPage /> }.into_any(),
            AccessGate::Onboarding => view! { <InterestSelectionPage /> }.into_any(),
            AccessGate::Active => view! {
                <AppLayout>{move || children.with_value(|c| c())}</AppLayout>
            }
            .into_any(),
        }}
    }
}

#[component]
fn PitchCard(view_data: NoteView) -> impl IntoView {
    let href = format!("/{}", view_data.id);

    view! {
        <a href=href class="block h-full text-inherit no-underline">
            <Card class="h-full transition-colors hover:bg-accent/50">
                <CardContent class="flex h-full flex-col items-center justify-center gap-2 text-center">
                    <span class="text-base font-medium">{view_data.title.clone()}</span>
                    {(!view_data.tags.is_empty()).then(|| view! {
                        <div class="flex flex-wrap justify-center gap-1">
                            {view_data
                                .tags
                                .clone()
                                .into_iter()
                                .map(|tag| view! { <Badge>{tag.label.clone()}</Badge> })
                                .collect_view()}
                        </div>
                    })}
                    <span class="text-xs text-muted-foreground">
                        {format!("by {}", view_data.username)}
                    </span>
                </CardContent>
            </Card>
        </a>
    }
}

#[component]
fn EditTagsDialog(open: RwSignal<bool>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let busy_tag_id: RwSignal<Option<String>> = RwSignal::new(None);

    // Commit-on-change rename, as in the tag editor modal this replaces.
    let rename = move |id: String, label: String| {
        if label.trim().is_empty() {
            return;
        }
        busy_tag_id.set(Some(id.clone()));
        spawn_local(async move {
            match app_state.0.api.get_value().rename_tag(&id, &label).await {
                Ok(tag) => app_state.0.dispatch(CollectionsAction::TagRenamed { tag }),
                Err(e) => leptos::logging::error!("rename tag failed: {e}"),
            }
            busy_tag_id.set(None);
        });
    };

    let remove = move |id: String| {
        busy_tag_id.set(Some(id.clone()));
        spawn_local(async move {
            match app_state.0.api.get_value().delete_tag(&id).await {
                Ok(()) => app_state.0.dispatch(CollectionsAction::TagDeleted { id }),
                Err(e) => leptos::logging::error!("delete tag failed: {e}"),
            }
            busy_tag_id.set(None);
        });
    };

    view! {
        <Dialog open=open>
            <DialogHeader>
                <DialogTitle>"Edit tags"</DialogTitle>
                <DialogDescription>
                    "Rename or remove catalog tags. Notes keep their references either way."
                </DialogDescription>
            </DialogHeader>

            <div class="flex max-h-[50vh] flex-col gap-2 overflow-auto">
                {move || {
                    app_state
                        .0
                        .collections
                        .with(|c| c.tags.clone())
                        .into_iter()
                        .map(|tag| {
                            let id_for_change = tag.id.clone();
                            let id_for_delete = tag.id.clone();
                            let id_for_input_busy = tag.id.clone();
                            let id_for_button_busy = tag.id.clone();
                            view! {
                                <div class="flex items-center gap-2">
                                    <input
                                        class="border-input h-8 w-full rounded-md border bg-transparent px-2 text-sm outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
                                        prop:value=tag.label.clone()
                                        disabled=move || {
                                            busy_tag_id.get().as_deref()
                                                == Some(id_for_input_busy.as_str())
                                        }
                                        on:change=move |ev| {
                                            rename(id_for_change.clone(), event_target_value(&ev))
                                        }
                                    />
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || {
                                            busy_tag_id.get().as_deref()
                                                == Some(id_for_button_busy.as_str())
                                        }
                                        on:click=move |_| remove(id_for_delete.clone())
                                    >
                                        "\u{00d7}"
                                    </Button>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </Dialog>
    }
}

#[component]
pub fn PitchListPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let title_filter: RwSignal<String> = RwSignal::new(String::new());
    let selected_filter: RwSignal<Vec<Tag>> = RwSignal::new(vec![]);
    let edit_tags_open: RwSignal<bool> = RwSignal::new(false);

    let catalog = Signal::derive(move || app_state.0.collections.with(|c| c.tags.clone()));

    let views = Memo::new(move |_| {
        let selected_ids: Vec<String> =
            selected_filter.get().iter().map(|t| t.id.clone()).collect();
        let title = title_filter.get();
        app_state.0.collections.with(|c| {
            compose_note_views(&c.notes, &c.tags, &title, &selected_ids, &c.interest_tag_ids)
        })
    });

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-xl font-semibold">"Pitches"</h1>
                <div class="flex items-center gap-2">
                    <a href="/new">
                        <Button size=ButtonSize::Sm>"Create"</Button>
                    </a>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| edit_tags_open.set(true)
                    >
                        "Edit tags"
                    </Button>
                </div>
            </div>

            <form
                class="grid gap-4 sm:grid-cols-2"
                on:submit=|ev: web_sys::SubmitEvent| ev.prevent_default()
            >
                <div class="flex flex-col gap-1.5">
                    <Label html_for="title-filter" class="text-xs">"Title"</Label>
                    <Input
                        id="title-filter"
                        bind_value=title_filter
                        placeholder="Filter by title"
                        class="h-8 text-sm"
                    />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="tag-filter" class="text-xs">"Tags"</Label>
                    <TagMultiSelect
                        id="tag-filter"
                        selected=selected_filter
                        options=catalog
                        placeholder="Filter by tags"
                    />
                </div>
            </form>

            <Show
                when=move || !app_state.0.notes_loading.get()
                fallback=move || view! {
                    <div class="flex items-center gap-2 py-8 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading recommended pitches..."
                    </div>
                }
            >
                <Show
                    when=move || !views.get().is_empty()
                    fallback=|| view! {
                        <div class="py-8 text-sm text-muted-foreground">
                            "No pitches match your filters."
                        </div>
                    }
                >
                    <div class="grid gap-3 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4">
                        {move || {
                            views
                                .get()
                                .into_iter()
                                .map(|v| view! { <PitchCard view_data=v /> })
                                .collect_view()
                        }}
                    </div>
                </Show>
            </Show>

            <EditTagsDialog open=edit_tags_open />
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct PitchRouteParams {
    pub id: Option<String>,
}

#[component]
pub fn PitchPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<PitchRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    // Closures so params access happens inside a reactive tracking context.
    let note_id = move || params.get().ok().and_then(|p| p.id).unwrap_or_default();

    let current = Memo::new(move |_| {
        let id = note_id();
        app_state.0.collections.with(|c| {
            notes_with_tags(&c.notes, &c.tags)
                .into_iter()
                .find(|v| v.id == id)
        })
    });

    let is_owner = move || {
        let owner = current.get().map(|v| v.username).unwrap_or_default();
        app_state
            .0
            .identity
            .get()
            .map(|i| i.username() == owner)
            .unwrap_or(false)
    };

    let on_delete = move |_| {
        let id = note_id();
        if id.trim().is_empty() {
            return;
        }
        spawn_local(async move {
            match app_state.0.api.get_value().delete_note(&id).await {
                Ok(()) => app_state.0.dispatch(CollectionsAction::NoteDeleted { id }),
                Err(e) => leptos::logging::error!("delete pitch failed: {e}"),
            }
        });
        // Back to the list without waiting for the response.
        navigate.with_value(|nav| nav("/", Default::default()));
    };

    view! {
        <div class="space-y-4">
            {move || match current.get() {
                Some(view_data) => {
                    let html = markdown_to_html(&view_data.markdown);
                    let edit_href = format!("/{}/edit", view_data.id);
                    view! {
                        <div class="flex items-start justify-between gap-4">
                            <div class="space-y-2">
                                <h1 class="text-2xl font-semibold">{view_data.title.clone()}</h1>
                                {(!view_data.tags.is_empty()).then(|| view! {
                                    <div class="flex flex-wrap gap-1">
                                        {view_data
                                            .tags
                                            .clone()
                                            .into_iter()
                                            .map(|tag| view! { <Badge>{tag.label.clone()}</Badge> })
                                            .collect_view()}
                                    </div>
                                })}
                                <div class="text-xs text-muted-foreground">
                                    {format!("by {}", view_data.username)}
                                </div>
                            </div>

                            <div class="flex items-center gap-2">
                                <Show when=is_owner fallback=|| ().into_view()>
                                    <a href=edit_href.clone()>
                                        <Button size=ButtonSize::Sm>"Edit"</Button>
                                    </a>
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Sm
                                        on:click=on_delete
                                    >
                                        "Delete"
                                    </Button>
                                </Show>
                                <a href="/">
                                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm>
                                        "Back"
                                    </Button>
                                </a>
                            </div>
                        </div>

                        <div class="markdown-body text-sm leading-relaxed" inner_html=html></div>
                    }
                    .into_any()
                }
                None => view! {
                    <div class="flex items-center justify-between">
                        <div class="text-sm text-muted-foreground">
                            {move || {
                                if app_state.0.notes_loading.get() {
                                    "Loading pitch..."
                                } else {
                                    "Pitch not found."
                                }
                            }}
                        </div>
                        <a href="/">
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm>"Back"</Button>
                        </a>
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn PitchForm(
    #[prop(into, optional)] initial_title: String,
    #[prop(into, optional)] initial_markdown: String,
    #[prop(optional)] initial_tags: Vec<Tag>,
    on_submit: Callback<(String, String, Vec<Tag>)>,
    #[prop(into, default = String::from("/"))] back_href: String,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let title_value: RwSignal<String> = RwSignal::new(initial_title);
    let markdown_value: RwSignal<String> = RwSignal::new(initial_markdown);
    let selected: RwSignal<Vec<Tag>> = RwSignal::new(initial_tags);

    let catalog = Signal::derive(move || app_state.0.collections.with(|c| c.tags.clone()));

    // Inline tag creation: display a temporary id immediately, swap it for
    // the server id when the response lands. A submit that races the
    // response still carries the temporary id (see DESIGN.md).
    let on_create = Callback::new(move |label: String| {
        let tmp = Tag {
            id: temp_tag_id(),
            label: label.clone(),
        };
        let tmp_id = tmp.id.clone();
        selected.update(|s| s.push(tmp));

        spawn_local(async move {
            match app_state.0.api.get_value().create_tag(&label).await {
                Ok(tag) => {
                    app_state
                        .0
                        .dispatch(CollectionsAction::TagCreated { tag: tag.clone() });
                    selected.update(|s| {
                        swap_tmp_tag_id(s, &tmp_id, &tag);
                    });
                }
                Err(e) => leptos::logging::error!("create tag failed: {e}"),
            }
        });
    });

    let navigate = StoredValue::new(use_navigate());
    let back_for_submit = back_href.clone();
    let handle_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run((
            title_value.get_untracked(),
            markdown_value.get_untracked(),
            selected.get_untracked(),
        ));
        // Leave right away; collections update when the response lands.
        navigate.with_value(|nav| nav(&back_for_submit, Default::default()));
    };

    view! {
        <form class="flex flex-col gap-4" on:submit=handle_submit>
            <div class="grid gap-4 sm:grid-cols-2">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="pitch-title" class="text-xs">"Title"</Label>
                    <Input id="pitch-title" bind_value=title_value required=true />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="pitch-tags" class="text-xs">"Tags"</Label>
                    <TagMultiSelect
                        id="pitch-tags"
                        selected=selected
                        options=catalog
                        on_create=on_create
                        placeholder="Select or create tags"
                    />
                </div>
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="pitch-body" class="text-xs">"Pitch"</Label>
                <Textarea id="pitch-body" bind_value=markdown_value required=true rows=15 />
            </div>

            <div class="flex justify-end gap-2">
                <Button>"Save"</Button>
                <a href=back_href>
                    <Button variant=ButtonVariant::Outline attr:r#type="button">"Cancel"</Button>
                </a>
            </div>
        </form>
    }
}

#[component]
pub fn NewPitchPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let on_submit = Callback::new(move |(title, markdown, tags): (String, String, Vec<Tag>)| {
        let LocalUser::Resolved(user) = app_state.0.local_user.get_untracked() else {
            leptos::logging::error!("cannot create pitch: local user not resolved");
            return;
        };
        let username = app_state
            .0
            .identity
            .get_untracked()
            .map(|i| i.username().to_string())
            .unwrap_or_default();

        spawn_local(async move {
            match app_state
                .0
                .api
                .get_value()
                .create_note(&title, &markdown, &tags, user.id)
                .await
            {
                Ok((mut note, tags)) => {
                    // The create response omits the owner; the signed-in
                    // identity is the owner by construction.
                    if note.username.trim().is_empty() {
                        note.username = username;
                    }
                    app_state
                        .0
                        .dispatch(CollectionsAction::NoteCreated { note, tags });
                }
                Err(e) => leptos::logging::error!("create pitch failed: {e}"),
            }
        });
    });

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"New pitch"</h1>
            <PitchForm on_submit=on_submit />
        </div>
    }
}

#[component]
pub fn EditPitchPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<PitchRouteParams>();

    let note_id = move || params.get().ok().and_then(|p| p.id).unwrap_or_default();

    let current = Memo::new(move |_| {
        let id = note_id();
        app_state.0.collections.with(|c| {
            notes_with_tags(&c.notes, &c.tags)
                .into_iter()
                .find(|v| v.id == id)
        })
    });

    let on_submit = Callback::new(move |(title, markdown, tags): (String, String, Vec<Tag>)| {
        let Some(prev) = current.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match app_state
                .0
                .api
                .get_value()
                .update_note(&prev.id, &title, &markdown, &tags)
                .await
            {
                Ok((mut note, tags)) => {
                    // The update response omits the owner; keep the one we
                    // already had.
                    if note.username.trim().is_empty() {
                        note.username = prev.username.clone();
                    }
                    app_state
                        .0
                        .dispatch(CollectionsAction::NoteUpdated { note, tags });
                }
                Err(e) => leptos::logging::error!("update pitch failed: {e}"),
            }
        });
    });

    view! {
        <div class="space-y-4">
            <h1 class="text-xl font-semibold">"Edit pitch"</h1>
            {move || match current.get() {
                Some(v) => {
                    let back_href = format!("/{}", v.id);
                    view! {
                        <PitchForm
                            initial_title=v.title.clone()
                            initial_markdown=v.markdown.clone()
                            initial_tags=v.tags.clone()
                            on_submit=on_submit
                            back_href=back_href
                        />
                    }
                    .into_any()
                }
                None => view! {
                    <div class="text-sm text-muted-foreground">
                        {move || {
                            if app_state.0.notes_loading.get() {
                                "Loading pitch..."
                            } else {
                                "Pitch not found."
                            }
                        }}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
pub fn RedirectHome() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());

    Effect::new(move |_| {
        navigate.with_value(|nav| nav("/", Default::default()));
    });

    view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Redirecting..."</div> }
}
