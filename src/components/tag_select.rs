use crate::components::ui::Badge;
use crate::models::Tag;
use icons::{ChevronDown, X};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Multi-select over the tag catalog. Selected tags render as removable
/// chips; the dropdown narrows by the typed query. When `on_create` is
/// given, a query that matches no existing label offers a "create" row —
/// the caller owns what happens next (temporary id, server call).
#[component]
pub fn TagMultiSelect(
    selected: RwSignal<Vec<Tag>>,
    #[prop(into)] options: Signal<Vec<Tag>>,
    #[prop(optional, into)] on_create: Option<Callback<String>>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
) -> impl IntoView {
    let open: RwSignal<bool> = RwSignal::new(false);
    let query: RwSignal<String> = RwSignal::new(String::new());

    let visible_options = Memo::new(move |_| {
        let q = query.get().trim().to_lowercase();
        let chosen = selected.get();
        options
            .get()
            .into_iter()
            .filter(|tag| !chosen.iter().any(|c| c.id == tag.id))
            .filter(|tag| q.is_empty() || tag.label.to_lowercase().contains(&q))
            .collect::<Vec<_>>()
    });

    // Query text that qualifies for the "create" row: non-empty and not
    // already a known label.
    let create_label = Memo::new(move |_| {
        let q = query.get().trim().to_string();
        if on_create.is_none() || q.is_empty() {
            return None;
        }
        let taken = options
            .get()
            .iter()
            .any(|t| t.label.eq_ignore_ascii_case(&q))
            || selected.get().iter().any(|t| t.label.eq_ignore_ascii_case(&q));
        if taken {
            None
        } else {
            Some(q)
        }
    });

    let control_class = tw_merge!(
        "border-input flex min-h-9 w-full flex-wrap items-center gap-1 rounded-md border bg-transparent px-2 py-1 text-sm shadow-xs",
        "focus-within:border-ring focus-within:ring-ring/50 focus-within:ring-2"
    );

    view! {
        <div data-name="TagMultiSelect" class="relative w-full">
            <div class=control_class>
                {move || {
                    selected
                        .get()
                        .into_iter()
                        .map(|tag| {
                            let tag_id = tag.id.clone();
                            view! {
                                <Badge class="gap-1">
                                    {tag.label.clone()}
                                    <button
                                        type="button"
                                        class="hover:opacity-70"
                                        aria-label="Remove tag"
                                        on:click=move |_| {
                                            selected.update(|s| s.retain(|t| t.id != tag_id));
                                        }
                                    >
                                        <X class="size-3" />
                                    </button>
                                </Badge>
                            }
                        })
                        .collect_view()
                }}
                <input
                    id=id
                    class="min-w-[8ch] flex-1 bg-transparent py-1 text-sm outline-none placeholder:text-muted-foreground"
                    placeholder=placeholder
                    prop:value=move || query.get()
                    on:focus=move |_| open.set(true)
                    on:input=move |ev| query.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Escape" {
                            open.set(false);
                        }
                    }
                />
                <button
                    type="button"
                    class="text-muted-foreground hover:text-foreground"
                    aria-label="Toggle options"
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    <ChevronDown class="size-4" />
                </button>
            </div>

            <Show when=move || open.get() fallback=|| ().into_view()>
                <ul
                    data-name="TagMultiSelectOptions"
                    role="listbox"
                    class="absolute top-[calc(100%+4px)] left-0 z-50 max-h-[260px] w-full overflow-auto rounded-md border bg-card p-1 shadow-md"
                >
                    {move || {
                        visible_options
                            .get()
                            .into_iter()
                            .map(|tag| {
                                let pick = tag.clone();
                                view! {
                                    <li
                                        role="option"
                                        class="w-full cursor-pointer rounded-sm px-2 py-1.5 text-sm hover:bg-accent hover:text-accent-foreground"
                                        on:click=move |_| {
                                            selected.update(|s| s.push(pick.clone()));
                                            query.set(String::new());
                                        }
                                    >
                                        {tag.label.clone()}
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                    {move || {
                        create_label.get().map(|label| {
                            let label_for_click = label.clone();
                            view! {
                                <li
                                    class="w-full cursor-pointer rounded-sm px-2 py-1.5 text-sm text-primary hover:bg-accent"
                                    on:click=move |_| {
                                        if let Some(cb) = on_create {
                                            cb.run(label_for_click.clone());
                                        }
                                        query.set(String::new());
                                    }
                                >
                                    {format!("Create \"{label}\"")}
                                </li>
                            }
                        })
                    }}
                    {move || {
                        (visible_options.get().is_empty() && create_label.get().is_none()).then(|| {
                            view! {
                                <li class="px-2 py-1.5 text-sm text-muted-foreground">
                                    "No matching tags"
                                </li>
                            }
                        })
                    }}
                </ul>
            </Show>
        </div>
    }
}
