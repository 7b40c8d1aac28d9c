#![allow(dead_code)]

use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {DialogHeader, div, "flex flex-col gap-2 text-left"}
    clx! {DialogTitle, h3, "text-lg leading-none font-semibold"}
    clx! {DialogDescription, p, "text-muted-foreground text-sm"}
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogFooter, footer, "flex flex-row justify-end gap-2"}
}

#[allow(unused_imports)]
pub use components::*;

/// Signal-controlled modal. The backdrop click and the corner button both
/// close it by flipping `open`.
#[component]
pub fn Dialog(
    open: RwSignal<bool>,
    #[prop(optional, into)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let children = StoredValue::new(children);
    let merged_class = tw_merge!(
        "relative flex w-full max-w-md flex-col gap-4 rounded-2xl border bg-background p-6 shadow-lg",
        class
    );

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                data-name="DialogBackdrop"
                class="fixed inset-0 z-50 bg-black/50"
                on:click=move |_| open.set(false)
            />
            <div class="pointer-events-none fixed inset-0 z-50 flex items-center justify-center p-4">
                <div data-name="DialogContent" class=merged_class.clone() style="pointer-events: auto;">
                    <button
                        type="button"
                        class="absolute top-4 right-4 rounded-sm p-1 text-muted-foreground hover:text-foreground [&_svg:not([class*='size-'])]:size-4"
                        aria-label="Close dialog"
                        on:click=move |_| open.set(false)
                    >
                        <X />
                    </button>
                    {children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
