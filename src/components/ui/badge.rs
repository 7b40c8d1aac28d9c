use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Badge, span, "inline-flex max-w-full items-center truncate rounded-md bg-primary px-2 py-0.5 text-xs font-medium text-primary-foreground"}
    clx! {BadgeOutline, span, "inline-flex max-w-full items-center truncate rounded-md border border-input px-2 py-0.5 text-xs font-medium text-muted-foreground"}
}

#[allow(unused_imports)]
pub use components::*;
