use leptos::prelude::*;
use thaw::*;

use super::{ListStatus, PaginationControls};
use crate::shared::list_state::ListController;

/// Pagination bound to a list controller.
#[component]
pub fn ListPager<T: Clone + Send + Sync + 'static>(list: ListController<T>) -> impl IntoView {
    view! {
        <PaginationControls
            current_page=list.page()
            total_pages=list.total_pages()
            total_count=list.total()
            page_size=list.page_size()
            on_page_change=Callback::new(move |page| list.go_to(page))
            on_page_size_change=Callback::new(move |size| list.set_page_size(size))
        />
    }
}

/// Loading / error / empty row for a list controller.
#[component]
pub fn ListFeedback<T: Clone + Send + Sync + 'static>(
    list: ListController<T>,
    #[prop(optional)] empty_text: Option<&'static str>,
) -> impl IntoView {
    view! {
        <ListStatus
            loading=list.loading()
            error=list.error()
            empty=list.empty()
            on_retry=Callback::new(move |_| list.reload())
            empty_text=empty_text.unwrap_or("Nothing found.")
        />
    }
}

#[component]
pub fn SortableHeader(
    label: &'static str,
    #[prop(into)] indicator: Signal<&'static str>,
    on_sort: Callback<()>,
) -> impl IntoView {
    view! {
        <TableHeaderCell>
            <div class="table__sortable-header" on:click=move |_| on_sort.run(())>
                {label}
                <span class="table__sort-indicator">{move || indicator.get()}</span>
            </div>
        </TableHeaderCell>
    }
}
