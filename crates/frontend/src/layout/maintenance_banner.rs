use contracts::system::maintenance::MaintenanceState;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::polling::poll_every;
use crate::system::status::api;

const MAINTENANCE_POLL_MS: u32 = 60_000;

/// Полоса над контентом, пока включён режим обслуживания.
#[component]
pub fn MaintenanceBanner() -> impl IntoView {
    let state = RwSignal::new(MaintenanceState::default());

    poll_every(MAINTENANCE_POLL_MS, move || {
        spawn_local(async move {
            match api::get_maintenance().await {
                Ok(current) => {
                    let _ = state.try_set(current);
                }
                Err(e) => log::debug!("maintenance state unavailable: {}", e),
            }
        });
    });

    view! {
        <Show when=move || state.with(|s| s.enabled)>
            <div class="maintenance-banner" role="status">
                {move || state.with(|s| s.banner_text())}
            </div>
        </Show>
    }
}
