use contracts::system::maintenance::{format_uptime, SystemStatus, UpdateMaintenanceDto};
use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::{StatCard, StatusBadge, Tone};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireView;
use crate::system::status::api;

#[component]
pub fn SystemStatusPage() -> impl IntoView {
    view! {
        <RequireView resource=Resource::SystemStatus>
            <SystemStatusView />
        </RequireView>
    }
}

#[component]
fn SystemStatusView() -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let status = RwSignal::new(None::<SystemStatus>);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let maintenance_enabled = RwSignal::new(false);
    let maintenance_message = RwSignal::new(String::new());
    let (saving, set_saving) = signal(false);

    let load = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::get_status().await {
                Ok(s) => {
                    maintenance_enabled.set(s.maintenance.enabled);
                    maintenance_message.set(s.maintenance.message.clone());
                    status.set(Some(s));
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };
    load();

    let save_maintenance = move |_| {
        let dto = UpdateMaintenanceDto {
            enabled: maintenance_enabled.get_untracked(),
            message: maintenance_message.get_untracked().trim().to_string(),
        };
        set_saving.set(true);
        spawn_local(async move {
            match api::set_maintenance(&dto).await {
                Ok(state) => {
                    toast.success(if state.enabled {
                        "Maintenance mode enabled"
                    } else {
                        "Maintenance mode disabled"
                    });
                    status.update(|s| {
                        if let Some(s) = s {
                            s.maintenance = state;
                        }
                    });
                }
                Err(e) => toast.error(format!("Failed to update maintenance mode: {}", e)),
            }
            set_saving.set(false);
        });
    };

    let field = move |f: fn(&SystemStatus) -> String| {
        Signal::derive(move || status.with(|s| s.as_ref().map(f)))
    };

    view! {
        <PageFrame page_id="sys_status--system" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"System status"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=loading
                    >
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="stat-grid">
                    <StatCard label="Version" icon_name="server" value=field(|s| s.version.clone()) />
                    <StatCard
                        label="Uptime"
                        icon_name="activity"
                        value=field(|s| format_uptime(s.uptime_seconds))
                        subtitle=Signal::derive(move || status.with(|s| s.as_ref().map(|s| format!("since {}", format_datetime(&s.started_at)))))
                    />
                    <StatCard
                        label="Database"
                        icon_name="database"
                        value=field(|s| if s.database_ok { "OK".to_string() } else { "Unavailable".to_string() })
                        subtitle=Signal::derive(move || status.with(|s| s.as_ref().map(|s| format!("{} ms round trip", s.database_latency_ms))))
                    />
                </div>

                <Card>
                    <h3 class="card__title">"Maintenance mode"</h3>
                    {move || status.with(|s| s.as_ref().map(|s| {
                        let m = &s.maintenance;
                        let (label, tone) = if m.enabled { ("Enabled", Tone::Warning) } else { ("Disabled", Tone::Success) };
                        let changed = match (&m.updated_at, &m.updated_by) {
                            (Some(at), Some(by)) => format!("Changed {} by {}", format_datetime(at), by),
                            (Some(at), None) => format!("Changed {}", format_datetime(at)),
                            _ => String::new(),
                        };
                        view! {
                            <div class="maintenance-state">
                                <StatusBadge label=label tone=tone />
                                <span class="maintenance-state__changed">{changed}</span>
                            </div>
                        }
                    }))}

                    <Show when=move || auth_state.get().can(Permission::ManageMaintenance)>
                        <div class="form__group">
                            <Switch checked=maintenance_enabled label="Block changes for everyone except super administrators" />
                        </div>
                        <div class="form__group">
                            <Label>"Banner message"</Label>
                            <Textarea value=maintenance_message placeholder="Shown to users while maintenance is on" />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=save_maintenance
                            disabled=saving
                        >
                            "Apply"
                        </Button>
                    </Show>
                </Card>

                <Card>
                    <h3 class="card__title">"Records"</h3>
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Table"</TableHeaderCell>
                                <TableHeaderCell>"Count"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || status.with(|s| {
                                s.as_ref()
                                    .map(|s| s.record_counts.clone())
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|rc| view! {
                                        <TableRow>
                                            <TableCell>{rc.name}</TableCell>
                                            <TableCell class="table__cell--number">{rc.count.to_string()}</TableCell>
                                        </TableRow>
                                    })
                                    .collect_view()
                            })}
                        </TableBody>
                    </Table>
                </Card>
            </div>
        </PageFrame>
    }
}
