use contracts::dashboards::d400_overview::dto::{
    MonthlyAmount, OverviewResponse, StatusCount, DEFAULT_MONTHS,
};
use contracts::shared::money::format_amount;
use contracts::system::roles::Resource;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d400_overview::api;
use crate::shared::components::{BarChart, BarPoint, CodeSelect, StatCard};
use crate::shared::date_utils::month_label;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::system::auth::guard::RequireView;

const PERIOD_OPTIONS: [(&str, &str); 4] = [
    ("6", "Last 6 months"),
    ("12", "Last 12 months"),
    ("24", "Last 24 months"),
    ("36", "Last 36 months"),
];

/// Точки графика премий: подпись месяца и подсказка с количеством полисов
pub fn premium_points(months: &[MonthlyAmount]) -> Vec<BarPoint> {
    months
        .iter()
        .map(|m| BarPoint {
            label: month_label(&m.month),
            value: m.premium,
            tooltip: format!(
                "{}: {} ({} policies)",
                month_label(&m.month),
                format_amount(m.premium),
                m.policies
            ),
        })
        .collect()
}

#[component]
pub fn OverviewDashboard() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Overview>
            <OverviewView />
        </RequireView>
    }
}

#[component]
fn OverviewView() -> impl IntoView {
    let months = RwSignal::new(DEFAULT_MONTHS.to_string());
    let data = RwSignal::new(None::<OverviewResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    let load = move || {
        let months = months.get_untracked().parse::<u32>().unwrap_or(DEFAULT_MONTHS);
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::get_overview(months).await {
                Ok(response) => data.set(Some(response)),
                Err(e) => {
                    log::error!("Failed to load overview: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    // первый запуск тоже грузит данные
    Effect::new(move |_| {
        months.track();
        load();
    });

    let count = move |f: fn(&OverviewResponse) -> i64| {
        Signal::derive(move || data.with(|d| d.as_ref().map(|d| f(d).to_string())))
    };
    let points = Signal::derive(move || {
        data.with(|d| d.as_ref().map(|d| premium_points(&d.premium_by_month)).unwrap_or_default())
    });
    let period_total = Signal::derive(move || {
        data.with(|d| {
            d.as_ref().map(|d| {
                let total: f64 = d.premium_by_month.iter().map(|m| m.premium).sum();
                format!("Premium in period: {}", format_amount(total))
            })
        })
    });

    view! {
        <PageFrame page_id="d400_overview--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Overview"</h1>
                </div>
                <div class="page__header-right">
                    <CodeSelect value=months options=PERIOD_OPTIONS.to_vec() />
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
                    <StatCard label="Customers" icon_name="users" value=count(|d| d.customers) />
                    <StatCard label="Active policies" icon_name="shield" value=count(|d| d.active_policies) />
                    <StatCard label="Open claims" icon_name="alert-triangle" value=count(|d| d.open_claims) />
                    <StatCard label="Open tickets" icon_name="message-square" value=count(|d| d.open_tickets) />
                </div>

                <Card>
                    <h3 class="card__title">"Written premium by month"</h3>
                    <div class="card__subtitle">{move || period_total.get().unwrap_or_default()}</div>
                    <BarChart points=points />
                </Card>

                <div class="dashboard-columns">
                    <Card>
                        <h3 class="card__title">"Policies by status"</h3>
                        <StatusTable rows=Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.policies_by_status.clone()).unwrap_or_default())) />
                    </Card>
                    <Card>
                        <h3 class="card__title">"Claims by status"</h3>
                        <StatusTable rows=Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.claims_by_status.clone()).unwrap_or_default())) />
                    </Card>
                </div>
            </div>
        </PageFrame>
    }
}

#[component]
fn StatusTable(#[prop(into)] rows: Signal<Vec<StatusCount>>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"Status"</TableHeaderCell>
                    <TableHeaderCell>"Count"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                <For
                    each=move || rows.get()
                    key=|row| (row.status.clone(), row.count)
                    children=|row| view! {
                        <TableRow>
                            <TableCell>{row.label}</TableCell>
                            <TableCell class="table__cell--number">{row.count.to_string()}</TableCell>
                        </TableRow>
                    }
                />
            </TableBody>
        </Table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_points() {
        let points = premium_points(&[
            MonthlyAmount {
                month: "2024-03".into(),
                premium: 1250.5,
                policies: 2,
            },
            MonthlyAmount {
                month: "2024-04".into(),
                premium: 0.0,
                policies: 0,
            },
        ]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Mar 24");
        assert_eq!(points[0].value, 1250.5);
        assert!(points[0].tooltip.ends_with("(2 policies)"));
        assert_eq!(points[1].value, 0.0);
    }
}
