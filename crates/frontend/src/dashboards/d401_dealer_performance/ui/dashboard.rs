use contracts::dashboards::d401_dealer_performance::dto::{
    DealerPerformanceResponse, DealerPerformanceRow,
};
use contracts::shared::money::format_amount;
use contracts::system::roles::Resource;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::d401_dealer_performance::api;
use crate::shared::components::{DateRange, StatusBadge, Tone};
use crate::shared::date_utils::{format_date, today_iso, year_start_iso};
use crate::shared::export::download_csv;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast::use_toast;
use crate::system::auth::guard::RequireView;

/// Loss ratio above this is highlighted
const LOSS_RATIO_ALERT: f64 = 0.7;

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn ratio_tone(ratio: f64) -> Tone {
    if ratio >= LOSS_RATIO_ALERT {
        Tone::Error
    } else if ratio > 0.0 {
        Tone::Neutral
    } else {
        Tone::Success
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Отчёт в CSV: строки дилеров и итог последней строкой
pub fn report_csv(report: &DealerPerformanceResponse) -> String {
    let mut out = String::from("dealer,policies,premium,commission,paid_claims,loss_ratio\n");
    for row in report.rows.iter().chain(std::iter::once(&report.total)) {
        out.push_str(&format!(
            "{},{},{:.2},{:.2},{:.2},{:.4}\n",
            csv_field(&row.dealer_name),
            row.policies,
            row.premium,
            row.commission,
            row.paid_claims,
            row.loss_ratio
        ));
    }
    out
}

#[component]
pub fn DealerPerformanceDashboard() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Reports>
            <DealerPerformanceView />
        </RequireView>
    }
}

#[component]
fn DealerPerformanceView() -> impl IntoView {
    let toast = use_toast();
    let date_from = RwSignal::new(year_start_iso());
    let date_to = RwSignal::new(today_iso());
    let report = RwSignal::new(None::<DealerPerformanceResponse>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    let load = move || {
        let from = date_from.get_untracked();
        let to = date_to.get_untracked();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::get_dealer_performance(from, to).await {
                Ok(response) => report.set(Some(response)),
                Err(e) => {
                    log::error!("Failed to load dealer performance: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        date_from.track();
        date_to.track();
        load();
    });

    let export = move |_| {
        let Some(data) = report.get_untracked() else {
            return;
        };
        let filename = format!("dealer_performance_{}_{}.csv", data.date_from, data.date_to);
        if let Err(e) = download_csv(&report_csv(&data), &filename) {
            toast.error(e);
        }
    };

    let rows = move || report.with(|r| r.as_ref().map(|r| r.rows.clone()).unwrap_or_default());

    view! {
        <PageFrame page_id="d401_dealer_performance--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Dealer performance"</h1>
                </div>
                <div class="page__header-right">
                    <DateRange from=date_from to=date_to />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=export
                        disabled=Signal::derive(move || report.with(|r| r.is_none()))
                    >
                        {icon("download")}
                        " Export CSV"
                    </Button>
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
                {move || report.with(|r| r.as_ref().map(|r| view! {
                    <div class="page__subtitle">
                        {format!("Policies issued {} to {}", format_date(&r.date_from), format_date(&r.date_to))}
                    </div>
                }))}

                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"Dealer"</TableHeaderCell>
                            <TableHeaderCell>"Policies"</TableHeaderCell>
                            <TableHeaderCell>"Premium"</TableHeaderCell>
                            <TableHeaderCell>"Commission"</TableHeaderCell>
                            <TableHeaderCell>"Paid claims"</TableHeaderCell>
                            <TableHeaderCell>"Loss ratio"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=rows
                            key=|row| row.dealer_id.clone()
                            children=|row| view! { <PerformanceRow row=row /> }
                        />
                        {move || report.with(|r| r.as_ref().map(|r| {
                            let total = r.total.clone();
                            view! {
                                <TableRow class="table__row--total">
                                    <TableCell><strong>{total.dealer_name}</strong></TableCell>
                                    <TableCell class="table__cell--number">{total.policies.to_string()}</TableCell>
                                    <TableCell class="table__cell--number">{format_amount(total.premium)}</TableCell>
                                    <TableCell class="table__cell--number">{format_amount(total.commission)}</TableCell>
                                    <TableCell class="table__cell--number">{format_amount(total.paid_claims)}</TableCell>
                                    <TableCell class="table__cell--number">{format_ratio(total.loss_ratio)}</TableCell>
                                </TableRow>
                            }
                        }))}
                    </TableBody>
                </Table>

                <Show when=move || report.with(|r| r.as_ref().is_some_and(|r| r.rows.is_empty()))>
                    <div class="list-empty">"No dealers in scope"</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[component]
fn PerformanceRow(row: DealerPerformanceRow) -> impl IntoView {
    let ratio = row.loss_ratio;
    view! {
        <TableRow>
            <TableCell>{row.dealer_name}</TableCell>
            <TableCell class="table__cell--number">{row.policies.to_string()}</TableCell>
            <TableCell class="table__cell--number">{format_amount(row.premium)}</TableCell>
            <TableCell class="table__cell--number">{format_amount(row.commission)}</TableCell>
            <TableCell class="table__cell--number">{format_amount(row.paid_claims)}</TableCell>
            <TableCell class="table__cell--number">
                <StatusBadge label=format_ratio(ratio) tone=ratio_tone(ratio) />
            </TableCell>
        </TableRow>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0.075), "7.5%");
        assert_eq!(format_ratio(0.0), "0.0%");
    }

    #[test]
    fn test_report_csv_quotes_names_and_appends_total() {
        let report = DealerPerformanceResponse::new(
            "2024-01-01".into(),
            "2024-12-31".into(),
            vec![DealerPerformanceRow::new(
                "d1".into(),
                "Anka, Izmir".into(),
                2,
                1000.0,
                100.0,
                250.0,
            )],
        );
        let csv = report_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"Anka, Izmir\",2,1000.00,100.00,250.00,0.2500");
        assert!(lines[2].starts_with("Total,2,"));
    }
}
