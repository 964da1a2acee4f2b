//! Редактор тарифов прайс-листа: строки tier / premium.

use contracts::domain::a004_price_list::aggregate::{PriceRate, DEFAULT_TIER};
use contracts::enums::VehicleUsage;
use leptos::prelude::*;

use crate::shared::form_utils::parse_number;
use crate::shared::icons::icon;

#[derive(Clone, Debug, PartialEq)]
pub struct RateRow {
    pub key: u64,
    pub tier: String,
    pub premium: String,
}

pub fn rows_from_rates(rates: &[PriceRate]) -> Vec<RateRow> {
    rates
        .iter()
        .enumerate()
        .map(|(i, r)| RateRow {
            key: i as u64 + 1,
            tier: r.tier.clone(),
            premium: r.premium.to_string(),
        })
        .collect()
}

/// Rows back to rates; the first unparsable premium is an error.
pub fn rates_from_rows(rows: &[RateRow]) -> Result<Vec<PriceRate>, String> {
    rows.iter()
        .map(|row| {
            let premium = parse_number(&format!("Premium for '{}'", row.tier), &row.premium)?;
            Ok(PriceRate {
                tier: row.tier.trim().to_lowercase(),
                premium,
            })
        })
        .collect()
}

/// Tier not yet used in the table, `default` first.
fn next_free_tier(rows: &[RateRow]) -> String {
    std::iter::once(DEFAULT_TIER)
        .chain(VehicleUsage::ALL.iter().map(|u| u.code()))
        .find(|tier| !rows.iter().any(|r| r.tier == *tier))
        .unwrap_or(DEFAULT_TIER)
        .to_string()
}

fn tier_options() -> Vec<(&'static str, &'static str)> {
    std::iter::once((DEFAULT_TIER, "Default"))
        .chain(VehicleUsage::ALL.iter().map(|u| (u.code(), u.display_name())))
        .collect()
}

#[component]
pub fn RatesEditor(rows: RwSignal<Vec<RateRow>>) -> impl IntoView {
    let add_row = move |_| {
        rows.update(|r| {
            let key = r.iter().map(|row| row.key).max().unwrap_or(0) + 1;
            let tier = next_free_tier(r);
            r.push(RateRow {
                key,
                tier,
                premium: String::new(),
            });
        })
    };

    view! {
        <table class="rates-editor">
            <thead>
                <tr>
                    <th>"Tier"</th>
                    <th>"Premium"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || rows.get()
                    key=|row| row.key
                    children=move |row: RateRow| {
                        let key = row.key;
                        view! {
                            <tr>
                                <td>
                                    <select
                                        prop:value=row.tier.clone()
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            rows.update(|r| {
                                                if let Some(row) = r.iter_mut().find(|row| row.key == key) {
                                                    row.tier = value;
                                                }
                                            });
                                        }
                                    >
                                        {tier_options()
                                            .into_iter()
                                            .map(|(code, name)| view! {
                                                <option value=code selected=row.tier == code>{name}</option>
                                            })
                                            .collect_view()}
                                    </select>
                                </td>
                                <td>
                                    <input
                                        class="rates-editor__premium"
                                        prop:value=row.premium.clone()
                                        on:change=move |ev| {
                                            let value = event_target_value(&ev);
                                            rows.update(|r| {
                                                if let Some(row) = r.iter_mut().find(|row| row.key == key) {
                                                    row.premium = value;
                                                }
                                            });
                                        }
                                    />
                                </td>
                                <td>
                                    <button
                                        class="rates-editor__remove"
                                        title="Remove rate"
                                        on:click=move |_| rows.update(|r| r.retain(|row| row.key != key))
                                    >
                                        {icon("x")}
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
        <button class="rates-editor__add" on:click=add_row>
            {icon("plus")}
            " Add rate"
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_round_trip_and_errors() {
        let rows = vec![
            RateRow { key: 1, tier: "Default".into(), premium: "1 250,5".into() },
            RateRow { key: 2, tier: "taxi".into(), premium: "3000".into() },
        ];
        let rates = rates_from_rows(&rows).unwrap();
        assert_eq!(rates[0].tier, "default");
        assert_eq!(rates[0].premium, 1250.5);

        let bad = vec![RateRow { key: 1, tier: "taxi".into(), premium: "x".into() }];
        assert_eq!(
            rates_from_rows(&bad).unwrap_err(),
            "Premium for 'taxi': not a number"
        );
    }

    #[test]
    fn test_next_free_tier() {
        let rows = rows_from_rates(&[PriceRate { tier: "default".into(), premium: 1.0 }]);
        assert_eq!(next_free_tier(&rows), "private");
        assert_eq!(next_free_tier(&[]), "default");
    }
}
