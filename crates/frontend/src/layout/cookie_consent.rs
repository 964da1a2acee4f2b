//! Баннер согласия на cookies. Решение хранится в localStorage
//! (`cookie_consent`, JSON `{status, decided_at}`) и больше не спрашивается.

use chrono::Utc;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use thaw::*;

use crate::system::auth::storage::local_storage;

const CONSENT_KEY: &str = "cookie_consent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieConsent {
    pub status: ConsentStatus,
    pub decided_at: String,
}

impl CookieConsent {
    pub fn new(status: ConsentStatus, decided_at: impl Into<String>) -> Self {
        Self {
            status,
            decided_at: decided_at.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Повреждённое значение равносильно отсутствию решения
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

fn load() -> Option<CookieConsent> {
    let raw = local_storage()?.get_item(CONSENT_KEY).ok()??;
    CookieConsent::parse(&raw)
}

fn store(consent: &CookieConsent) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(CONSENT_KEY, &consent.to_json());
    }
}

#[component]
pub fn CookieConsentBanner() -> impl IntoView {
    let decided = RwSignal::new(load().is_some());

    let decide = move |status: ConsentStatus| {
        store(&CookieConsent::new(status, Utc::now().to_rfc3339()));
        decided.set(true);
    };

    view! {
        <Show when=move || !decided.get()>
            <div class="cookie-consent">
                <span class="cookie-consent__text">
                    "We use cookies and local storage to keep you signed in and remember your preferences."
                </span>
                <div class="cookie-consent__actions">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| decide(ConsentStatus::Declined)>
                        "Decline"
                    </Button>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| decide(ConsentStatus::Accepted)>
                        "Accept"
                    </Button>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_format() {
        let consent = CookieConsent::new(ConsentStatus::Accepted, "2025-01-02T03:04:05+00:00");
        assert_eq!(
            consent.to_json(),
            r#"{"status":"accepted","decided_at":"2025-01-02T03:04:05+00:00"}"#
        );
    }

    #[test]
    fn test_parse() {
        let parsed = CookieConsent::parse(r#"{"status":"declined","decided_at":"x"}"#).unwrap();
        assert_eq!(parsed.status, ConsentStatus::Declined);
        assert_eq!(parsed.decided_at, "x");
        assert!(CookieConsent::parse("yes").is_none());
        assert!(CookieConsent::parse(r#"{"status":"maybe","decided_at":"x"}"#).is_none());
    }
}
