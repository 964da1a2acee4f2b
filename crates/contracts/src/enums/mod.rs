//! Справочные перечисления, общие для backend и frontend.
//!
//! Каждое перечисление хранится в БД и передаётся по сети строковым кодом
//! (`code()`), а в UI показывается через `display_name()`.

pub mod insurance;
pub mod workflow;

pub use insurance::{CustomerKind, Currency, PolicyStatus, PolicyType, VehicleUsage};
pub use workflow::{
    ClaimStatus, NotificationKind, TaskPriority, TaskStatus, TicketCategory, TicketStatus,
};

/// Declares a fieldless enum backed by stable string codes.
///
/// Generates `ALL`, `code()`, `display_name()`, `from_code()`, `Default`
/// (first listed variant) and `Display` (the code).
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $first:ident => ($first_code:literal, $first_label:literal)
            $(, $variant:ident => ($code:literal, $label:literal))* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            #[serde(rename = $first_code)]
            $first,
            $(
                #[serde(rename = $code)]
                $variant,
            )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first $(, $name::$variant)*];

            pub fn code(&self) -> &'static str {
                match self {
                    $name::$first => $first_code,
                    $($name::$variant => $code,)*
                }
            }

            pub fn display_name(&self) -> &'static str {
                match self {
                    $name::$first => $first_label,
                    $($name::$variant => $label,)*
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $first_code => Some($name::$first),
                    $($code => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

pub(crate) use code_enum;
