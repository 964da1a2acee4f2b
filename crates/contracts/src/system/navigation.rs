//! Навигация по ролям: единственный источник ключей страниц (tab keys).
//!
//! Sidebar строит меню через `menu_for_role`, реестр табов проверяет доступ
//! через `page_allowed`. Детальные табы имеют ключ `<base>_detail_<id>`.

use crate::system::roles::{Resource, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub items: Vec<MenuItem>,
}

struct PageDef {
    key: &'static str,
    label: &'static str,
    icon: &'static str,
    group: &'static str,
    resource: Resource,
}

const GROUPS: &[(&str, &str, &str)] = &[
    ("dashboards", "Dashboards", "bar-chart"),
    ("sales", "Sales", "file-text"),
    ("catalog", "Catalog", "database"),
    ("work", "Work", "layers"),
    ("system", "System", "settings"),
];

const PAGES: &[PageDef] = &[
    PageDef { key: "d400_overview", label: "Overview", icon: "bar-chart", group: "dashboards", resource: Resource::Overview },
    PageDef { key: "d401_dealer_performance", label: "Dealer performance", icon: "activity", group: "dashboards", resource: Resource::Reports },
    PageDef { key: "a002_customer", label: "Customers", icon: "users", group: "sales", resource: Resource::Customers },
    PageDef { key: "a003_vehicle", label: "Vehicles", icon: "truck", group: "sales", resource: Resource::Vehicles },
    PageDef { key: "a006_policy", label: "Policies", icon: "shield", group: "sales", resource: Resource::Policies },
    PageDef { key: "a007_claim", label: "Claims", icon: "alert-triangle", group: "sales", resource: Resource::Claims },
    PageDef { key: "a004_price_list", label: "Price lists", icon: "tag", group: "catalog", resource: Resource::PriceLists },
    PageDef { key: "a005_policy_series", label: "Policy series", icon: "hash", group: "catalog", resource: Resource::PolicySeries },
    PageDef { key: "a001_dealer", label: "Dealers", icon: "building", group: "catalog", resource: Resource::Dealers },
    PageDef { key: "a008_task", label: "Tasks", icon: "check-square", group: "work", resource: Resource::Tasks },
    PageDef { key: "a009_ticket", label: "Support", icon: "message-square", group: "work", resource: Resource::Tickets },
    PageDef { key: "a010_notification", label: "Notifications", icon: "bell", group: "work", resource: Resource::Notifications },
    PageDef { key: "sys_users", label: "Users", icon: "user", group: "system", resource: Resource::Users },
    PageDef { key: "sys_status", label: "System status", icon: "server", group: "system", resource: Resource::SystemStatus },
];

/// Menu for the role; groups without reachable pages are dropped.
pub fn menu_for_role(role: Role) -> Vec<MenuGroup> {
    GROUPS
        .iter()
        .filter_map(|&(id, label, icon)| {
            let items: Vec<MenuItem> = PAGES
                .iter()
                .filter(|p| p.group == id && role.can_view(p.resource))
                .map(|p| MenuItem {
                    key: p.key,
                    label: p.label,
                    icon: p.icon,
                })
                .collect();
            (!items.is_empty()).then(|| MenuGroup {
                id,
                label,
                icon,
                items,
            })
        })
        .collect()
}

/// `a006_policy_detail_<id>` -> `a006_policy`
pub fn base_key(key: &str) -> &str {
    key.split_once("_detail_").map(|(base, _)| base).unwrap_or(key)
}

pub fn detail_key(base: &str, id: &str) -> String {
    format!("{}_detail_{}", base, id)
}

pub fn page_allowed(role: Role, key: &str) -> bool {
    let base = base_key(key);
    PAGES
        .iter()
        .find(|p| p.key == base)
        .map(|p| role.can_view(p.resource))
        .unwrap_or(false)
}

pub fn page_title(key: &str) -> String {
    let base = base_key(key);
    let label = PAGES
        .iter()
        .find(|p| p.key == base)
        .map(|p| p.label)
        .unwrap_or(base);
    if base == key {
        label.to_string()
    } else {
        format!("{}: details", label)
    }
}

/// First page to open after login.
pub fn home_page(role: Role) -> &'static str {
    match role {
        Role::Customer => "a006_policy",
        _ => "d400_overview",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(role: Role) -> Vec<&'static str> {
        menu_for_role(role)
            .into_iter()
            .flat_map(|g| g.items.into_iter().map(|i| i.key))
            .collect()
    }

    #[test]
    fn test_customer_menu() {
        let keys = keys(Role::Customer);
        assert!(keys.contains(&"a006_policy"));
        assert!(keys.contains(&"a007_claim"));
        assert!(!keys.contains(&"a002_customer"));
        assert!(!keys.contains(&"sys_users"));
        assert!(!menu_for_role(Role::Customer).iter().any(|g| g.id == "system"));
        assert!(!menu_for_role(Role::Customer).iter().any(|g| g.id == "catalog"));
    }

    #[test]
    fn test_staff_menu_has_everything() {
        assert_eq!(keys(Role::SuperAdmin).len(), PAGES.len());
        assert_eq!(keys(Role::Admin).len(), PAGES.len());
    }

    #[test]
    fn test_observer_menu() {
        let keys = keys(Role::Observer);
        assert!(keys.contains(&"d401_dealer_performance"));
        assert!(keys.contains(&"a001_dealer"));
        assert!(!keys.contains(&"a008_task"));
        assert!(!keys.contains(&"a004_price_list"));
    }

    #[test]
    fn test_detail_keys_follow_base_rules() {
        let key = detail_key("a001_dealer", "42");
        assert_eq!(key, "a001_dealer_detail_42");
        assert_eq!(base_key(&key), "a001_dealer");
        assert!(page_allowed(Role::Admin, &key));
        assert!(!page_allowed(Role::Customer, &key));
        assert!(!page_allowed(Role::Admin, "unknown_page"));
        assert_eq!(page_title(&key), "Dealers: details");
        assert_eq!(page_title("a006_policy"), "Policies");
    }
}
