use crate::models::{NavEntry, NavItem, Role};

fn item(href: &str, title: &str, icon: &str) -> NavItem {
    NavItem {
        href: href.to_string(),
        title: title.to_string(),
        icon: Some(icon.to_string()),
    }
}

/// build_nav
///
/// Marks the item whose `href` equals `current_path` as active. Matching is
/// exact, so `/instructor/courses/12` does not highlight `/instructor/courses`.
pub fn build_nav(items: &[NavItem], current_path: &str) -> Vec<NavEntry> {
    items
        .iter()
        .map(|item| NavEntry {
            href: item.href.clone(),
            title: item.title.clone(),
            icon: item.icon.clone(),
            active: item.href == current_path,
        })
        .collect()
}

/// sidebar_for
///
/// Dashboard menu for a role.
pub fn sidebar_for(role: Role) -> Vec<NavItem> {
    match role {
        Role::Student => vec![
            item("/dashboard", "Dashboard", "layout-dashboard"),
            item("/my-courses", "My Courses", "book-open"),
            item("/courses", "Browse Courses", "search"),
            item("/profile", "Profile", "user"),
        ],
        Role::Instructor => vec![
            item("/instructor/dashboard", "Dashboard", "layout-dashboard"),
            item("/instructor/courses", "My Courses", "book-open"),
            item("/instructor/courses/new", "Create Course", "plus-circle"),
            item("/profile", "Profile", "user"),
        ],
        Role::Admin => vec![
            item("/admin/dashboard", "Dashboard", "layout-dashboard"),
            item("/admin/courses", "Courses", "book-open"),
            item("/admin/users", "Users", "users"),
            item("/admin/categories", "Categories", "tags"),
        ],
    }
}
