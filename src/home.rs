use crate::{
    auth::AuthSnapshot,
    models::{CtaContent, Role},
};

fn cta(heading: String, body: &str, action_label: &str, action_href: &str) -> CtaContent {
    CtaContent {
        heading,
        body: body.to_string(),
        action_label: action_label.to_string(),
        action_href: action_href.to_string(),
    }
}

/// cta_for
///
/// Home page call-to-action for the current visitor. Signed-in users are
/// greeted by first name and pointed at their own workspace; everyone else is
/// invited to register.
pub fn cta_for(snapshot: &AuthSnapshot) -> CtaContent {
    if !snapshot.is_authenticated {
        return cta(
            "Ready to start your learning journey?".to_string(),
            "Join thousands of students already learning on our platform. \
             Get unlimited access to all courses with a membership.",
            "Get Started",
            "/register",
        );
    }

    let first_name = snapshot
        .user
        .as_ref()
        .map(|user| user.first_name.as_str())
        .unwrap_or_default();

    match snapshot.role() {
        Some(Role::Admin) => cta(
            format!("Platform Management, {}", first_name),
            "Oversee the platform's operations, manage content, and ensure a quality \
             learning experience for all users.",
            "Admin Dashboard",
            "/admin/dashboard",
        ),
        Some(Role::Instructor) => cta(
            format!("Share your expertise, {}", first_name),
            "Create engaging courses, grow your student base, and make an impact in \
             the educational community.",
            "Manage Courses",
            "/instructor/courses",
        ),
        Some(Role::Student) | None => cta(
            format!("Continue your learning journey, {}", first_name),
            "Jump back into your courses or explore new learning opportunities to \
             enhance your skills.",
            "Continue Learning",
            "/my-courses",
        ),
    }
}
