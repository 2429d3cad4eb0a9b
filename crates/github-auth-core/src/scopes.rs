//! GitHub's hierarchical OAuth scope model.
//!
//! Some scopes are umbrellas that implicitly grant finer-grained scopes,
//! possibly through more than one level (`admin:org` grants `write:org`,
//! which itself grants `read:org`). A token carrying an umbrella scope
//! therefore covers every scope in its transitive closure.

use std::collections::VecDeque;

/// Scopes directly implied by an umbrella scope. Scopes without an entry
/// imply nothing beyond themselves.
fn implied(scope: &str) -> &'static [&'static str] {
    match scope {
        "repo" => &[
            "repo:status",
            "repo_deployment",
            "public_repo",
            "repo:invite",
            "security_events",
        ],
        "admin:repo_hook" => &["write:repo_hook", "read:repo_hook"],
        "write:repo_hook" => &["read:repo_hook"],
        "admin:org" => &["write:org", "read:org"],
        "write:org" => &["read:org"],
        "admin:public_key" => &["write:public_key", "read:public_key"],
        "write:public_key" => &["read:public_key"],
        "user" => &["read:user", "user:email", "user:follow"],
        "project" => &["read:project"],
        "write:packages" => &["read:packages"],
        "admin:gpg_key" => &["write:gpg_key", "read:gpg_key"],
        "write:gpg_key" => &["read:gpg_key"],
        _ => &[],
    }
}

/// Transitive closure of a scope: the scope itself first, then everything
/// it implies, breadth-first in table order, with no duplicates. The
/// already-emitted set doubles as a cycle guard.
pub fn expand(scope: &str) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let mut pending: VecDeque<String> = VecDeque::from([scope.to_owned()]);

    while let Some(current) = pending.pop_front() {
        if expanded.contains(&current) {
            continue;
        }
        for implied_scope in implied(&current) {
            pending.push_back((*implied_scope).to_owned());
        }
        expanded.push(current);
    }

    expanded
}

/// Union of [`expand`] over every granted scope, preserving first-seen
/// order and dropping duplicates.
pub fn expand_all(granted: &[String]) -> Vec<String> {
    let mut full: Vec<String> = Vec::new();
    for scope in granted {
        for expanded in expand(scope) {
            if !full.contains(&expanded) {
                full.push(expanded);
            }
        }
    }
    full
}

/// Requested scopes not covered by the granted set once umbrella scopes
/// are expanded, in request order.
pub fn missing_scopes(requested: &[String], granted: &[String]) -> Vec<String> {
    let full_granted = expand_all(granted);
    requested
        .iter()
        .filter(|scope| !full_granted.contains(scope))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn expand_is_transitively_closed() {
        assert_eq!(
            expand("admin:org"),
            scopes(&["admin:org", "write:org", "read:org"])
        );
    }

    #[test]
    fn expand_has_no_duplicates() {
        // admin:repo_hook reaches read:repo_hook both directly and through
        // write:repo_hook.
        assert_eq!(
            expand("admin:repo_hook"),
            scopes(&["admin:repo_hook", "write:repo_hook", "read:repo_hook"])
        );
    }

    #[test]
    fn expand_unknown_scope_is_itself() {
        assert_eq!(expand("gist"), scopes(&["gist"]));
    }

    #[test]
    fn expand_all_unions_granted_scopes() {
        assert_eq!(
            expand_all(&scopes(&["admin:org", "read:user", "read:project"])),
            scopes(&[
                "admin:org",
                "write:org",
                "read:org",
                "read:user",
                "read:project"
            ])
        );
    }

    #[test]
    fn missing_scopes_reports_uncovered_requests() {
        let requested = scopes(&["read:user", "write:org", "some scope"]);
        let granted = scopes(&["admin:org", "read:user", "read:project"]);
        assert_eq!(missing_scopes(&requested, &granted), scopes(&["some scope"]));
    }

    #[test]
    fn missing_scopes_empty_when_fully_covered() {
        let requested = scopes(&["read:org", "user:email"]);
        let granted = scopes(&["write:org", "user"]);
        assert!(missing_scopes(&requested, &granted).is_empty());
    }
}
