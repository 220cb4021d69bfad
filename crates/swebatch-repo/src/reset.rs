//! Git reset command synthesis
//!
//! Produces the shell commands that bring a working copy to exactly the state
//! named by a base reference. Pure: nothing here touches the network.
//!
//! | mirror | token | fetch                      | checkout              |
//! |--------|-------|----------------------------|-----------------------|
//! | no     | any   | `git fetch`                | `git checkout <base>` |
//! | yes    | no    | `git fetch <mirror>`       | `git checkout FETCH_HEAD` |
//! | yes    | yes   | `git fetch <token@mirror>` | `git checkout FETCH_HEAD` |
//!
//! With a mirror, the base reference is only a discriminator and may not exist
//! on the mirror by name, so whatever was fetched is checked out instead.

use crate::url::build_authenticated_url;

/// Build the ordered reset command sequence.
///
/// Empty `mirror_url` or `token` values count as absent. The returned sequence
/// always fetches before it checks out, and discards tracked and untracked
/// residue around the checkout.
pub fn reset_commands(base_ref: &str, mirror_url: Option<&str>, token: Option<&str>) -> Vec<String> {
    let mirror_url = mirror_url.filter(|m| !m.is_empty());
    let token = token.filter(|t| !t.is_empty());

    let (fetch, checkout) = match (mirror_url, token) {
        (None, _) => ("git fetch".to_string(), format!("git checkout {}", base_ref)),
        (Some(mirror), None) => (
            format!("git fetch {}", mirror),
            "git checkout FETCH_HEAD".to_string(),
        ),
        (Some(mirror), Some(token)) => (
            format!("git fetch {}", build_authenticated_url(mirror, token)),
            "git checkout FETCH_HEAD".to_string(),
        ),
    };

    vec![
        fetch,
        "git status".to_string(),
        "git restore .".to_string(),
        "git reset --hard".to_string(),
        checkout,
        "git clean -fdq".to_string(),
    ]
}
