//! Field extraction from GRC's text output.
//!
//! GRC prints human-oriented lines, not structured data. Every rule here is a
//! case-insensitive prefix or substring match, and a missing line means the
//! field is absent. Nothing in this module fails.

use serde::{Deserialize, Serialize};

/// The authenticated GitHub account, as reported by `grc user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrcUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub avatar_url: String,
}

/// Version token from `grc version` output.
///
/// The version line is the first one containing `GRC VERSION`; the version is
/// its third whitespace-separated word (`GRC version v3.0.2`).
pub fn version(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find(|l| l.to_ascii_uppercase().contains("GRC VERSION"))
        .and_then(|l| l.split_whitespace().nth(2))
        .map(str::to_string)
}

/// `KEY: value` lines from `grc user`. Unknown keys are ignored.
pub fn user(lines: &[String]) -> GrcUser {
    let mut user = GrcUser::default();
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim().to_ascii_uppercase().as_str() {
            "USERNAME" => user.username = value,
            "E-MAIL" | "EMAIL" => user.email = value,
            "NAME" => user.name = value,
            "AVATAR URL" => user.avatar_url = value,
            _ => {}
        }
    }
    user
}

/// Template file names from `grc temp list`.
///
/// A first line starting with `NO ` (e.g. `No templates found.`) means the
/// list is empty.
pub fn templates(lines: &[String]) -> Vec<String> {
    let first_is_none = lines
        .first()
        .is_some_and(|l| l.trim_start().to_ascii_uppercase().starts_with("NO "));
    if first_is_none {
        return Vec::new();
    }
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.contains(".yaml"))
        .map(str::to_string)
        .collect()
}

/// First line starting with `https://`.
pub fn repo_url(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| {
            l.get(..8)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("https://"))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_string).collect()
    }

    #[test]
    fn version_from_banner() {
        let out = lines("GitHub Repository Creator\nGRC version v3.0.2\n");
        assert_eq!(version(&out).as_deref(), Some("v3.0.2"));
    }

    #[test]
    fn version_line_match_ignores_case() {
        assert_eq!(version(&lines("grc Version V3.0.2")).as_deref(), Some("V3.0.2"));
    }

    #[test]
    fn version_missing_or_truncated() {
        assert_eq!(version(&lines("something else")), None);
        assert_eq!(version(&lines("GRC version")), None);
        assert_eq!(version(&[]), None);
    }

    #[test]
    fn user_fields() {
        let out = lines(
            "USERNAME: octocat\nE-MAIL: octo@github.com\nNAME: The Octocat\nAVATAR URL: https://avatars.githubusercontent.com/u/583231",
        );
        let u = user(&out);
        assert_eq!(u.username, "octocat");
        assert_eq!(u.email, "octo@github.com");
        assert_eq!(u.name, "The Octocat");
        assert_eq!(u.avatar_url, "https://avatars.githubusercontent.com/u/583231");
    }

    #[test]
    fn user_missing_fields_stay_empty() {
        let u = user(&lines("Username: octocat\ngarbage line\n: nothing"));
        assert_eq!(u.username, "octocat");
        assert!(u.email.is_empty());
        assert!(u.name.is_empty());
    }

    #[test]
    fn templates_filtered_to_yaml() {
        let out = lines("Templates:\n  node.yaml\n  rust.yaml\nREADME.md");
        assert_eq!(templates(&out), vec!["node.yaml", "rust.yaml"]);
    }

    #[test]
    fn templates_none_banner() {
        assert!(templates(&lines("No templates found. (see a.yaml)")).is_empty());
        assert!(templates(&[]).is_empty());
    }

    #[test]
    fn repo_url_first_https_line() {
        let out = lines("line1\nhttps://github.com/u/my-repo\nline3");
        assert_eq!(repo_url(&out).as_deref(), Some("https://github.com/u/my-repo"));
    }

    #[test]
    fn repo_url_prefers_first_match() {
        let out = lines("HTTPS://github.com/u/a\nhttps://github.com/u/b");
        assert_eq!(repo_url(&out).as_deref(), Some("HTTPS://github.com/u/a"));
    }

    #[test]
    fn repo_url_absent() {
        assert_eq!(repo_url(&lines("http://insecure\nnot found")), None);
    }
}
