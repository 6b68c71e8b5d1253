//! Entry-path matching for `query` and `queryHost` operations.
//!
//! A plain query is an unanchored, case-sensitive substring search over the
//! full entry path. A host query walks the hostname from most specific to
//! least: the full host first, then with the leftmost label stripped, and so
//! on, stopping at the first level where any stored path segment matches
//! exactly. Only that level's entries are returned, so credentials filed
//! under `some.other.host` win over a looser `other.host` entry for a query
//! on `find.some.other.host`, and `evilsome.other.host` never masquerades as
//! `some.other.host`.

/// Returns entries whose full path contains `query`, sorted.
#[must_use]
pub fn search(names: &[String], query: &str) -> Vec<String> {
    let mut matches: Vec<String> = names
        .iter()
        .filter(|name| name.contains(query))
        .cloned()
        .collect();
    matches.sort();
    matches.dedup();
    matches
}

/// Returns entries matching `host`, sorted and deduplicated.
///
/// The host is tried as-is, then progressively generalised by stripping its
/// leftmost label; the first level with any match is returned and the walk
/// stops. An entry matches a level when any of its slash-delimited path
/// segments equals the candidate hostname. Matching is applied to every
/// segment, not just the leaf: stores commonly file credentials both as
/// `prefix/<host>/<login>` and as `prefix/.../<host>`. Generalisation never
/// reaches a bare label, so a stored `com` entry cannot soak up every `.com`
/// host. Hostname comparison is case-insensitive; the returned names keep
/// their stored casing.
#[must_use]
pub fn search_host(names: &[String], host: &str) -> Vec<String> {
    let mut candidate = host;
    loop {
        let mut matches: Vec<String> = names
            .iter()
            .filter(|name| {
                name.split('/')
                    .any(|segment| segment.eq_ignore_ascii_case(candidate))
            })
            .cloned()
            .collect();
        if !matches.is_empty() {
            matches.sort();
            matches.dedup();
            return matches;
        }
        match candidate.split_once('.') {
            // Stop before the candidate degenerates to a single label.
            Some((_, parent)) if parent.contains('.') => candidate = parent,
            _ => return Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn fixture_names() -> Vec<String> {
        [
            "awesomePrefix/foo/bar",
            "awesomePrefix/fixed/secret",
            "awesomePrefix/fixed/yamllogin",
            "awesomePrefix/fixed/yamlother",
            "awesomePrefix/some.other.host/other",
            "awesomePrefix/b/some.other.host",
            "awesomePrefix/evilsome.other.host",
            "evilsome.other.host/something",
            "awesomePrefix/other.host/other",
            "somename/github.com",
        ]
        .iter()
        .map(|name| (*name).to_owned())
        .collect()
    }

    #[test]
    fn search_returns_empty_for_no_match() {
        assert!(search(&fixture_names(), "notfound").is_empty());
    }

    #[test]
    fn search_matches_single_entry() {
        assert_eq!(search(&fixture_names(), "foo"), ["awesomePrefix/foo/bar"]);
    }

    #[test]
    fn search_matches_multiple_entries_sorted() {
        assert_eq!(
            search(&fixture_names(), "yaml"),
            [
                "awesomePrefix/fixed/yamllogin",
                "awesomePrefix/fixed/yamlother"
            ]
        );
    }

    #[test]
    fn search_is_case_sensitive() {
        assert!(search(&fixture_names(), "AWESOME").is_empty());
        assert_eq!(search(&fixture_names(), "awesomePrefix/foo").len(), 1);
    }

    #[test]
    fn search_matches_full_path_not_just_leaf() {
        assert_eq!(
            search(&fixture_names(), "fixed/ya"),
            [
                "awesomePrefix/fixed/yamllogin",
                "awesomePrefix/fixed/yamlother"
            ]
        );
    }

    #[test]
    fn host_search_matches_parent_domains_on_any_segment() {
        assert_eq!(
            search_host(&fixture_names(), "find.some.other.host"),
            [
                "awesomePrefix/b/some.other.host",
                "awesomePrefix/some.other.host/other"
            ]
        );
    }

    #[test]
    fn host_search_returns_only_the_most_specific_level() {
        // `other.host` entries also sit on the stripping path for this
        // host, but the walk stops at the `some.other.host` level.
        let result = search_host(&fixture_names(), "find.some.other.host");
        assert!(!result.contains(&"awesomePrefix/other.host/other".to_owned()));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn host_search_falls_back_when_specific_levels_are_empty() {
        let names = vec!["awesomePrefix/other.host/other".to_owned()];
        assert_eq!(search_host(&names, "find.some.other.host"), names);
    }

    #[test]
    fn host_search_never_crosses_label_boundaries() {
        // A longer stored segment must not match a shorter host.
        assert_eq!(
            search_host(&fixture_names(), "other.host"),
            ["awesomePrefix/other.host/other"]
        );
        // Stripping only ever generalises the query, never re-anchors it
        // under a different parent domain.
        assert!(search_host(&fixture_names(), "some.other.host.different.domain").is_empty());
    }

    #[test]
    fn host_search_excludes_lookalike_prefixes() {
        assert_eq!(
            search_host(&fixture_names(), "some.other.host"),
            [
                "awesomePrefix/b/some.other.host",
                "awesomePrefix/some.other.host/other"
            ]
        );
    }

    #[test]
    fn host_search_matches_exact_public_suffix_entry() {
        assert_eq!(
            search_host(&fixture_names(), "github.com"),
            ["somename/github.com"]
        );
    }

    #[test]
    fn host_search_never_generalises_to_a_bare_label() {
        let names = vec!["somename/com".to_owned(), "somename/host".to_owned()];
        assert!(search_host(&names, "github.com").is_empty());
        assert!(search_host(&names, "find.some.other.host").is_empty());
    }

    #[test]
    fn host_search_matches_deeply_nested_segments() {
        let names = vec!["a/b/c/some.other.host/deep/leaf".to_owned()];
        assert_eq!(search_host(&names, "find.some.other.host"), names);
    }

    #[rstest]
    #[case::stored_uppercase("somename/GitHub.com", "github.com")]
    #[case::queried_uppercase("somename/github.com", "GitHub.COM")]
    fn host_search_is_case_insensitive_on_hostnames(#[case] stored: &str, #[case] host: &str) {
        let names = vec![stored.to_owned()];
        assert_eq!(search_host(&names, host), names);
    }
}
