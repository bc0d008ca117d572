//! Pod alias table.
//!
//! Search arguments accept shorthand pod names; JQL wants the full
//! category labels stored in Jira. Unknown names pass through unchanged
//! so hand-written labels keep working.

const POD_ALIASES: &[(&str, &str)] = &[
    ("core", "Core Platform"),
    ("infra", "Infrastructure"),
    ("ingest", "Data Ingestion"),
    ("growth", "Growth & Activation"),
    ("mobile", "Mobile Apps"),
    ("sre", "Site Reliability"),
];

/// Resolve a pod shorthand to its full label.
///
/// Lookup is case-insensitive and ignores surrounding whitespace; a name
/// with no alias comes back as given (trimmed).
#[must_use]
pub fn resolve_pod(name: &str) -> &str {
    let trimmed = name.trim();
    POD_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map_or(trimmed, |(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact("core", "Core Platform")]
    #[case::uppercase("CORE", "Core Platform")]
    #[case::mixed_case("InFrA", "Infrastructure")]
    #[case::padded("  sre ", "Site Reliability")]
    #[case::passthrough("Payments Pod", "Payments Pod")]
    #[case::passthrough_trimmed("  Payments Pod ", "Payments Pod")]
    fn test_resolve_pod(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve_pod(input), expected);
    }
}
