#[derive(Clone, Copy, PartialEq, Eq)]
enum Change {
    Initial,
    Additive,
    Breaking,
}

// effect format history, oldest first. the last entry is the version new effects are written with.
const FORMAT_HISTORY: &[(&str, Change)] = &[
    ("0.1", Change::Initial),
    // easing and offset shapes became optional
    ("0.2", Change::Additive),
];

/// How an effect's `cinders_version` relates to the format this release writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    Current,
    /// Older, and every change since is additive. The effect loads as is.
    Outdated {
        found: String,
        current: &'static str,
    },
    /// Older, with a breaking change in between.
    Incompatible {
        found: String,
        current: &'static str,
    },
    /// Not a version this release knows about, usually one written by a newer release.
    Unknown,
}

/// Returns the format version new effects are written with.
pub fn current_format_version() -> &'static str {
    FORMAT_HISTORY
        .last()
        .map(|(version, _)| *version)
        .unwrap_or_default()
}

fn position(version: &str) -> Option<usize> {
    FORMAT_HISTORY.iter().position(|(known, _)| *known == version)
}

/// Returns `true` if `from` is older than `to` and only additive changes separate them.
pub fn can_auto_upgrade(from: &str, to: &str) -> bool {
    match (position(from), position(to)) {
        (Some(from), Some(to)) if from < to => FORMAT_HISTORY[from + 1..=to]
            .iter()
            .all(|(_, change)| *change != Change::Breaking),
        _ => false,
    }
}

/// Classifies `version` against [`current_format_version`].
pub fn validate_version(version: &str) -> VersionStatus {
    let current = current_format_version();
    let found = version.to_string();
    match position(version) {
        None => VersionStatus::Unknown,
        Some(_) if version == current => VersionStatus::Current,
        Some(_) if can_auto_upgrade(version, current) => VersionStatus::Outdated { found, current },
        Some(_) => VersionStatus::Incompatible { found, current },
    }
}
