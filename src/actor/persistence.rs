//! Workspace-restore snapshot (§4.9, ambient). Written off the Core's
//! thread via `spawn_blocking` so a slow disk never stalls event handling;
//! assembled synchronously first so the snapshot reflects a single
//! consistent instant.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};
use crate::model::workspace_store::{MonitorId, WorkspaceNumber, WorkspaceStore};

pub const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub app_name: Option<String>,
    pub bundle_id: Option<String>,
    pub window_title: String,
    pub workspace: WorkspaceNumber,
    pub monitor: MonitorId,
    pub is_floating: bool,
    pub is_fullscreen: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub written_at_unix_secs: u64,
    pub active_workspace: Vec<(MonitorId, WorkspaceNumber)>,
    pub entries: Vec<SnapshotEntry>,
}

pub fn snapshot_path(base_dir: &Path) -> PathBuf { base_dir.join("workspace-restore.ron") }

pub fn now_unix_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

pub fn is_stale(snapshot: &Snapshot, now_unix_secs: u64) -> bool {
    now_unix_secs.saturating_sub(snapshot.written_at_unix_secs) > STALE_AFTER.as_secs()
}

pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let text = ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())
        .map_err(|e| Error::InvariantViolated(format!("snapshot encode failed: {e}")))?;
    std::fs::write(path, text).map_err(|e| Error::InvariantViolated(format!("snapshot write failed: {e}")))
}

pub fn load(path: &Path) -> Result<Option<Snapshot>> {
    match std::fs::read_to_string(path) {
        Ok(text) => ron::from_str(&text)
            .map(Some)
            .map_err(|e| Error::InvariantViolated(format!("snapshot decode failed: {e}"))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::InvariantViolated(format!("snapshot read failed: {e}"))),
    }
}

/// Assembles the restore snapshot synchronously on the action queue, before
/// the actual file write is handed off to `spawn_blocking` (§4.9, §5).
pub fn assemble_snapshot(store: &WorkspaceStore) -> Snapshot {
    let mut entries = Vec::new();
    for (monitor, workspaces) in &store.per_monitor {
        for (&n, ws) in workspaces {
            for tracked in ws.tracked.values() {
                entries.push(SnapshotEntry {
                    app_name: tracked.app_name.clone(),
                    bundle_id: tracked.bundle_id.clone(),
                    window_title: tracked.title.clone(),
                    workspace: n,
                    monitor: monitor.clone(),
                    is_floating: tracked.is_floating,
                    is_fullscreen: ws.fullscreen.contains(&tracked.window_id),
                });
            }
        }
    }
    Snapshot {
        written_at_unix_secs: now_unix_secs(),
        active_workspace: store.active_workspace.iter().map(|(m, &n)| (m.clone(), n)).collect(),
        entries,
    }
}

fn word_set(title: &str) -> HashSet<String> {
    title.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Jaccard similarity between the word sets of two window titles.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let sa = word_set(a);
    let sb = word_set(b);
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let intersection = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    if union == 0 { 0.0 } else { intersection as f64 / union as f64 }
}

pub const JACCARD_MATCH_THRESHOLD: f64 = 0.5;

/// A currently-open window eligible to be matched against a snapshot entry.
#[derive(Debug, Clone)]
pub struct OpenWindow<W> {
    pub id: W,
    pub app_name: Option<String>,
    pub bundle_id: Option<String>,
    pub title: String,
}

/// Matches snapshot entries against currently-open windows, in the fallback
/// order from §4.9: exact app identity + exact title, then app identity +
/// best Jaccard match above the threshold, then app identity alone (first
/// unmatched window of that app). Each open window is matched at most once.
/// App identity is bundle id when both sides have one, falling back to app
/// name so windows from apps without a bundle id can still be restored.
pub fn match_entries<W: Copy + Eq>(
    entries: &[SnapshotEntry],
    open: &[OpenWindow<W>],
) -> Vec<(usize, W)> {
    let mut matched = HashSet::new();
    let mut result = Vec::new();

    let same_app = |entry: &SnapshotEntry, w: &OpenWindow<W>| {
        if entry.bundle_id.is_some() || w.bundle_id.is_some() {
            entry.bundle_id == w.bundle_id
        } else {
            entry.app_name.is_some() && entry.app_name == w.app_name
        }
    };

    for (i, entry) in entries.iter().enumerate() {
        let candidates: Vec<&OpenWindow<W>> =
            open.iter().filter(|w| same_app(entry, w) && !matched.contains(&w.id)).collect();
        if candidates.is_empty() {
            continue;
        }

        if let Some(w) = candidates.iter().find(|w| w.title == entry.window_title) {
            matched.insert(w.id);
            result.push((i, w.id));
            continue;
        }

        let best = candidates
            .iter()
            .map(|w| (jaccard_similarity(&w.title, &entry.window_title), w.id))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((score, id)) = best {
            if score >= JACCARD_MATCH_THRESHOLD {
                matched.insert(id);
                result.push((i, id));
                continue;
            }
        }

        let first = candidates[0];
        matched.insert(first.id);
        result.push((i, first.id));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, bundle: &str) -> SnapshotEntry {
        SnapshotEntry {
            app_name: None,
            bundle_id: Some(bundle.into()),
            window_title: title.into(),
            workspace: 1,
            monitor: MonitorId("main".into()),
            is_floating: false,
            is_fullscreen: false,
        }
    }

    fn open(id: u32, title: &str, bundle: &str) -> OpenWindow<u32> {
        OpenWindow { id, app_name: None, bundle_id: Some(bundle.into()), title: title.into() }
    }

    #[test]
    fn exact_title_match_wins_first() {
        let entries = vec![entry("main.rs — editor", "com.editor")];
        let open_windows = vec![open(1, "other.rs — editor", "com.editor"), open(2, "main.rs — editor", "com.editor")];
        let result = match_entries(&entries, &open_windows);
        assert_eq!(result, vec![(0, 2)]);
    }

    #[test]
    fn jaccard_match_used_when_no_exact_title() {
        let entries = vec![entry("project main.rs — editor", "com.editor")];
        let open_windows = vec![open(1, "project main.rs — editor (modified)", "com.editor")];
        let result = match_entries(&entries, &open_windows);
        assert_eq!(result, vec![(0, 1)]);
    }

    #[test]
    fn falls_back_to_app_only_match_below_threshold() {
        let entries = vec![entry("completely different unrelated words", "com.editor")];
        let open_windows = vec![open(1, "totally other document here", "com.editor")];
        let result = match_entries(&entries, &open_windows);
        assert_eq!(result, vec![(0, 1)]);
    }

    #[test]
    fn no_match_for_a_different_bundle_id() {
        let entries = vec![entry("doc", "com.editor")];
        let open_windows = vec![open(1, "doc", "com.other")];
        assert!(match_entries(&entries, &open_windows).is_empty());
    }

    #[test]
    fn falls_back_to_app_name_when_neither_side_has_a_bundle_id() {
        let entry = SnapshotEntry {
            app_name: Some("Terminal".into()),
            bundle_id: None,
            window_title: "zsh".into(),
            workspace: 1,
            monitor: MonitorId("main".into()),
            is_floating: false,
            is_fullscreen: false,
        };
        let open_window = OpenWindow { id: 1u32, app_name: Some("Terminal".into()), bundle_id: None, title: "zsh".into() };
        assert_eq!(match_entries(&[entry], &[open_window]), vec![(0, 1)]);
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let snapshot = Snapshot { written_at_unix_secs: 1000, active_workspace: vec![], entries: vec![] };
        assert!(is_stale(&snapshot, 1000 + STALE_AFTER.as_secs() + 1));
        assert!(!is_stale(&snapshot, 1000 + 10));
    }
}
