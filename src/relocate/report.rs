//! Run bookkeeping.
//! A `RunReport` holds one outcome per requested item, in processing order, plus
//! byte totals. Each name can be recorded once; a second record is refused.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::RelocationItem;

/// Final state of one item in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Moved,
    Copied,
    /// Already at the destination; nothing done
    AlreadyPresent,
    NotFound,
    /// I/O error or invalid request; the run continued
    Failed(String),
    /// Dry-run: a move would happen
    WouldMove,
    /// Dry-run: a copy would happen
    WouldCopy,
}

impl ItemStatus {
    /// Short label used in the printed summary and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Moved => "moved",
            ItemStatus::Copied => "copied",
            ItemStatus::AlreadyPresent => "present",
            ItemStatus::NotFound => "missing",
            ItemStatus::Failed(_) => "FAILED",
            ItemStatus::WouldMove => "would move",
            ItemStatus::WouldCopy => "would copy",
        }
    }

    /// True when the item's source bytes count toward `total_bytes`.
    fn counts_toward_total(&self) -> bool {
        !matches!(self, ItemStatus::AlreadyPresent | ItemStatus::NotFound)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Failed(reason) => write!(f, "FAILED: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// One processed item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub item: RelocationItem,
    pub status: ItemStatus,
    /// Where the file is (or would be) after the run
    pub dest: Option<PathBuf>,
}

impl ItemOutcome {
    pub fn new(item: RelocationItem, status: ItemStatus, dest: Option<PathBuf>) -> Self {
        Self { item, status, dest }
    }

    /// More than one file with this name existed under the source root.
    pub fn is_ambiguous(&self) -> bool {
        self.item.candidates > 1
    }
}

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    outcomes: Vec<ItemOutcome>,
    seen: HashSet<String>,
    /// Sum of pre-transfer sizes of every resolved source file (moved, copied,
    /// would-be, or failed after resolution)
    pub total_bytes: u64,
    /// Sum of sizes of files found already at the destination
    pub present_bytes: u64,
    /// The run stopped early on an interrupt; later items were not processed
    pub interrupted: bool,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome. Returns false (and records nothing) if the name was
    /// already recorded in this run.
    pub fn record(&mut self, outcome: ItemOutcome) -> bool {
        if !self.seen.insert(outcome.item.name.clone()) {
            return false;
        }
        let size = outcome.item.size_bytes.unwrap_or(0);
        if outcome.status == ItemStatus::AlreadyPresent {
            self.present_bytes += size;
        } else if outcome.status.counts_toward_total() {
            self.total_bytes += size;
        }
        self.outcomes.push(outcome);
        true
    }

    /// Append another report's outcomes. Returns how many were refused because
    /// their name was already recorded; each refusal is logged.
    pub fn absorb(&mut self, other: RunReport) -> usize {
        self.interrupted |= other.interrupted;
        let mut refused = 0;
        for outcome in other.outcomes {
            let name = outcome.item.name.clone();
            if !self.record(outcome) {
                warn!(name = %name, "outcome for an already-reported name was not merged");
                refused += 1;
            }
        }
        refused
    }

    /// Re-key every outcome as `<prefix>/<name>`, so reports from runs into
    /// different destination subdirectories can be merged without collisions.
    pub fn qualified(self, prefix: &Path) -> RunReport {
        let prefix = prefix.to_string_lossy().replace('\\', "/");
        let prefix = prefix.trim_end_matches('/');
        let mut out = RunReport {
            interrupted: self.interrupted,
            ..RunReport::default()
        };
        for mut outcome in self.outcomes {
            if !prefix.is_empty() {
                outcome.item.name = format!("{prefix}/{}", outcome.item.name);
            }
            out.record(outcome);
        }
        out
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn status_of(&self, name: &str) -> Option<&ItemStatus> {
        self.outcomes
            .iter()
            .find(|o| o.item.name == name)
            .map(|o| &o.status)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn moved_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::Moved)
    }

    pub fn copied_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::Copied)
    }

    pub fn already_present_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::AlreadyPresent)
    }

    pub fn not_found_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::NotFound)
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Failed(_)))
    }

    pub fn would_move_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::WouldMove)
    }

    pub fn would_copy_count(&self) -> usize {
        self.count(|s| *s == ItemStatus::WouldCopy)
    }

    /// Items whose source was picked among several same-named files.
    pub fn ambiguous(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_ambiguous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, size: Option<u64>) -> RelocationItem {
        RelocationItem {
            size_bytes: size,
            ..RelocationItem::named(name)
        }
    }

    #[test]
    fn second_record_for_a_name_is_refused() {
        let mut r = RunReport::new();
        assert!(r.record(ItemOutcome::new(item("a", Some(3)), ItemStatus::Moved, None)));
        assert!(!r.record(ItemOutcome::new(item("a", Some(3)), ItemStatus::Failed("x".into()), None)));
        assert_eq!(r.len(), 1);
        assert_eq!(r.status_of("a"), Some(&ItemStatus::Moved));
        assert_eq!(r.total_bytes, 3);
    }

    #[test]
    fn byte_totals_split_present_from_resolved() {
        let mut r = RunReport::new();
        r.record(ItemOutcome::new(item("m", Some(500)), ItemStatus::Moved, None));
        r.record(ItemOutcome::new(item("p", Some(70)), ItemStatus::AlreadyPresent, None));
        r.record(ItemOutcome::new(item("n", None), ItemStatus::NotFound, None));
        r.record(ItemOutcome::new(item("w", Some(5)), ItemStatus::WouldCopy, None));
        assert_eq!(r.total_bytes, 505);
        assert_eq!(r.present_bytes, 70);
        assert_eq!(
            (r.moved_count(), r.already_present_count(), r.not_found_count(), r.would_copy_count()),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn absorb_keeps_order_and_interrupt_flag() {
        let mut a = RunReport::new();
        a.record(ItemOutcome::new(item("x", None), ItemStatus::NotFound, None));
        let mut b = RunReport::new();
        b.record(ItemOutcome::new(item("y", Some(1)), ItemStatus::Copied, None));
        b.interrupted = true;
        assert_eq!(a.absorb(b), 0);
        let names: Vec<_> = a.outcomes().iter().map(|o| o.item.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        assert!(a.interrupted);
        assert_eq!(a.copied_count(), 1);
    }

    #[test]
    fn same_name_from_two_groups_survives_merge_when_qualified() {
        let mut training = RunReport::new();
        training.record(ItemOutcome::new(item("dup.py", Some(5)), ItemStatus::Moved, None));
        let mut utilities = RunReport::new();
        utilities.record(ItemOutcome::new(item("dup.py", Some(7)), ItemStatus::Moved, None));

        let mut merged = RunReport::new();
        assert_eq!(merged.absorb(training.clone().qualified(Path::new("training"))), 0);
        assert_eq!(merged.absorb(utilities.clone().qualified(Path::new("utilities"))), 0);
        assert_eq!(merged.moved_count(), 2);
        assert_eq!(merged.total_bytes, 12);
        assert_eq!(merged.status_of("utilities/dup.py"), Some(&ItemStatus::Moved));

        // Unqualified merge reports the collision instead of hiding it
        let mut plain = RunReport::new();
        plain.absorb(training);
        assert_eq!(plain.absorb(utilities), 1);
    }

    #[test]
    fn failed_display_includes_reason() {
        assert_eq!(ItemStatus::Failed("disk full".into()).to_string(), "FAILED: disk full");
        assert_eq!(ItemStatus::WouldMove.to_string(), "would move");
    }
}
