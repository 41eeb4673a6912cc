//! Append-only audit trail of moderator decisions.

use crate::content::{ContentId, ModerationAction};

/// Ordered log of moderation actions. Entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct ModerationLog {
    entries: Vec<ModerationAction>,
}

impl ModerationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a log from persisted entries, oldest first.
    pub fn from_entries(entries: Vec<ModerationAction>) -> Self {
        Self { entries }
    }

    /// Appends an entry.
    pub fn append(&mut self, action: ModerationAction) {
        self.entries.push(action);
    }

    /// All entries for one content record, oldest first.
    pub fn for_content(&self, content_id: &ContentId) -> Vec<ModerationAction> {
        self.entries
            .iter()
            .filter(|a| &a.content_id == content_id)
            .cloned()
            .collect()
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<ModerationAction> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[ModerationAction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentStatus, ModeratorDecision};
    use chrono::Utc;

    fn action(id: &str, decision: ModeratorDecision) -> ModerationAction {
        ModerationAction {
            content_id: ContentId::from(id),
            action: decision,
            notes: None,
            moderator: "mod".to_string(),
            resulting_status: decision.resulting_status(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn filters_by_content() {
        let mut log = ModerationLog::new();
        log.append(action("a", ModeratorDecision::Approve));
        log.append(action("b", ModeratorDecision::Block));
        log.append(action("a", ModeratorDecision::Block));

        let for_a = log.for_content(&ContentId::from("a"));
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].action, ModeratorDecision::Approve);
        assert_eq!(for_a[1].resulting_status, ContentStatus::Harmful);
        assert!(log.for_content(&ContentId::from("zzz")).is_empty());
    }

    #[test]
    fn recent_is_newest_first() {
        let mut log = ModerationLog::new();
        log.append(action("a", ModeratorDecision::Approve));
        log.append(action("b", ModeratorDecision::Edit));
        log.append(action("c", ModeratorDecision::Block));

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content_id.as_str(), "c");
        assert_eq!(recent[1].content_id.as_str(), "b");
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn restored_log_keeps_order() {
        let log = ModerationLog::from_entries(vec![
            action("a", ModeratorDecision::Approve),
            action("b", ModeratorDecision::Edit),
        ]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].content_id.as_str(), "a");
    }
}
