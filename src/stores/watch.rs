//! Live record watches: change classification and the cancellable handle.
//!
//! A watch turns the backend's raw snapshot stream into a sequence of
//! [`RecordChange`] events. Two kinds of snapshots are suppressed: echoes
//! of this client's own unacknowledged writes (pending flag), and
//! notifications whose post-image equals the last acknowledged state.

use crate::storage::DocumentSnapshot;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An observed remote change to a watched record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordChange {
    /// The document now has this post-image.
    Modified(Value),
    /// The document was deleted remotely.
    Removed,
}

/// Classify one snapshot against the last acknowledged baseline.
///
/// Returns `None` for pending local-write echoes and for snapshots that do
/// not change anything observable.
pub fn classify_change(
    baseline: &Option<Value>,
    snapshot: &DocumentSnapshot,
) -> Option<RecordChange> {
    if snapshot.has_pending_writes {
        return None;
    }
    match &snapshot.data {
        None => baseline.is_some().then_some(RecordChange::Removed),
        Some(data) => {
            (baseline.as_ref() != Some(data)).then(|| RecordChange::Modified(data.clone()))
        }
    }
}

/// Handle on a live record subscription.
///
/// [`cancel`](Self::cancel) is the sole teardown: the subscription is never
/// cancelled on the caller's behalf, so whoever opens a watch owns its
/// lifetime.
pub struct RecordWatch {
    rx: mpsc::Receiver<RecordChange>,
    task: JoinHandle<()>,
}

impl RecordWatch {
    pub(crate) fn new(rx: mpsc::Receiver<RecordChange>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// Next observed change, or `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<RecordChange> {
        self.rx.recv().await
    }

    /// Stop watching. Pending undelivered events are dropped.
    pub fn cancel(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_writes_are_suppressed() {
        let baseline = Some(json!({"name": "Rex"}));
        let echo = DocumentSnapshot::pending(Some(json!({"name": "Rexo"})));
        assert_eq!(classify_change(&baseline, &echo), None);
    }

    #[test]
    fn test_unchanged_post_image_is_suppressed() {
        let baseline = Some(json!({"name": "Rex"}));
        let same = DocumentSnapshot::settled(Some(json!({"name": "Rex"})));
        assert_eq!(classify_change(&baseline, &same), None);
    }

    #[test]
    fn test_changed_post_image_is_modified() {
        let baseline = Some(json!({"name": "Rex"}));
        let changed = DocumentSnapshot::settled(Some(json!({"name": "Rexo"})));
        assert_eq!(
            classify_change(&baseline, &changed),
            Some(RecordChange::Modified(json!({"name": "Rexo"})))
        );
    }

    #[test]
    fn test_deletion_is_removed() {
        let baseline = Some(json!({"name": "Rex"}));
        let gone = DocumentSnapshot::settled(None);
        assert_eq!(classify_change(&baseline, &gone), Some(RecordChange::Removed));
    }

    #[test]
    fn test_deletion_of_absent_document_is_silent() {
        let gone = DocumentSnapshot::settled(None);
        assert_eq!(classify_change(&None, &gone), None);
    }

    #[test]
    fn test_first_appearance_is_modified() {
        let appeared = DocumentSnapshot::settled(Some(json!({"name": "Mia"})));
        assert_eq!(
            classify_change(&None, &appeared),
            Some(RecordChange::Modified(json!({"name": "Mia"})))
        );
    }
}
