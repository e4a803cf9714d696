use serde::{Deserialize, Deserializer, Serialize};

/// Per-language generation progress, persisted as `progress.json`.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub in_progress: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    Pending,
    InProgress,
    Completed,
}

impl ProgressRecord {
    pub fn status(&self, id: &str) -> ChapterStatus {
        if self.is_completed(id) {
            ChapterStatus::Completed
        } else if self.in_progress.as_deref() == Some(id) {
            ChapterStatus::InProgress
        } else {
            ChapterStatus::Pending
        }
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    pub fn mark_in_progress(&mut self, id: &str) {
        self.in_progress = Some(id.to_string());
    }

    pub fn clear_in_progress(&mut self) {
        self.in_progress = None;
    }

    pub fn mark_completed(&mut self, id: &str) {
        if !self.is_completed(id) {
            self.completed.push(id.to_string());
        }
        if self.in_progress.as_deref() == Some(id) {
            self.in_progress = None;
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// One planned figure. `kind` is `type` on the wire.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct IllustrationEntry {
    #[serde(default = "default_chapter")]
    pub chapter: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title_en: String,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub description: String,
    pub prompt: String,
}

fn default_chapter() -> String {
    "misc".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_roundtrip_shape() {
        let mut record = ProgressRecord::default();
        record.mark_in_progress("00_introduction");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"completed":[],"in_progress":"00_introduction"}"#);
    }

    #[test]
    fn test_empty_in_progress_reads_as_none() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"completed": ["a"], "in_progress": ""}"#).unwrap();
        assert_eq!(record.in_progress, None);

        let record: ProgressRecord = serde_json::from_str(r#"{"completed": ["a"]}"#).unwrap();
        assert_eq!(record.in_progress, None);
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let mut record = ProgressRecord::default();
        record.mark_in_progress("a");
        assert_eq!(record.status("a"), ChapterStatus::InProgress);

        record.mark_completed("a");
        record.mark_completed("a");
        assert_eq!(record.completed, vec!["a".to_string()]);
        assert_eq!(record.in_progress, None);
        assert_eq!(record.status("a"), ChapterStatus::Completed);
        assert_eq!(record.status("b"), ChapterStatus::Pending);
    }

    #[test]
    fn test_illustration_entry_wire_names() {
        let json = r#"{"chapter": "ch01", "type": "flowchart", "title_en": "T", "title_ar": "ع", "description": "d", "prompt": "p"}"#;
        let entry: IllustrationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, "flowchart");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["type"], "flowchart");
    }
}
