//! `ResponsesApi` backed by two JSON files in the data directory.
//!
//! ```text
//! <data_dir>/sections.json   { "<assessment>": [SectionNode, ...] }
//! <data_dir>/responses.json  { "<assessment>": [StoredResponse, ...] }
//! ```
//!
//! A missing `responses.json` reads as empty. Writes go to a temp file in
//! the same directory and are renamed into place.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use qms_core::{ResponseUpsert, SectionNode, SectionTree, StoredResponse};
use qms_sync::{ApiError, ResponsesApi, SaveFailure};
use serde::Serialize;
use serde::de::DeserializeOwned;

const SECTIONS_FILE: &str = "sections.json";
const RESPONSES_FILE: &str = "responses.json";

type SectionsFile = BTreeMap<String, Vec<SectionNode>>;
type ResponsesFile = BTreeMap<String, Vec<StoredResponse>>;

pub struct JsonFileApi {
    data_dir: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileApi {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    async fn read_sections(&self) -> anyhow::Result<SectionsFile> {
        read_json(&self.path(SECTIONS_FILE))
            .await?
            .with_context(|| format!("no {SECTIONS_FILE} in {}", self.data_dir.display()))
    }

    async fn read_responses(&self) -> anyhow::Result<ResponsesFile> {
        Ok(read_json(&self.path(RESPONSES_FILE)).await?.unwrap_or_default())
    }

    /// Leaf ids an upsert may assign responses to.
    async fn leaf_ids(&self, assessment_id: &str) -> anyhow::Result<HashSet<String>> {
        let roots = self
            .read_sections()
            .await?
            .remove(assessment_id)
            .unwrap_or_default();
        let tree = SectionTree::new(roots)?;
        Ok(tree.leaves().map(|leaf| leaf.id.clone()).collect())
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    file.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Next free `rsp-<n>` id across every assessment in the file.
fn next_response_id(file: &ResponsesFile) -> u64 {
    file.values()
        .flatten()
        .filter_map(|record| record.id.strip_prefix("rsp-")?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

fn merge_upserts(file: &mut ResponsesFile, assessment_id: &str, upserts: Vec<ResponseUpsert>) {
    let mut next_id = next_response_id(file);
    let records = file.entry(assessment_id.to_string()).or_default();
    for upsert in upserts {
        if let Some(existing) = records
            .iter_mut()
            .find(|record| record.question_id == upsert.question_id)
        {
            existing.score = upsert.score;
            existing.justification = upsert.justification;
            existing.section_id = upsert.section_id;
            existing.is_draft = upsert.is_draft;
            continue;
        }
        records.push(StoredResponse {
            id: format!("rsp-{next_id}"),
            question_id: upsert.question_id,
            score: upsert.score,
            justification: upsert.justification,
            section_id: upsert.section_id,
            is_draft: upsert.is_draft,
        });
        next_id += 1;
    }
}

#[async_trait]
impl ResponsesApi for JsonFileApi {
    async fn fetch_responses(&self, assessment_id: &str) -> Result<Vec<StoredResponse>, ApiError> {
        let mut file = self.read_responses().await?;
        Ok(file.remove(assessment_id).unwrap_or_default())
    }

    async fn bulk_upsert_responses(
        &self,
        assessment_id: &str,
        responses: Vec<ResponseUpsert>,
    ) -> Result<(), SaveFailure> {
        let _guard = self.write_lock.lock().await;

        let leaves = self
            .leaf_ids(assessment_id)
            .await
            .map_err(|error| SaveFailure::transient(format!("{error:#}")))?;
        if let Some(stray) = responses.iter().find(|response| {
            response
                .section_id
                .as_ref()
                .is_some_and(|section| !leaves.contains(section))
        }) {
            return Err(SaveFailure::rejected(format!(
                "question {} references unknown section {}",
                stray.question_id,
                stray.section_id.as_deref().unwrap_or_default()
            )));
        }

        let mut file = self
            .read_responses()
            .await
            .map_err(|error| SaveFailure::transient(format!("{error:#}")))?;
        let count = responses.len();
        merge_upserts(&mut file, assessment_id, responses);
        write_json_atomic(&self.path(RESPONSES_FILE), &file)
            .map_err(|error| SaveFailure::transient(format!("{error:#}")))?;

        tracing::debug!(assessment = %assessment_id, count, "responses written");
        Ok(())
    }

    async fn fetch_section_tree(&self, assessment_id: &str) -> Result<Vec<SectionNode>, ApiError> {
        let mut file = self.read_sections().await?;
        file.remove(assessment_id)
            .ok_or_else(|| ApiError::NotFound(assessment_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use qms_core::{SaveFailureKind, Score};
    use serde_json::json;

    use super::*;

    fn write_sections(dir: &Path) {
        let sections = json!({
            "asm-1": [{
                "id": "s4",
                "sectionNumber": "4",
                "title": "Context",
                "children": [
                    { "id": "s4-1", "sectionNumber": "4.1", "title": "Organization", "questionCount": 2 }
                ]
            }]
        });
        std::fs::write(dir.join(SECTIONS_FILE), sections.to_string()).unwrap();
    }

    fn upsert(question: &str, section: &str, score: Score) -> ResponseUpsert {
        ResponseUpsert {
            question_id: question.into(),
            score: Some(score),
            justification: String::new(),
            section_id: Some(section.into()),
            is_draft: true,
        }
    }

    #[tokio::test]
    async fn missing_responses_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_sections(dir.path());
        let api = JsonFileApi::new(dir.path());

        assert!(api.fetch_responses("asm-1").await.unwrap().is_empty());
        assert_eq!(api.fetch_section_tree("asm-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_assessment_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_sections(dir.path());
        let api = JsonFileApi::new(dir.path());

        assert!(matches!(
            api.fetch_section_tree("asm-404").await,
            Err(ApiError::NotFound(id)) if id == "asm-404"
        ));
    }

    #[tokio::test]
    async fn missing_sections_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let api = JsonFileApi::new(dir.path());
        assert!(matches!(
            api.fetch_section_tree("asm-1").await,
            Err(ApiError::Other(_))
        ));
    }

    #[tokio::test]
    async fn upsert_inserts_then_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        write_sections(dir.path());
        let api = JsonFileApi::new(dir.path());

        api.bulk_upsert_responses("asm-1", vec![upsert("q1", "s4-1", Score::One)])
            .await
            .unwrap();
        api.bulk_upsert_responses(
            "asm-1",
            vec![upsert("q1", "s4-1", Score::Three), upsert("q2", "s4-1", Score::Two)],
        )
        .await
        .unwrap();

        let stored = api.fetch_responses("asm-1").await.unwrap();
        let summary: Vec<(&str, &str, Option<Score>)> = stored
            .iter()
            .map(|record| (record.id.as_str(), record.question_id.as_str(), record.score))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("rsp-1", "q1", Some(Score::Three)),
                ("rsp-2", "q2", Some(Score::Two)),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_section_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        write_sections(dir.path());
        let api = JsonFileApi::new(dir.path());

        let failure = api
            .bulk_upsert_responses("asm-1", vec![upsert("q1", "s4", Score::One)])
            .await
            .unwrap_err();
        assert_eq!(failure.kind, SaveFailureKind::Rejected);
        assert!(failure.message.contains("unknown section s4"));
        assert!(!dir.path().join(RESPONSES_FILE).exists());
    }

    #[test]
    fn response_ids_continue_after_highest() {
        let mut file = ResponsesFile::new();
        file.insert(
            "other".into(),
            vec![StoredResponse {
                id: "rsp-7".into(),
                question_id: "q0".into(),
                score: None,
                justification: String::new(),
                section_id: None,
                is_draft: false,
            }],
        );
        merge_upserts(&mut file, "asm-1", vec![upsert("q1", "s4-1", Score::One)]);
        assert_eq!(file["asm-1"][0].id, "rsp-8");
    }
}
