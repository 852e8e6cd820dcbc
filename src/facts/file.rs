use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{parse_response, FactsReply, FactsSource};

/// Reads the response envelope from disk on every fetch.
pub struct FileFactsSource {
    path: PathBuf,
}

impl FileFactsSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FactsSource for FileFactsSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<FactsReply> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        parse_response(&body).with_context(|| format!("parsing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_document() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"facts": {{"levels": {{"pdh": 1.0921}}}}}}"#).unwrap();
        let src = FileFactsSource::new(f.path());
        match src.fetch().await.unwrap() {
            FactsReply::Document(doc) => assert!(doc.section("levels").is_some()),
            other => panic!("expected document, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reread_sees_new_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, r#"{"message": "warming up"}"#).unwrap();
        let src = FileFactsSource::new(&path);
        assert_eq!(src.fetch().await.unwrap(), FactsReply::Empty("warming up".into()));

        std::fs::write(&path, r#"{"facts": {"sweeps": []}}"#).unwrap();
        assert!(matches!(src.fetch().await.unwrap(), FactsReply::Document(_)));
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let src = FileFactsSource::new("/nonexistent/facts.json");
        let err = src.fetch().await.unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/facts.json"));
    }

    #[tokio::test]
    async fn test_bundled_fixture_parses() {
        let src = FileFactsSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/facts_sample.json"));
        match src.fetch().await.unwrap() {
            FactsReply::Document(doc) => {
                let names: Vec<&str> = doc.sections().collect();
                assert_eq!(names, vec!["structure", "fvgs", "session", "levels", "sweeps"]);
            }
            other => panic!("expected document, got {:?}", other),
        }
    }
}
