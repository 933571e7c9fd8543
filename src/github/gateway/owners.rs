//! Octocrab implementation of the owners source.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::github::error::TrackerError;
use crate::github::models::ApiContent;

use super::OwnersSource;
use super::client::OctocrabTracker;
use super::error_mapping::{is_not_found, map_octocrab_error};

/// Name of the owners document at the repository root.
const OWNERS_FILE: &str = "OWNERS";

/// Locations of the label catalogue, in lookup order.
const LABEL_CATALOGUE_FILES: [&str; 2] = [".github/labels.yaml", ".github/labels.yml"];

#[async_trait]
impl OwnersSource for OctocrabTracker {
    async fn owners_file(&self) -> Result<Option<String>, TrackerError> {
        tracing::debug!("looking for an {OWNERS_FILE} file at the root of the repository");
        let found = self.repository_file(OWNERS_FILE).await?;
        if found.is_none() {
            tracing::debug!("no {OWNERS_FILE} file found");
        }
        Ok(found)
    }

    async fn label_catalogue(&self) -> Result<Option<String>, TrackerError> {
        for file in LABEL_CATALOGUE_FILES {
            if let Some(raw) = self.repository_file(file).await? {
                tracing::debug!(file, "found label catalogue");
                return Ok(Some(raw));
            }
        }
        tracing::debug!("no label catalogue found");
        Ok(None)
    }
}

impl OctocrabTracker {
    /// Reads a file from the default branch; a 404 is `None`.
    async fn repository_file(&self, file: &str) -> Result<Option<String>, TrackerError> {
        let content = match self
            .client
            .get::<ApiContent, _, _>(self.repository.contents_path(file), None::<&()>)
            .await
        {
            Ok(content) => content,
            Err(error) if is_not_found(&error) => return Ok(None),
            Err(error) => return Err(map_octocrab_error(&format!("fetch {file}"), &error)),
        };

        decode_content(file, &content).map(Some)
    }
}

pub(super) fn decode_content(file: &str, content: &ApiContent) -> Result<String, TrackerError> {
    let (Some(raw), Some(encoding)) = (content.content.as_deref(), content.encoding.as_deref())
    else {
        return Err(TrackerError::Decode {
            what: file.to_owned(),
            message: "response is missing content or encoding".to_owned(),
        });
    };

    if encoding != "base64" {
        return Err(TrackerError::Decode {
            what: file.to_owned(),
            message: format!("unsupported encoding `{encoding}`"),
        });
    }

    // GitHub wraps base64 content at 60 columns.
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|error| TrackerError::Decode {
            what: file.to_owned(),
            message: error.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|error| TrackerError::Decode {
        what: file.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::decode_content;
    use crate::github::error::TrackerError;
    use crate::github::models::ApiContent;

    #[rstest]
    fn decodes_wrapped_base64_content() {
        let content = ApiContent {
            // "approvers:\n- alice\n" split across lines as GitHub does.
            content: Some("YXBwcm92ZXJzOgot\nIGFsaWNlCg==\n".to_owned()),
            encoding: Some("base64".to_owned()),
        };

        assert_eq!(
            decode_content("OWNERS", &content).expect("content should decode"),
            "approvers:\n- alice\n"
        );
    }

    #[rstest]
    fn rejects_unknown_encodings() {
        let content = ApiContent {
            content: Some("approvers: []".to_owned()),
            encoding: Some("utf-8".to_owned()),
        };

        let result = decode_content(".github/labels.yaml", &content);
        assert!(
            matches!(&result, Err(TrackerError::Decode { what, .. }) if what == ".github/labels.yaml"),
            "expected Decode error naming the file, got {result:?}"
        );
    }
}
