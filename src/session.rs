//! Session descriptor loading
//!
//! The descriptor is a small XML document whose top-level child elements map
//! directly to string fields. It is read once at startup and never reloaded.

use std::collections::HashMap;

use tokio::fs;

use crate::errors::SessionError;

#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    pub id: String,
    /// All top-level fields, tag name to text, including `id`
    pub fields: HashMap<String, String>,
}

impl SessionDescriptor {
    pub async fn load(path: &str) -> Result<Self, SessionError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| SessionError::ReadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &str, text: &str) -> Result<Self, SessionError> {
        let document = roxmltree::Document::parse(text).map_err(|e| SessionError::ParseFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let mut fields = HashMap::new();
        for child in document.root_element().children() {
            if !child.is_element() {
                continue;
            }
            let tag = child.tag_name().name().to_string();
            let value = child.text().unwrap_or_default().to_string();
            fields.insert(tag, value);
        }

        let id = fields
            .get("id")
            .filter(|id| !id.is_empty())
            .cloned()
            .ok_or_else(|| SessionError::MissingId {
                path: path.to_string(),
            })?;

        Ok(Self { id, fields })
    }
}
