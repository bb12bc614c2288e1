//! Multipart form reading.
//!
//! The booking steps and company registration post `multipart/form-data`
//! so that files and repeated checkbox names arrive intact. Uploaded bytes
//! are counted and dropped; only the file metadata is kept.

use std::collections::HashMap;

use axum::extract::Multipart;
use naqlah_core::Attachment;

use crate::error::Result;

/// Text fields and file metadata from one multipart body.
#[derive(Debug, Default)]
pub struct FormData {
    text: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<Attachment>>,
}

impl FormData {
    /// Drain a multipart body.
    ///
    /// # Errors
    ///
    /// Returns an upload error if the body is malformed or too large.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_owned();
                    let size = field.bytes().await?.len() as u64;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && size == 0 {
                        continue;
                    }
                    form.push_file(
                        name,
                        Attachment {
                            file_name,
                            content_type,
                            size,
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.push_text(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.entry(name.into()).or_default().push(value.into());
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: Attachment) {
        self.files.entry(name.into()).or_default().push(file);
    }

    /// First value of a text field, trimmed. Missing fields read as empty.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.text
            .get(name)
            .and_then(|values| values.first())
            .map_or("", |v| v.trim())
    }

    /// First value of a text field, `None` when missing or blank.
    #[must_use]
    pub fn opt(&self, name: &str) -> Option<&str> {
        Some(self.text(name)).filter(|v| !v.is_empty())
    }

    /// Every value posted under a name, e.g. ticked checkboxes.
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.text
            .get(name)
            .map(|values| values.iter().map(|v| v.trim()).collect())
            .unwrap_or_default()
    }

    /// Files posted under a name.
    #[must_use]
    pub fn files(&self, name: &str) -> Vec<Attachment> {
        self.files.get(name).cloned().unwrap_or_default()
    }

    /// The first file posted under a name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<Attachment> {
        self.files.get(name).and_then(|files| files.first()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_access() {
        let mut form = FormData::default();
        form.push_text("city", "  الرياض ");
        form.push_text("services", "moving");
        form.push_text("services", "packing");
        form.push_text("blank", "   ");

        assert_eq!(form.text("city"), "الرياض");
        assert_eq!(form.text("missing"), "");
        assert_eq!(form.opt("blank"), None);
        assert_eq!(form.all("services"), vec!["moving", "packing"]);
        assert!(form.all("missing").is_empty());
    }

    #[test]
    fn test_file_access() {
        let mut form = FormData::default();
        form.push_file(
            "photos",
            Attachment {
                file_name: "a.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                size: 10,
            },
        );
        assert_eq!(form.files("photos").len(), 1);
        assert_eq!(form.file("photos").map(|f| f.file_name), Some("a.jpg".to_owned()));
        assert!(form.file("logo").is_none());
    }
}
