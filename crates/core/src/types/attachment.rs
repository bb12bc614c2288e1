//! Metadata for files picked in upload fields.

use serde::{Deserialize, Serialize};

/// An uploaded file as far as the booking flow cares: its name, type and
/// size. File contents are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl Attachment {
    /// Largest accepted upload, in bytes (10 MiB).
    pub const MAX_SIZE: u64 = 10 * 1024 * 1024;

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Size rounded up to whole kilobytes, for display.
    #[must_use]
    pub const fn size_kb(&self) -> u64 {
        self.size.div_ceil(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str, size: u64) -> Attachment {
        Attachment {
            file_name: "sofa.jpg".to_owned(),
            content_type: content_type.to_owned(),
            size,
        }
    }

    #[test]
    fn test_is_image() {
        assert!(file("image/jpeg", 10).is_image());
        assert!(!file("application/pdf", 10).is_image());
    }

    #[test]
    fn test_size_kb_rounds_up() {
        assert_eq!(file("image/png", 0).size_kb(), 0);
        assert_eq!(file("image/png", 1).size_kb(), 1);
        assert_eq!(file("image/png", 2048).size_kb(), 2);
    }
}
