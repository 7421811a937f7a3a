use bytes::Bytes;

pub const PDF_MIME: &str = "application/pdf";

/// Extensions the picker advertises, with the MIME type sent for each.
pub const ACCEPTED_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("pdf", PDF_MIME),
];

/// Resolve the MIME type for a file name from the allow-list.
///
/// Returns `None` for anything the picker would filter out.
pub fn mime_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    ACCEPTED_EXTENSIONS
        .iter()
        .find(|(accepted, _)| accepted.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// The user's chosen file. Replaced wholesale on every selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl SelectedDocument {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME
    }
}

#[cfg(test)]
mod tests {
    use super::{mime_type_for, SelectedDocument};

    #[test]
    fn allow_list_is_case_insensitive() {
        assert_eq!(mime_type_for("scan.PNG"), Some("image/png"));
        assert_eq!(mime_type_for("photo.Jpeg"), Some("image/jpeg"));
        assert_eq!(mime_type_for("report.pdf"), Some("application/pdf"));
        assert_eq!(mime_type_for("archive.tar.tiff"), Some("image/tiff"));
    }

    #[test]
    fn unsupported_files_are_filtered() {
        assert_eq!(mime_type_for("notes.txt"), None);
        assert_eq!(mime_type_for("image.webp"), None);
        assert_eq!(mime_type_for("no_extension"), None);
    }

    #[test]
    fn kind_follows_mime_type() {
        let image = SelectedDocument::new("a.png", "image/png", vec![1u8, 2, 3]);
        assert!(image.is_image());
        assert!(!image.is_pdf());
        assert_eq!(image.size(), 3);

        let pdf = SelectedDocument::new("a.pdf", "application/pdf", Vec::new());
        assert!(pdf.is_pdf());
        assert!(!pdf.is_image());
    }
}
