//! File attachments: declared media type and conversion to request content.
//!
//! Only images and plain text are analysed. Everything else the picker
//! accepts (pdf, doc, docx) is rejected with `UnsupportedMediaKind`.

use std::path::Path;

use base64::Engine as _;

use crate::{AiError, ContentPart};

/// Instruction sent alongside an image attachment.
pub const IMAGE_PROMPT: &str = "Please analyze this image and describe what you see.";

/// Attachment payloads larger than this are refused before reading.
pub const MAX_ATTACHMENT_SIZE: u64 = 20 * 1024 * 1024;

/// A file picked for analysis.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// What kind of analysis request an attachment turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Text,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, AiError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| AiError::Io(format!("{}: {e}", path.display())))?;
        if !metadata.is_file() {
            return Err(AiError::Io(format!("{}: not a regular file", path.display())));
        }
        if metadata.len() > MAX_ATTACHMENT_SIZE {
            return Err(AiError::Io(format!(
                "{}: file too large (max {} MB)",
                path.display(),
                MAX_ATTACHMENT_SIZE / (1024 * 1024)
            )));
        }

        let bytes =
            std::fs::read(path).map_err(|e| AiError::Io(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name.clone(), media_type_for(&file_name), bytes))
    }

    /// Classify by declared media type.
    pub fn kind(&self) -> Result<AttachmentKind, AiError> {
        if self.media_type.starts_with("image/") {
            Ok(AttachmentKind::Image)
        } else if self.media_type == "text/plain" {
            Ok(AttachmentKind::Text)
        } else {
            Err(AiError::UnsupportedMediaKind(self.media_type.clone()))
        }
    }

    /// Build the user content parts for an analysis request.
    pub fn to_content(&self) -> Result<Vec<ContentPart>, AiError> {
        match self.kind()? {
            AttachmentKind::Image => Ok(vec![
                ContentPart::text(IMAGE_PROMPT),
                ContentPart::Image {
                    mime_type: self.media_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(&self.bytes),
                },
            ]),
            AttachmentKind::Text => {
                let text = String::from_utf8_lossy(&self.bytes);
                Ok(vec![ContentPart::text(format!(
                    "Please analyze this text file ({}):\n\n{text}",
                    self.file_name
                ))])
            }
        }
    }
}

/// Declared media type for a file name, by extension.
pub fn media_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" | "text" | "log" | "md" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
