//! Document decoding: PDF/DOCX/TXT bytes to newline-joined plain text. This
//! is the thin collaborator in front of the extraction core — anything it
//! cannot decode is a fatal per-document error before extraction starts.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;

/// Decodes an uploaded document into plain text based on its file extension.
pub fn decode_document(file_name: &str, data: &[u8]) -> Result<String, AppError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| AppError::UnsupportedFormat(format!("could not read PDF '{file_name}': {e}"))),
        "docx" => extract_docx_text(data)
            .map_err(|e| AppError::UnsupportedFormat(format!("could not read DOCX '{file_name}': {e}"))),
        "txt" => Ok(String::from_utf8_lossy(data).into_owned()),
        other if other.is_empty() => Err(AppError::UnsupportedFormat(format!(
            "'{file_name}' has no file extension; expected .pdf, .docx or .txt"
        ))),
        other => Err(AppError::UnsupportedFormat(format!(
            "'.{other}' files are not supported; expected .pdf, .docx or .txt"
        ))),
    }
}

/// DOCX is a zip archive; the document body lives in word/document.xml with
/// one `w:p` element per visual paragraph.
fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_passthrough() {
        let text = decode_document("resume.txt", "Nguyen Van An\nData Engineer".as_bytes()).unwrap();
        assert!(text.contains("Nguyen Van An"));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = decode_document("resume.odt", b"data").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = decode_document("resume", b"data").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let text = decode_document("RESUME.TXT", b"hello").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_corrupt_docx_is_unsupported() {
        let err = decode_document("resume.docx", b"not a zip archive").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }
}
