//! Resume text extraction: PDF on disk → normalized plain text, plus the
//! file-name helpers the upload path needs.

use std::path::Path;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read PDF '{file}': {message}")]
    Pdf { file: String, message: String },

    #[error("PDF parser crashed on '{file}'")]
    Panicked { file: String },
}

/// Extracts the text of every page and normalizes it with [`clean_text`].
/// Malformed documents are reported, not repaired.
pub fn extract_text_from_pdf(path: &Path) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf {
        file: display_name(path),
        message: e.to_string(),
    })?;
    Ok(clean_text(&text))
}

/// Collapses whitespace runs to one space, then replaces non-ASCII runs with one space,
/// then trims. The order is observable: `"a \u{2014} b"` becomes `"a   b"`.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    let mut in_non_ascii = false;
    for c in collapsed.chars() {
        if c.is_ascii() {
            out.push(c);
            in_non_ascii = false;
        } else if !in_non_ascii {
            out.push(' ');
            in_non_ascii = true;
        }
    }

    out.trim().to_string()
}

/// Only `.pdf` uploads (any case) are accepted.
pub fn allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Reduces a client-supplied file name to a safe ASCII basename.
/// Accented letters keep their base letter: `résumé.pdf` → `resume.pdf`.
pub fn secure_filename(file_name: &str) -> String {
    let ascii: String = file_name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Display name for a candidate derived from their resume file name:
/// `john_doe-resume.pdf` → `John Doe Resume`.
pub fn candidate_name(file_name: &str) -> String {
    let base = file_name.replace(".pdf", "").replace(['_', '-'], " ");
    title_case(&base)
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
