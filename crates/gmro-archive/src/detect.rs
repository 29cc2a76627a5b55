use std::path::{Path, PathBuf};

const ZIP_MIME_TYPES: &[&str] = &["application/zip", "application/x-zip-compressed"];

/// Directory name used when the attachment name has no usable stem.
pub const FALLBACK_EXTRACTION_DIR: &str = "attachment";

/// Whether a downloaded attachment should be treated as a zip archive, judging
/// by its file name or its declared MIME type.
pub fn is_zip_attachment(filename: &str, mime_type: &str) -> bool {
    let by_extension = Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    by_extension || ZIP_MIME_TYPES.contains(&mime_type)
}

/// Whether `data` starts with a zip local file header, or is an empty archive
/// consisting only of the end-of-central-directory record.
pub fn has_zip_signature(data: &[u8]) -> bool {
    matches!(data, [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..])
}

/// Directory an attachment is unpacked into: `report.zip` saved under
/// `output_dir` unpacks into `output_dir/report`.
///
/// Only the final component of `filename` is used, so a sender-supplied name
/// like `../../x.zip` still lands directly under `output_dir`. Names without a
/// stem (`..`, `/`, empty) or whose stem is a dotfile (`.zip`) unpack into
/// [`FALLBACK_EXTRACTION_DIR`] instead, so the result is never `output_dir`
/// itself nor the saved attachment's own path.
pub fn extraction_dir(output_dir: impl AsRef<Path>, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
        .unwrap_or(FALLBACK_EXTRACTION_DIR);
    output_dir.as_ref().join(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_by_extension() {
        assert!(is_zip_attachment("archive.zip", "application/octet-stream"));
        assert!(is_zip_attachment("ARCHIVE.ZIP", ""));
        assert!(!is_zip_attachment("archive.zip.pdf", "application/pdf"));
        assert!(!is_zip_attachment("zip", "text/plain"));
    }

    #[test]
    fn zip_by_mime_type() {
        assert!(is_zip_attachment("download", "application/zip"));
        assert!(is_zip_attachment("download.bin", "application/x-zip-compressed"));
        assert!(!is_zip_attachment("report.pdf", "application/pdf"));
    }

    #[test]
    fn signature_detection() {
        assert!(has_zip_signature(&[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]));
        assert!(has_zip_signature(&[0x50, 0x4B, 0x05, 0x06]));
        assert!(!has_zip_signature(&[0x1F, 0x8B, 0x08, 0x00]));
        assert!(!has_zip_signature(b"PK"));
        assert!(!has_zip_signature(&[]));
    }

    #[test]
    fn extraction_dir_strips_extension() {
        assert_eq!(
            extraction_dir("/tmp/downloads", "report.zip"),
            Path::new("/tmp/downloads").join("report")
        );
        assert_eq!(
            extraction_dir(".", "bundle.tar.zip"),
            Path::new(".").join("bundle.tar")
        );
        assert_eq!(extraction_dir(".", "noext"), Path::new(".").join("noext"));
    }

    #[test]
    fn extraction_dir_falls_back_without_a_stem() {
        let fallback = Path::new("/dl").join(FALLBACK_EXTRACTION_DIR);
        for name in ["..", "", "/", ".zip", ".hidden.zip"] {
            assert_eq!(extraction_dir("/dl", name), fallback, "{name:?}");
        }
    }

    #[test]
    fn extraction_dir_ignores_sender_directories() {
        assert_eq!(
            extraction_dir("/tmp/downloads", "../../evil.zip"),
            Path::new("/tmp/downloads").join("evil")
        );
    }
}
