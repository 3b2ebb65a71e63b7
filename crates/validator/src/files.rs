//! Multipart file checks.
//!
//! Per file field, in order: presence, emptiness, the content-type
//! allowlist, size bounds, then magic-number sniffing. Once a part is
//! present, the checks after emptiness are independent and all reported.

use gatehouse_schema::{FileRules, Source};
use serde_json::Value;

use crate::foundation::{ErrorContext, Location, ValidationError};
use crate::raw::Part;
use crate::report::ErrorAggregator;
use crate::typed::UploadedFile;

/// Leading-byte signatures: `(mime type, magic bytes)`.
pub const MAGIC_NUMBERS: &[(&str, &[u8])] = &[
    ("image/png", b"\x89PNG\r\n\x1a\n"),
    ("image/jpeg", b"\xff\xd8\xff"),
    ("image/gif", b"GIF89a"),
    ("image/gif", b"GIF87a"),
    ("image/webp", b"RIFF"),
    ("application/pdf", b"%PDF-"),
    ("application/zip", b"PK\x03\x04"),
    ("application/x-rar-compressed", b"Rar!\x1a\x07"),
];

/// Length of the longest signature in [`MAGIC_NUMBERS`]. Sniffing fewer
/// bytes would leave that signature undetectable.
pub const LONGEST_SIGNATURE: usize = longest_signature();

const fn longest_signature() -> usize {
    let mut longest = 0;
    let mut i = 0;
    while i < MAGIC_NUMBERS.len() {
        if MAGIC_NUMBERS[i].1.len() > longest {
            longest = MAGIC_NUMBERS[i].1.len();
        }
        i += 1;
    }
    longest
}

/// Content type assumed when a part declares none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Longest hex prefix of the sniffed bytes quoted in mismatch errors.
const MAGIC_HEX_LEN: usize = 16;

/// The file type the leading bytes indicate, if any signature matches.
#[must_use]
pub fn sniff(data: &[u8]) -> Option<&'static str> {
    MAGIC_NUMBERS
        .iter()
        .find(|(_, magic)| data.starts_with(magic))
        .map(|(mime, _)| *mime)
}

/// Validates uploaded parts against their declared [`FileRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileValidator {
    max_file_size: u64,
    sniff_len: usize,
    include_input: bool,
}

impl FileValidator {
    /// `max_file_size` applies to fields that declare no `max_size`.
    /// `sniff_len` is raised to [`LONGEST_SIGNATURE`] when shorter.
    #[must_use]
    pub const fn new(max_file_size: u64, sniff_len: usize) -> Self {
        Self {
            max_file_size,
            sniff_len: if sniff_len < LONGEST_SIGNATURE {
                LONGEST_SIGNATURE
            } else {
                sniff_len
            },
            include_input: true,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn with_input(mut self, include_input: bool) -> Self {
        self.include_input = include_input;
        self
    }

    /// Checks one file field. Returns the accepted file when the part is
    /// present, whether or not it passed: check `sink`.
    pub fn validate(
        &self,
        name: &str,
        required: bool,
        rules: &FileRules,
        part: Option<&Part>,
        sink: &mut ErrorAggregator,
    ) -> Option<UploadedFile> {
        let loc = Location::root(Source::Files).key(name.to_owned());
        let Some(part) = part else {
            if required {
                sink.add(ValidationError::missing().at(loc));
            }
            return None;
        };
        let size = part.size();
        let input = Value::String(part.filename.clone().unwrap_or_default());
        let mut report = |error: ValidationError| {
            let error = error.at(loc.clone());
            sink.add(if self.include_input {
                error.with_input(input.clone())
            } else {
                error
            });
        };

        if size == 0 {
            report(
                ValidationError::rule("Uploaded file is empty").with_ctx(ErrorContext::EmptyFile {
                    filename: part.filename.clone(),
                    file_size: 0,
                }),
            );
            return None;
        }

        let content_type = part.content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE);
        if !rules.allows(content_type) {
            report(
                ValidationError::rule(format!(
                    "Invalid content type '{content_type}'. Allowed types: {}",
                    rules.content_types.join(", ")
                ))
                .with_ctx(ErrorContext::ContentType {
                    allowed_types: rules.content_types.clone(),
                    provided_type: content_type.to_owned(),
                }),
            );
        }

        let max_size = rules.max_size.unwrap_or(self.max_file_size);
        if size > max_size {
            report(
                ValidationError::rule(format!("File too large. Maximum size is {max_size} bytes"))
                    .with_ctx(ErrorContext::MaxSize {
                        max_size,
                        file_size: size,
                    }),
            );
        }
        if let Some(min_size) = rules.min_size.filter(|min| size < *min) {
            report(
                ValidationError::rule(format!("File too small. Minimum size is {min_size} bytes"))
                    .with_ctx(ErrorContext::MinSize {
                        min_size,
                        file_size: size,
                    }),
            );
        }

        let head = &part.data[..part.data.len().min(self.sniff_len)];
        let detected = sniff(head);
        if rules.validate_magic_numbers {
            let essence = content_type.split(';').next().unwrap_or("").trim();
            if let Some(detected) = detected.filter(|d| !d.eq_ignore_ascii_case(essence)) {
                let mut magic_bytes = hex::encode(head);
                magic_bytes.truncate(MAGIC_HEX_LEN);
                report(
                    ValidationError::rule(format!(
                        "File type mismatch: MIME type is {essence} but magic numbers indicate {detected}"
                    ))
                    .with_ctx(ErrorContext::MagicMismatch {
                        declared_mime: essence.to_owned(),
                        detected_type: detected.to_owned(),
                        magic_bytes,
                    }),
                );
            }
        }

        Some(UploadedFile {
            filename: part.filename.clone(),
            content_type: part.content_type.clone(),
            data: part.data.clone(),
            size,
            detected_type: detected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ErrorKind;
    use serde_json::json;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn rules(types: &[&str], magic: bool) -> FileRules {
        FileRules {
            content_types: types.iter().map(|t| (*t).to_owned()).collect(),
            validate_magic_numbers: magic,
            ..FileRules::default()
        }
    }

    fn check(rules: &FileRules, part: Option<&Part>) -> Vec<ValidationError> {
        let mut sink = ErrorAggregator::new();
        FileValidator::new(1024, 16).validate("image", true, rules, part, &mut sink);
        sink.into_errors()
    }

    #[test]
    fn sniffs_known_signatures() {
        assert_eq!(sniff(PNG), Some("image/png"));
        assert_eq!(sniff(b"GIF87a..."), Some("image/gif"));
        assert_eq!(sniff(b"%PDF-1.7"), Some("application/pdf"));
        assert_eq!(sniff(b"hello"), None);
    }

    #[test]
    fn short_sniff_len_still_sees_every_signature() {
        assert_eq!(LONGEST_SIGNATURE, 8);
        let part = Part::file("image", "a.jpg", "image/jpeg", PNG);
        for sniff_len in [0, 4, 7] {
            let mut sink = ErrorAggregator::new();
            FileValidator::new(1024, sniff_len).validate(
                "image",
                true,
                &rules(&["image/jpeg"], true),
                Some(&part),
                &mut sink,
            );
            assert_eq!(sink.len(), 1, "sniff_len {sniff_len}");
            assert_eq!(sink.errors()[0].ctx_value("detected_type"), Some(json!("image/png")));
        }
    }

    #[test]
    fn missing_required_file() {
        let errors = check(&rules(&[], false), None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Missing);
        assert_eq!(errors[0].loc, ["files", "image"]);
    }

    #[test]
    fn optional_file_may_be_absent() {
        let mut sink = ErrorAggregator::new();
        FileValidator::new(1024, 16).validate("doc", false, &rules(&[], false), None, &mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn empty_file_is_distinct() {
        let part = Part::file("image", "a.png", "image/png", Vec::<u8>::new());
        let errors = check(&rules(&["image/jpeg"], true), Some(&part));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Uploaded file is empty");
        assert_eq!(errors[0].ctx_value("file_size"), Some(json!(0)));
    }

    #[test]
    fn png_claimed_as_jpeg() {
        let part = Part::file("image", "photo.jpg", "image/jpeg", PNG);
        let errors = check(&rules(&["image/jpeg"], true), Some(&part));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].ctx_value("declared_mime"), Some(json!("image/jpeg")));
        assert_eq!(errors[0].ctx_value("detected_type"), Some(json!("image/png")));
        assert_eq!(errors[0].ctx_value("magic_bytes"), Some(json!("89504e470d0a1a0a")));
    }

    #[test]
    fn sniffing_is_opt_in() {
        let part = Part::file("image", "photo.jpg", "image/jpeg", PNG);
        assert!(check(&rules(&["image/jpeg"], false), Some(&part)).is_empty());
    }

    #[test]
    fn content_type_and_size_are_both_reported() {
        let mut limits = rules(&["image/png", "image/jpeg"], false);
        limits.max_size = Some(4);
        let part = Part::file("image", "a.txt", "text/plain", &b"hello"[..]);
        let errors = check(&limits, Some(&part));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].msg,
            "Invalid content type 'text/plain'. Allowed types: image/png, image/jpeg"
        );
        assert_eq!(errors[1].ctx_value("max_size"), Some(json!(4)));
        assert_eq!(errors[1].ctx_value("file_size"), Some(json!(5)));
    }

    #[test]
    fn global_limit_applies_without_declared_max() {
        let part = Part::file("image", "big.bin", "application/octet-stream", vec![1u8; 2048]);
        let errors = check(&rules(&[], false), Some(&part));
        assert_eq!(errors[0].msg, "File too large. Maximum size is 1024 bytes");
    }

    #[test]
    fn min_size() {
        let mut limits = rules(&[], false);
        limits.min_size = Some(10);
        let part = Part::file("image", "a.bin", "application/octet-stream", &b"abc"[..]);
        let errors = check(&limits, Some(&part));
        assert_eq!(errors[0].ctx_value("min_size"), Some(json!(10)));
    }
}
