// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for display next to the compress/convert
// controls. Every technical error is mapped to plain English with a clear
// suggestion.

use crate::error::{BildwerkError, EMPTY_INPUT};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth simply trying again.
    Transient,
    /// User must change something (pick another file, adjust a limit).
    ActionRequired,
    /// This file cannot be handled at all.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether re-running the same action might succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `BildwerkError` into a `HumanError` for the UI.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::Decode(detail) => {
            if detail == EMPTY_INPUT {
                HumanError {
                    message: "The selected file is empty.".into(),
                    suggestion: "Choose the image again. If it came from a download, it may not have finished.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "This file isn't an image we can read.".into(),
                    suggestion: "The file may be damaged or in an unusual format. Try a JPEG or PNG image.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            }
        }

        BildwerkError::Encode(_) => HumanError {
            message: "We couldn't compress this image.".into(),
            suggestion: "Your original image has not been changed. Try a larger size limit, or save the image as a JPEG first.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidConstraints(detail) => HumanError {
            message: "The size limits don't look right.".into(),
            suggestion: format!("Enter a maximum size above 0 MB and a maximum width or height of at least 1 pixel. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Package(_) => HumanError {
            message: "We couldn't convert this image.".into(),
            suggestion: "The image may be damaged. Try opening it on your computer first, or choose a different image.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::Worker(_) => HumanError {
            message: "Something went wrong while working on your image.".into(),
            suggestion: "Please try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BildwerkError::Config(detail) => HumanError {
            message: "The app's settings are invalid.".into(),
            suggestion: format!("Restore the default settings and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file or folder.".into(),
                    suggestion: "Check the permissions, or choose a different download folder.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_image_is_permanent() {
        let err = BildwerkError::Decode("The image format could not be determined".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn empty_file_asks_for_action() {
        let human = humanize_error(&BildwerkError::Decode(EMPTY_INPUT.into()));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn zero_sized_image_is_not_reported_as_empty_file() {
        let human = humanize_error(&BildwerkError::Decode("image has zero width or height (0x16)".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.message.contains("empty"));
    }

    #[test]
    fn failed_compression_mentions_original_is_untouched() {
        let human = humanize_error(&BildwerkError::Encode("every attempt failed".into()));
        assert!(human.suggestion.contains("not been changed"));
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = BildwerkError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn worker_failure_is_transient() {
        let human = humanize_error(&BildwerkError::Worker("task panicked".into()));
        assert_eq!(human.severity, Severity::Transient);
    }
}
