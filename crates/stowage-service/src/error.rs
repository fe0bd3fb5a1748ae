//! Stable error codes returned across the public boundary.

/// The catalogue of stable error codes surfaced to callers.
///
/// Codes are part of the public contract: callers branch on them, so existing
/// codes never change meaning. Internal diagnostic detail stays in logs and
/// is never attached to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorCode {
    /// Any unexpected internal failure.
    GenericUnexpected,
    /// Referenced bucket does not exist.
    BucketNotFound,
    /// Referenced object does not exist.
    ObjectNotFound,
    /// Upload to the storage backend failed.
    UploadFailed,
    /// Download from the storage backend failed.
    DownloadFailed,
    /// Deletion from the storage backend failed.
    DeleteFailed,
    /// Bucket creation failed.
    BucketCreationFailed,
    /// The object key was missing or empty.
    InvalidKey,
    /// The bucket name was missing or empty.
    InvalidBucket,
    /// Presigned URL generation failed.
    PresignedUrlFailed,
    /// Listing objects failed.
    ListObjectsFailed,
    /// Metadata retrieval failed.
    MetadataRetrievalFailed,
    /// The requested collaborator is not configured.
    ProviderNotConfigured,
    /// The upload payload was empty.
    ContentEmpty,
    /// The content type was missing or empty.
    ContentTypeMissing,
    /// Decryption authentication failed or the ciphertext was malformed.
    IntegrityCheckFailed,
    /// Referenced index entry does not exist.
    IndexEntryNotFound,
    /// An index read or search failed.
    IndexQueryFailed,
    /// An index mutation failed.
    IndexUpdateFailed,
    /// Page or page size outside the allowed range.
    InvalidPagination,
}

impl ErrorCode {
    /// Returns the stable wire code.
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorCode::GenericUnexpected => "STR-000",
            ErrorCode::BucketNotFound => "STR-001",
            ErrorCode::ObjectNotFound => "STR-002",
            ErrorCode::UploadFailed => "STR-003",
            ErrorCode::DownloadFailed => "STR-004",
            ErrorCode::DeleteFailed => "STR-005",
            ErrorCode::BucketCreationFailed => "STR-006",
            ErrorCode::InvalidKey => "STR-007",
            ErrorCode::InvalidBucket => "STR-008",
            ErrorCode::PresignedUrlFailed => "STR-009",
            ErrorCode::ListObjectsFailed => "STR-010",
            ErrorCode::MetadataRetrievalFailed => "STR-011",
            ErrorCode::ProviderNotConfigured => "STR-012",
            ErrorCode::ContentEmpty => "STR-013",
            ErrorCode::ContentTypeMissing => "STR-014",
            ErrorCode::IntegrityCheckFailed => "STR-015",
            ErrorCode::IndexEntryNotFound => "STR-016",
            ErrorCode::IndexQueryFailed => "STR-017",
            ErrorCode::IndexUpdateFailed => "STR-018",
            ErrorCode::InvalidPagination => "STR-019",
        }
    }

    /// Returns the default caller-facing message.
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::GenericUnexpected => "An unexpected error occurred.",
            ErrorCode::BucketNotFound => "The requested bucket does not exist.",
            ErrorCode::ObjectNotFound => "The requested object does not exist.",
            ErrorCode::UploadFailed => "Failed to upload the document.",
            ErrorCode::DownloadFailed => "Failed to download the document.",
            ErrorCode::DeleteFailed => "Failed to delete the document.",
            ErrorCode::BucketCreationFailed => "Failed to create the bucket.",
            ErrorCode::InvalidKey => "The object key must not be empty.",
            ErrorCode::InvalidBucket => "The bucket name must not be empty.",
            ErrorCode::PresignedUrlFailed => "Failed to generate a presigned URL.",
            ErrorCode::ListObjectsFailed => "Failed to list objects.",
            ErrorCode::MetadataRetrievalFailed => "Failed to retrieve object metadata.",
            ErrorCode::ProviderNotConfigured => "The requested capability is not configured.",
            ErrorCode::ContentEmpty => "The upload content must not be empty.",
            ErrorCode::ContentTypeMissing => "The content type must not be empty.",
            ErrorCode::IntegrityCheckFailed => {
                "The document failed its integrity check and cannot be returned."
            }
            ErrorCode::IndexEntryNotFound => "The requested index entry does not exist.",
            ErrorCode::IndexQueryFailed => "Failed to query the document index.",
            ErrorCode::IndexUpdateFailed => "Failed to update the document index.",
            ErrorCode::InvalidPagination => "Page must be at least 1 and page size positive.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::GenericUnexpected.code(), "STR-000");
        assert_eq!(ErrorCode::ObjectNotFound.code(), "STR-002");
        assert_eq!(ErrorCode::ContentTypeMissing.code(), "STR-014");
        assert_eq!(ErrorCode::InvalidPagination.code(), "STR-019");
    }

    #[test]
    fn test_every_code_has_a_message() {
        let codes = [
            ErrorCode::GenericUnexpected,
            ErrorCode::BucketNotFound,
            ErrorCode::ObjectNotFound,
            ErrorCode::UploadFailed,
            ErrorCode::DownloadFailed,
            ErrorCode::DeleteFailed,
            ErrorCode::BucketCreationFailed,
            ErrorCode::InvalidKey,
            ErrorCode::InvalidBucket,
            ErrorCode::PresignedUrlFailed,
            ErrorCode::ListObjectsFailed,
            ErrorCode::MetadataRetrievalFailed,
            ErrorCode::ProviderNotConfigured,
            ErrorCode::ContentEmpty,
            ErrorCode::ContentTypeMissing,
            ErrorCode::IntegrityCheckFailed,
            ErrorCode::IndexEntryNotFound,
            ErrorCode::IndexQueryFailed,
            ErrorCode::IndexUpdateFailed,
            ErrorCode::InvalidPagination,
        ];

        for code in codes {
            assert!(!code.message().is_empty());
            assert!(code.code().starts_with("STR-"));
        }
    }
}
