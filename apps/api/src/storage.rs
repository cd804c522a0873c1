//! Object storage for uploaded documents (the provider's S3-compatible endpoint).

use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::models::{AnalysisDocuments, CompanyRequirements, UploadedDocument};

/// Keys of the archived copies; the requirements key is absent when the job
/// description was pasted as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivedDocuments {
    pub resume_key: Option<String>,
    pub company_requirements_key: Option<String>,
}

pub fn document_key(user_id: Uuid, run_id: Uuid, kind: &str) -> String {
    format!("documents/{user_id}/{run_id}/{kind}.pdf")
}

pub async fn archive_documents(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_id: Uuid,
    run_id: Uuid,
    documents: &AnalysisDocuments,
) -> Result<ArchivedDocuments, AppError> {
    let resume_key = document_key(user_id, run_id, "resume");
    put_document(s3, bucket, &resume_key, &documents.resume).await?;

    let company_requirements_key = match &documents.company_requirements {
        CompanyRequirements::Document(doc) => {
            let key = document_key(user_id, run_id, "company_requirements");
            put_document(s3, bucket, &key, doc).await?;
            Some(key)
        }
        CompanyRequirements::Text(_) => None,
    };

    Ok(ArchivedDocuments {
        resume_key: Some(resume_key),
        company_requirements_key,
    })
}

async fn put_document(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    doc: &UploadedDocument,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(doc.bytes.clone()))
        .content_type(doc.mime_type())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!(
        "Archived {} ({} bytes) to s3://{}/{}",
        doc.file_name,
        doc.bytes.len(),
        bucket,
        key
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_layout() {
        let user = Uuid::nil();
        let run = Uuid::from_u128(1);
        assert_eq!(
            document_key(user, run, "resume"),
            format!("documents/{user}/{run}/resume.pdf")
        );
    }
}
