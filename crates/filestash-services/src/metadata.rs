//! Translation between `File` and the blob representation.
//!
//! Descriptive fields travel as blob metadata; the source application fields
//! are also written as tags so the store can index them. Metadata values are
//! sent as HTTP headers by the object store backends, so the free-text name
//! is percent-encoded.

use bytes::Bytes;
use filestash_core::constants::metadata_keys;
use filestash_core::File;
use filestash_storage::{BlobPayload, BlobProperties, StoredBlob};

pub(crate) fn to_payload(file: File) -> BlobPayload {
    let mut metadata = BlobProperties::new();
    let mut tags = BlobProperties::new();

    metadata.insert(
        metadata_keys::NAME.to_string(),
        urlencoding::encode(&file.name).into_owned(),
    );
    if let Some(ref media_type) = file.media_type {
        metadata.insert(metadata_keys::MEDIA_TYPE.to_string(), media_type.clone());
    }
    if let Some(ref encoding) = file.encoding {
        metadata.insert(metadata_keys::ENCODING.to_string(), encoding.clone());
    }
    if let Some(source_application_id) = file.source_application_id {
        let value = source_application_id.to_string();
        metadata.insert(metadata_keys::SOURCE_APPLICATION_ID.to_string(), value.clone());
        tags.insert(metadata_keys::SOURCE_APPLICATION_ID.to_string(), value);
    }
    if let Some(ref instance_id) = file.source_application_instance_id {
        metadata.insert(
            metadata_keys::SOURCE_APPLICATION_INSTANCE_ID.to_string(),
            instance_id.clone(),
        );
        tags.insert(
            metadata_keys::SOURCE_APPLICATION_INSTANCE_ID.to_string(),
            instance_id.clone(),
        );
    }

    BlobPayload {
        data: Bytes::from(file.contents),
        content_type: file.media_type,
        metadata,
        tags,
    }
}

/// Header-transported metadata comes back with lowercased keys, so lookups ignore case.
fn lookup<'a>(metadata: &'a BlobProperties, key: &str) -> Option<&'a str> {
    metadata
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

pub(crate) fn from_stored(blob: StoredBlob) -> File {
    let metadata = &blob.metadata;

    let name = lookup(metadata, metadata_keys::NAME)
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .unwrap_or_default();

    let media_type = lookup(metadata, metadata_keys::MEDIA_TYPE)
        .map(String::from)
        .or_else(|| blob.content_type.clone());

    File {
        name,
        source_application_id: lookup(metadata, metadata_keys::SOURCE_APPLICATION_ID)
            .and_then(|v| v.parse().ok()),
        source_application_instance_id: lookup(
            metadata,
            metadata_keys::SOURCE_APPLICATION_INSTANCE_ID,
        )
        .map(String::from),
        media_type,
        encoding: lookup(metadata, metadata_keys::ENCODING).map(String::from),
        contents: blob.data.to_vec(),
    }
}
