use super::storage::BlobContainer;
use super::timestamp::is_timestamp_valid;
use super::{ApiError, UploadAck};

use log::error;

use rocket::post;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;

/// Prefix for submission blobs stored in the container
const SUBMISSION_BLOB_PREFIX: &str = "datos";

/// A breed record sent by the frontend form
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "rocket::serde")]
pub struct BreedSubmission {
    /// Free-form breed name typed by the visitor
    pub breed: String,
    /// Client-generated timestamp; doubles as the storage identity of the
    /// record, so resubmitting the same timestamp overwrites the earlier blob
    pub timestamp: String,
}

/// Persist a breed submission as `datos_<timestamp>.json`
///
/// Only the `{breed, timestamp}` pair is stored; unknown body fields are
/// dropped during deserialization.
#[post("/submit", data = "<submission>")]
pub async fn submit(
    submission: Json<BreedSubmission>,
    container: &State<BlobContainer>,
) -> Result<Json<UploadAck>, ApiError> {
    let submission = submission.into_inner();
    if !is_timestamp_valid(&submission.timestamp) {
        return Err(ApiError::unusable_timestamp(&submission.timestamp));
    }
    let blob_name = submission_blob_name(&submission.timestamp);
    container
        .put_json(&blob_name, &submission)
        .await
        .map_err(|error| {
            error!("uploading {} failed: {:#}", blob_name, error);
            ApiError::upload_failed()
        })?;
    Ok(Json(UploadAck::new("Datos guardados correctamente")))
}

#[doc(hidden)]
fn submission_blob_name(timestamp: &str) -> String {
    format!("{}_{}.json", SUBMISSION_BLOB_PREFIX, timestamp)
}
