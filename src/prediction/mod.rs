use super::storage::BlobContainer;
use super::timestamp::is_timestamp_valid;
use super::{ApiError, UploadAck};

use log::error;

use rocket::post;
use rocket::serde::json::{Json, Value};
use rocket::State;

/// Prefix for prediction blobs stored in the container
const PREDICTION_BLOB_PREFIX: &str = "prediction";

/// Persist a chatbot prediction payload as `prediction_<timestamp>.json`
///
/// The payload is stored as received, whatever extra fields it carries; the
/// only requirement is a string `timestamp` to name the blob with.
#[post("/uploadPrediction", data = "<prediction>")]
pub async fn upload_prediction(
    prediction: Json<Value>,
    container: &State<BlobContainer>,
) -> Result<Json<UploadAck>, ApiError> {
    let payload = prediction.into_inner();
    let timestamp = payload
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or_else(ApiError::missing_timestamp)?;
    if !is_timestamp_valid(timestamp) {
        return Err(ApiError::unusable_timestamp(timestamp));
    }
    let blob_name = prediction_blob_name(timestamp);
    container
        .put_json(&blob_name, &payload)
        .await
        .map_err(|error| {
            error!("uploading {} failed: {:#}", blob_name, error);
            ApiError::upload_failed()
        })?;
    Ok(Json(UploadAck::new("Prediction data uploaded successfully")))
}

#[doc(hidden)]
fn prediction_blob_name(timestamp: &str) -> String {
    format!("{}_{}.json", PREDICTION_BLOB_PREFIX, timestamp)
}
