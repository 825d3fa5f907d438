//! # Perro Backend
//!
//! `perro-backend` is the web backend of the dog breed application: it serves
//! the prebuilt frontend bundle and persists form submissions and chatbot
//! predictions as JSON blobs in an Azure storage container.
//!
//! # How to use
//!
//! The frontend bundle is expected under `dist/` and the following
//! environment variables are read at startup (a `variables.env` file in the
//! working directory is loaded first when present):
//! - AZURE_STORAGE_CONNECTION_STRING: Connection string to the storage
//!   account holding the `datos-perro` container; the process refuses to
//!   start without it
//! - STATIC_DIR: Path to the frontend bundle, defaults to `dist`
//!
//! Records land in the container as `datos_<timestamp>.json` for breed
//! submissions and `prediction_<timestamp>.json` for chatbot predictions.
//! Blob names come straight from the client-supplied timestamp, so two
//! submissions carrying the same timestamp overwrite each other,
//! last-write-wins.
//!
//! # Roadmap
//! - [x] Serve the bundle with the SPA routing fallback
//! - [x] Store breed submissions
//! - [x] Store chatbot predictions
//! - [ ] Accept SharedAccessSignature connection strings
//! - [ ] List stored submissions through a rest endpoint
//!
//! # Useful links
//! - [Azure Blob Storage](https://learn.microsoft.com/en-us/azure/storage/blobs/)
//! - [Connection string reference](https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string)

use std::env;
use std::path::PathBuf;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{catch, catchers, launch, routes, Build, Responder, Rocket};

static STORAGE_CONNECTION_ENV: &str = "AZURE_STORAGE_CONNECTION_STRING";
static STATIC_DIR_ENV: &str = "STATIC_DIR";
static DEFAULT_STATIC_DIR: &str = "dist";
static ENV_FILE: &str = "variables.env";

mod frontend;
mod prediction;
mod storage;
mod submission;
mod timestamp;

/// Acknowledgment returned by the upload endpoints once the blob is written
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "rocket::serde")]
pub struct UploadAck {
    /// Human-readable confirmation shown by the frontend
    pub message: String,
}

impl UploadAck {
    pub fn new(message: &str) -> Self {
        UploadAck {
            message: message.to_string(),
        }
    }
}

/// Body returned alongside every error status
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

/// Failures surfaced to API clients as status-coded JSON
#[derive(Responder)]
pub enum ApiError {
    /// The request cannot produce a blob: a required field is missing or
    /// unusable
    #[response(status = 400)]
    BadRequest(Json<ErrorBody>),
    /// The container rejected the upload; nothing is retried
    #[response(status = 502)]
    StorageUnavailable(Json<ErrorBody>),
}

impl ApiError {
    pub fn missing_timestamp() -> Self {
        ApiError::BadRequest(Json(ErrorBody {
            error: "the payload must carry a string timestamp field".to_string(),
        }))
    }

    pub fn unusable_timestamp(timestamp: &str) -> Self {
        ApiError::BadRequest(Json(ErrorBody {
            error: format!("timestamp {:?} cannot name a blob", timestamp),
        }))
    }

    pub fn upload_failed() -> Self {
        ApiError::StorageUnavailable(Json(ErrorBody {
            error: "the record could not be stored in the container".to_string(),
        }))
    }
}

/// Structured body for requests Rocket rejects before a route runs
#[catch(400)]
fn bad_request() -> (Status, Json<ErrorBody>) {
    (
        Status::BadRequest,
        Json(ErrorBody {
            error: "the request body could not be read".to_string(),
        }),
    )
}

/// Covers JSON bodies that fail to deserialize, missing fields included
#[catch(422)]
fn unprocessable_entity() -> (Status, Json<ErrorBody>) {
    (
        Status::UnprocessableEntity,
        Json(ErrorBody {
            error: "the request body is missing a required field or is not valid JSON".to_string(),
        }),
    )
}

/// Launch the backend using rocket framework
#[launch]
fn rocket() -> Rocket<Build> {
    dotenvy::from_filename(ENV_FILE).ok();
    build(create_blob_container(), frontend_dist())
}

/// Assemble the Rocket instance around injected handles, so tests can
/// substitute the storage backend and the bundle directory
fn build(container: storage::BlobContainer, dist: frontend::FrontendDist) -> Rocket<Build> {
    rocket::build()
        .mount(
            "/",
            routes![
                frontend::index,
                frontend::asset,
                frontend::post_fallback,
                frontend::put_fallback,
                frontend::delete_fallback,
                frontend::patch_fallback,
                frontend::options_fallback,
                submission::submit,
                prediction::upload_prediction
            ],
        )
        .register(
            "/",
            catchers![frontend::spa_fallback, bad_request, unprocessable_entity],
        )
        .manage(container)
        .manage(dist)
}

/// Creates the container client from the connection string in the environment
fn create_blob_container() -> storage::BlobContainer {
    let connection_string =
        env::var(STORAGE_CONNECTION_ENV).expect("find storage connection string");
    storage::BlobContainer::open(&connection_string).expect("storage container client")
}

/// Locate the frontend bundle directory
fn frontend_dist() -> frontend::FrontendDist {
    let root = env::var(STATIC_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));
    frontend::FrontendDist { root }
}
