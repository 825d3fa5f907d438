use std::sync::Arc;

use anyhow::{bail, Result};

use log::debug;

use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};

use rocket::serde::json::serde_json;
use rocket::serde::Serialize;

/// Name of the blob container every record lands in
const CONTAINER_NAME: &str = "datos-perro";

/// Pieces of an Azure storage connection string
///
/// Only the keys the blob endpoint needs are kept: `AccountName`,
/// `AccountKey`, `BlobEndpoint`, `EndpointSuffix`, `DefaultEndpointsProtocol`
/// and `UseDevelopmentStorage`. Unknown keys are ignored, as the storage SDKs
/// do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub blob_endpoint: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub protocol: Option<String>,
    pub use_development_storage: bool,
}

impl ConnectionString {
    /// Parse the `Key=Value;` form accepted by the storage SDKs
    ///
    /// Values keep everything after the first `=`, so base64 account keys
    /// survive with their `=` padding.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parsed = ConnectionString::default();
        for pair in raw.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                bail!("connection string entry {:?} is not a Key=Value pair", pair);
            };
            match key {
                "AccountName" => parsed.account_name = Some(value.to_string()),
                "AccountKey" => parsed.account_key = Some(value.to_string()),
                "BlobEndpoint" => parsed.blob_endpoint = Some(value.to_string()),
                "EndpointSuffix" => parsed.endpoint_suffix = Some(value.to_string()),
                "DefaultEndpointsProtocol" => parsed.protocol = Some(value.to_string()),
                "UseDevelopmentStorage" => parsed.use_development_storage = value == "true",
                _ => {}
            }
        }
        Ok(parsed)
    }
}

/// Shared handle to the blob container
///
/// Built once at startup and cloned into every request through Rocket's
/// managed state; the underlying store is safe for concurrent use.
#[derive(Debug, Clone)]
pub struct BlobContainer {
    store: Arc<dyn ObjectStore>,
}

impl BlobContainer {
    /// Wrap an already-built object store; tests hand in an in-memory one
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        BlobContainer { store }
    }

    /// Build the Azure-backed container from a connection string
    pub fn open(connection_string: &str) -> Result<Self> {
        let connection = ConnectionString::parse(connection_string)?;
        let store = build_azure_store(&connection)?;
        Ok(BlobContainer {
            store: Arc::new(store),
        })
    }

    /// Serialize a record to JSON and upload it under `blob_name`,
    /// overwriting any blob already carrying that name
    pub async fn put_json<T: Serialize>(&self, blob_name: &str, record: &T) -> Result<()> {
        let content = serde_json::to_string(record)?;
        let size = content.len();
        self.store
            .put(&Path::from(blob_name), PutPayload::from(content.into_bytes()))
            .await?;
        debug!("stored blob {} ({} bytes)", blob_name, size);
        Ok(())
    }
}

/// Translate a parsed connection string into an Azure store bound to the
/// fixed container
fn build_azure_store(connection: &ConnectionString) -> Result<MicrosoftAzure> {
    let mut builder = MicrosoftAzureBuilder::new().with_container_name(CONTAINER_NAME);
    if connection.use_development_storage {
        builder = builder.with_use_emulator(true).with_allow_http(true);
    } else {
        match (&connection.account_name, &connection.account_key) {
            (Some(account), Some(key)) => {
                builder = builder
                    .with_account(account.clone())
                    .with_access_key(key.clone());
            }
            _ => bail!("connection string must carry AccountName and AccountKey"),
        }
    }
    if let Some(endpoint) = &connection.blob_endpoint {
        builder = builder
            .with_allow_http(endpoint.starts_with("http://"))
            .with_endpoint(endpoint.clone());
    } else if let (Some(account), Some(suffix)) =
        (&connection.account_name, &connection.endpoint_suffix)
    {
        let protocol = connection.protocol.as_deref().unwrap_or("https");
        builder = builder.with_endpoint(format!("{}://{}.blob.{}", protocol, account, suffix));
    }
    Ok(builder.build()?)
}
