//! Bridge backend endpoints

use crate::client::{RequestClient, RequestError};
use crate::core::Logger;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const BRIDGE_CONFIG_PATH: &str = "/bridge/config";

/// Response envelope shared by the bridge backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponseData<T = Value> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBridgeConfigParams {
    pub host: String,
}

impl GetBridgeConfigParams {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

#[derive(Debug, Clone)]
pub struct BridgeApi {
    client: RequestClient,
}

impl BridgeApi {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// API on the bridge-config preset client
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the configured base URL is malformed
    pub fn with_logger(logger: Arc<Logger>) -> Result<Self, RequestError> {
        RequestClient::bridge_config_client(logger).map(Self::new)
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// Fetch the bridge configuration for `host`
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for a blank host, with no request issued.
    /// Otherwise any client failure; a non-zero `code` is `Business`.
    pub async fn get_bridge_config(&self, host: &str) -> Result<ApiResponseData, RequestError> {
        self.get_bridge_config_as(host).await
    }

    /// Like [`get_bridge_config`](Self::get_bridge_config) with a typed `data`
    ///
    /// # Errors
    ///
    /// As `get_bridge_config`, plus `Decode` if `data` does not fit `T`
    pub async fn get_bridge_config_as<T: DeserializeOwned>(
        &self,
        host: &str,
    ) -> Result<ApiResponseData<T>, RequestError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(RequestError::invalid("host must not be empty"));
        }
        self.client
            .post_json(BRIDGE_CONFIG_PATH, &GetBridgeConfigParams::new(host))
            .await
    }
}
