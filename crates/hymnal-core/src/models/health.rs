use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub version: String,
    pub apis: Vec<ApiEndpoint>,
    pub environment: EnvironmentInfo,
    pub catalog: ComponentHealth,
    pub storage: ComponentHealth,
}

/// An entry of the endpoint inventory.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub version: String,
    pub platform: String,
    pub production: bool,
    pub oss_configured: bool,
    pub storage_backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// "healthy", "timeout", "unconfigured", or an error description
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
