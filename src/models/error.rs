use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "Not Found")]
    pub message: String,
    #[schema(example = 404)]
    pub status: u16,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                status,
            },
        }
    }
}
