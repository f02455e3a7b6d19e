use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HELLO_MESSAGE: &str = "Hello from Hyperflow Works Backend!";

#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
pub struct HelloMessage {
    #[schema(example = "Hello from Hyperflow Works Backend!")]
    pub message: String,
}

impl HelloMessage {
    pub fn greeting() -> Self {
        Self {
            message: HELLO_MESSAGE.to_string(),
        }
    }
}
