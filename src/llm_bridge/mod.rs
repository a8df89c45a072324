//! OpenRouter 橋接：一個 API 金鑰即可瀏覽多家供應商的模型。

pub mod display;
pub mod openrouter_client;

pub use display::{format_model_display, supports_tool_calling};
pub use openrouter_client::{OpenRouterClient, DEFAULT_BASE_URL};
