use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// OpenRouter `/models` 回傳的單一模型
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_length: Option<serde_json::Value>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub supports_tools: Option<bool>,
    #[serde(default)]
    pub supports_function_calling: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Model {
    /// `provider/model` 形式 id 的前半段
    pub fn provider(&self) -> Option<&str> {
        self.id.split_once('/').map(|(provider, _)| provider)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// 只接受正數的 context 長度
    pub fn context_tokens(&self) -> Option<u64> {
        let value = self.context_length.as_ref()?.as_f64()?;
        if value > 0.0 {
            Some(value as u64)
        } else {
            None
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    pub fn declares_tool_support(&self) -> bool {
        self.supports_tools.unwrap_or(false) || self.supports_function_calling.unwrap_or(false)
    }
}

/// 每個 token 的價格 (美元)，API 以字串回傳
///
/// 欄位缺少時是 `None`；明確給 `null` 時保留為 `Some(Value::Null)`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub prompt: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub completion: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// 給 UI 使用的模型摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDisplay {
    pub display: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub pricing: Pricing,
    pub context_length: Option<u64>,
    pub supports_tools: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}
