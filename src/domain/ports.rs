use crate::domain::model::Model;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 模型目錄來源 (OpenRouter 或測試用的替身)
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// 依 API 排序 (熱門度) 回傳所有模型
    async fn fetch_models(&self) -> Result<Vec<Model>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn site_url(&self) -> Option<&str>;
    fn site_name(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn include_tool_indicator(&self) -> bool;
    fn default_limit(&self) -> usize;
}
