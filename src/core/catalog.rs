use crate::domain::model::{Model, ModelDisplay};
use crate::domain::ports::ModelCatalog;
use crate::llm_bridge::display::format_model_display;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_provider_name};

/// 依 `provider/` 前綴篩選，保留原本的熱門度順序後取前 `limit` 個
pub fn select_top_by_provider(models: Vec<Model>, provider: &str, limit: usize) -> Vec<Model> {
    models
        .into_iter()
        .filter(|model| model.provider() == Some(provider))
        .take(limit)
        .collect()
}

pub struct CatalogBrowser<C: ModelCatalog> {
    catalog: C,
    include_tool_indicator: bool,
}

impl<C: ModelCatalog> CatalogBrowser<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            include_tool_indicator: false,
        }
    }

    pub fn with_tool_indicator(mut self, enabled: bool) -> Self {
        self.include_tool_indicator = enabled;
        self
    }

    pub async fn list_all(&self) -> Result<Vec<ModelDisplay>> {
        let models = self.catalog.fetch_models().await?;
        Ok(self.format_all(&models))
    }

    pub async fn top_for_provider(&self, provider: &str, limit: usize) -> Result<Vec<ModelDisplay>> {
        validate_provider_name("provider", provider)?;
        validate_positive_number("limit", limit, 1)?;

        let models = self.catalog.fetch_models().await?;
        let total = models.len();
        let top = select_top_by_provider(models, provider, limit);
        tracing::debug!(
            "Selected {} of {} models for provider '{}'",
            top.len(),
            total,
            provider
        );

        if top.is_empty() {
            tracing::warn!("No models found for provider '{}'", provider);
        }

        Ok(self.format_all(&top))
    }

    fn format_all(&self, models: &[Model]) -> Vec<ModelDisplay> {
        models
            .iter()
            .map(|model| format_model_display(model, self.include_tool_indicator))
            .collect()
    }
}
