use crate::domain::model::{Model, ModelDisplay, Pricing};

const TOOL_INDICATOR: &str = "🔧 ";

/// 沒有明確宣告時，用 id 片段判斷是否支援 tool calling
const TOOL_CAPABLE_PATTERNS: &[&str] = &[
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "claude-3",
    "claude-3.5",
    "gemini-1.5",
    "gemini-pro",
    "llama-3.1",
    "llama-3.2",
    "mistral-large",
    "mixtral",
];

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

pub fn supports_tool_calling(model: &Model) -> bool {
    if model.declares_tool_support() {
        return true;
    }
    let id = model.id.to_lowercase();
    TOOL_CAPABLE_PATTERNS
        .iter()
        .any(|pattern| id.contains(pattern))
}

/// 將模型整理成 `名稱 | 價格 | context` 的顯示字串
pub fn format_model_display(model: &Model, include_tool_indicator: bool) -> ModelDisplay {
    let name = model.display_name().to_string();
    let supports_tools = include_tool_indicator.then(|| supports_tool_calling(model));

    let indicator = if supports_tools == Some(true) {
        TOOL_INDICATOR
    } else {
        ""
    };

    let pricing = model.pricing.clone().unwrap_or_default();
    let context_length = model.context_tokens();

    let display = format!(
        "{}{} | {} | {}",
        indicator,
        name,
        format_pricing(&pricing),
        format_context(context_length)
    );

    ModelDisplay {
        display,
        id: model.id.clone(),
        name,
        description: model.description.clone().unwrap_or_default(),
        pricing,
        context_length,
        supports_tools,
        created_at: model.created_at(),
    }
}

/// 每百萬 token 的價格，缺少的欄位視為 0，`null` 或非數字則無法顯示
pub fn format_pricing(pricing: &Pricing) -> String {
    match (
        price_per_million(pricing.prompt.as_ref()),
        price_per_million(pricing.completion.as_ref()),
    ) {
        (Some(prompt), Some(completion)) => {
            format!("${:.2}/${:.2} per 1M", prompt, completion)
        }
        _ => "Pricing unavailable".to_string(),
    }
}

fn price_per_million(value: Option<&serde_json::Value>) -> Option<f64> {
    let per_token = match value {
        None => 0.0,
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok()?,
        Some(serde_json::Value::Number(n)) => n.as_f64()?,
        Some(_) => return None,
    };
    Some(per_token * TOKENS_PER_PRICE_UNIT)
}

pub fn format_context(context_length: Option<u64>) -> String {
    match context_length {
        Some(tokens) => format!("{} ctx", group_thousands(tokens)),
        None => "Unknown ctx".to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
