use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 沒有設定 `RUST_LOG` 時使用的過濾規則
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "mcp_playground=debug,info"
    } else {
        "mcp_playground=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    // 日誌寫到 stderr，stdout 留給命令輸出
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON 格式；verbose 時另外帶上來源位置，方便對照 `--verbose` 的除錯訊息
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_file(verbose)
                .with_line_number(verbose)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_verbose() {
        assert_eq!(default_directive(false), "mcp_playground=info");
        assert!(default_directive(true).starts_with("mcp_playground=debug"));
        assert!(default_directive(true).parse::<EnvFilter>().is_ok());
    }
}
