use tracing_subscriber::EnvFilter;

/// Nastaví tracing subscriber; úroveň se řídí přes RUST_LOG, default info.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[macro_export]
macro_rules! log_anyhow_with_source {
    ($err:expr, $($rest:tt)+) => {{
        // Jasně řekneme, že pracujeme s anyhow::Error
        let err: &anyhow::Error = &$err;

        // Nejnižší příčina chyby (root cause)
        let root = err.root_cause();

        ::tracing::error!(
            error = %err,       // např. "read memory metrics"
            root_cause = %root, // např. "No such file or directory (os error 2)"
            $($rest)+
        );
    }};
}
