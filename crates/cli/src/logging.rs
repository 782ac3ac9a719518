use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "api_scaffold=debug,api_scaffold_codegen=debug,api_scaffold_core=debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber; stdout is reserved for the plan and report.
pub fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter(verbose)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(Layer::new().with_writer(std::io::stderr).with_target(verbose > 0))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert!(default_filter(1).contains("api_scaffold_codegen=debug"));
        assert_eq!(default_filter(5), "trace");
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_filter(verbose)).is_ok());
        }
    }
}
