//! Check-config command - validates configuration without serving

use crate::config::AppConfig;

/// Load, validate and summarize the effective configuration
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    println!("{}", summary(&config));
    Ok(())
}

fn summary(config: &AppConfig) -> String {
    let indices = if config.gateway.allowed_indices.is_empty() {
        "(none)".to_string()
    } else {
        config.gateway.allowed_indices.join(", ")
    };

    [
        format!("listen:           {}:{}", config.server.host, config.server.port),
        format!("backend:          {}", config.backend.base_url),
        format!("allowed indices:  {}", indices),
        format!("result cache:     {}", on_off(config.gateway.output_cache_enabled)),
        format!("cache store:      {}", config.cache.backend),
        format!(
            "attributes:       {}",
            config.attributes.base_url.as_deref().unwrap_or("disabled")
        ),
        format!("group tokens:     {}", on_off(config.gateway.group_token_secret.is_some())),
        format!("cache admin:      {}", on_off(config.gateway.admin_token.is_some())),
    ]
    .join("\n")
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hides_secrets() {
        let mut config = AppConfig::default();
        config.gateway.allowed_indices = vec!["catalog".to_string(), "cms".to_string()];
        config.gateway.admin_token = Some("s3cret".to_string());

        let text = summary(&config);

        assert!(text.contains("catalog, cms"));
        assert!(text.contains("cache admin:      enabled"));
        assert!(!text.contains("s3cret"));
    }
}
