//! Config command handler.

use anyhow::Result;
use pantry_axum::ServiceConfig;

/// Execute the config command: print every resolved setting.
pub fn execute() -> Result<()> {
    let service = ServiceConfig::from_env()?;
    print!("{}", render(&service));
    Ok(())
}

/// Render the configuration as aligned `key  value` lines.
pub fn render(service: &ServiceConfig) -> String {
    let functions = &service.functions;
    let mut rows = service.providers.describe();
    rows.extend([
        ("functions.premium_entitlement", functions.premium_entitlement.clone()),
        (
            "functions.entitlement_concurrency",
            functions.entitlement_concurrency.to_string(),
        ),
        ("notifications.symbol", functions.notification_hints.symbol.clone()),
        ("notifications.color", functions.notification_hints.color.clone()),
        ("notifications.size", functions.notification_hints.size.clone()),
        (
            "notifications.haptic_style",
            functions.notification_hints.haptic_style.clone(),
        ),
    ]);

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in rows {
        out.push_str(&format!("{key:<width$}  {value}\n"));
    }

    let missing = service.providers.missing_credentials();
    if !missing.is_empty() {
        out.push_str(&format!("\nMissing credentials: {}\n", missing.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_redacts_secrets() {
        let service = ServiceConfig::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk-very-secret".to_string()),
            "PANTRY_PREMIUM_ENTITLEMENT" => Some("gold".to_string()),
            _ => None,
        })
        .unwrap();

        let out = render(&service);
        assert!(!out.contains("sk-very-secret"));
        assert!(out.contains("<redacted>"));
        assert!(out.contains("gold"));
        assert!(out.contains("Missing credentials:"));
        assert!(!out.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_render_lists_tunables() {
        let out = render(&ServiceConfig::default());
        assert!(out.contains("functions.entitlement_concurrency"));
        assert!(out.contains("notifications.symbol"));
    }
}
