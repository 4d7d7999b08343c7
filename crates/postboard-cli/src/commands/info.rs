use postboard_core::api::RemoteClient;
use postboard_core::app::AppContainer;
use postboard_core::config::AppConfig;
use postboard_core::logging;

pub fn run_info<C: RemoteClient>(container: &AppContainer<C>) {
    for line in info_lines(container.config(), logging::is_enabled()) {
        println!("{line}");
    }
}

pub fn info_lines(config: &AppConfig, logging_active: bool) -> Vec<String> {
    vec![
        format!("Environment:   {}", config.environment),
        format!("API base URL:  {}", config.api_base_url),
        format!("HTTP timeout:  {}s", config.http_timeout.as_secs()),
        format!("Database:      {}", config.database_path.display()),
        format!(
            "Logging:       {}",
            if logging_active { "enabled" } else { "disabled" }
        ),
    ]
}
