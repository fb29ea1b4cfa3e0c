use anyhow::Context;
use health_score::client::config::ClientConfig;
use health_score::client::gui::app::HealthScoreApp;
use health_score::utils::logger::AppLogger;
use iced::Application;

fn main() -> anyhow::Result<()> {
    // load environment from .env (optional)
    let config = ClientConfig::from_env();
    AppLogger::init(&config.log_level);

    let analyzer = config.build_analyzer()?;
    let mut settings = iced::Settings::with_flags(analyzer);
    settings.window.size = iced::Size::new(900.0, 820.0);

    HealthScoreApp::run(settings).context("health score window failed")
}
