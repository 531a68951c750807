use anyhow::Context;
use city_wx::app::WeatherApp;
use city_wx::config::AppConfig;
use city_wx::icons::IconCache;
use city_wx::weather::WeatherClient;
use iced::{window, Application, Settings, Size};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("city_wx=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    if let Err(err) = config.validate() {
        error!(error = %err, "Invalid configuration");
        return Err(err.into());
    }

    let client = WeatherClient::new(&config).context("building weather client")?;
    let icons = IconCache::new(&config).context("building icon cache")?;

    info!(
        timeout_secs = config.request_timeout_secs,
        icon_cache_capacity = config.icon_cache_capacity,
        "Starting weather window"
    );

    let mut settings = Settings::with_flags((client, icons));
    settings.window = window::Settings {
        size: Size::new(1200.0, 850.0),
        resizable: false,
        ..Default::default()
    };

    WeatherApp::run(settings)?;
    Ok(())
}
