#![windows_subsystem = "windows"]

mod theme;
mod ui;

use pim_dash::config::DashboardConfig;
use ui::Dashboard;

fn main() -> iced::Result {
    let loaded = DashboardConfig::load();
    let config = loaded.clone().unwrap_or_default();
    pim_dash::logging::init(&config.log_filter);
    if let Err(e) = loaded {
        tracing::warn!("using default config: {e}");
    }

    iced::application(Dashboard::title, Dashboard::update, Dashboard::view)
        .subscription(Dashboard::subscription)
        .theme(Dashboard::theme)
        .window(iced::window::Settings {
            size: (1180.0, 820.0).into(),
            #[cfg(target_os = "linux")]
            platform_specific: iced::window::settings::PlatformSpecific {
                application_id: String::from("pim-dash"),
                ..Default::default()
            },
            ..Default::default()
        })
        .run_with(move || (Dashboard::new(config.clone()), iced::Task::none()))
}
