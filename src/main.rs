// SPDX-License-Identifier: GPL-3.0-only

//! Airboard
//!
//! Opens the webcam, tracks the user's hands and shows an always-on-top
//! keyboard overlay. Pinching thumb and index finger over a key types it
//! into the focused application.

use airboard::{app, app_settings, i18n};

fn main() -> cosmic::iced::Result {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("airboard=info".parse().unwrap()),
        )
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Fixed-size borderless overlay; the keys map 1:1 onto canvas pixels.
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(
            app_settings::CANVAS_WIDTH,
            app_settings::CANVAS_HEIGHT,
        ))
        .resizable(None)
        .client_decorations(true)
        .transparent(true);

    tracing::info!(
        "Starting overlay {}x{}",
        app_settings::CANVAS_WIDTH,
        app_settings::CANVAS_HEIGHT
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<app::AppModel>(settings, ())
}
