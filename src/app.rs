// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::config::Config;
use crate::fl;
use crate::input::{connect_injector, KeyInjector};
use crate::layout::{load_layout, Layout};
use crate::overlay::{keyboard_view, ThemeName};
use crate::session::TypingSession;
use crate::vision::{render_preview, NokhwaCamera, SidecarTracker, TrackerSettings, VisionPipeline};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::keyboard::{self, key::Named, Key};
use cosmic::iced::window::{self, Level};
use cosmic::iced::{Alignment, Background, Color, Length, Padding, Subscription};
use cosmic::prelude::*;
use cosmic::widget::{self, container};
use std::time::Instant;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: cosmic::Core,
    /// Configuration data that persists between application runs.
    config: Config,
    /// Config handle used to persist the theme picked in the toolbar.
    config_handler: Option<cosmic_config::Config>,
    /// Layout, gesture, modifier and flash state.
    session: TypingSession,
    /// Camera and hand tracker.
    vision: VisionPipeline,
    /// Destination of typed keystrokes.
    injector: Box<dyn KeyInjector>,
    theme: ThemeName,
    /// Last rendered camera preview.
    preview: Option<widget::image::Handle>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Periodic vision and redraw tick.
    Tick,
    /// Exit button or Escape.
    Exit,
    /// Pointer pressed anywhere on the overlay.
    DragWindow,
    /// Palette picked from the toolbar dropdown.
    ThemeSelected(usize),
    /// Configuration has been updated.
    UpdateConfig(Config),
}

/// Logs a fatal startup error and terminates the process.
fn abort_startup(what: &str, err: &dyn std::fmt::Display) -> ! {
    tracing::error!("{}: {}", what, err);
    eprintln!("airboard: {what}: {err}");
    std::process::exit(1)
}

/// Create a COSMIC application from the app model
impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_settings::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Opens the camera and tracker, connects the virtual keyboard and pins
    /// the overlay above other windows.
    fn init(
        mut core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let config_handler = cosmic_config::Config::new(Self::APP_ID, Config::VERSION).ok();
        let config = config_handler
            .as_ref()
            .map(|context| match Config::get_entry(context) {
                Ok(config) => config,
                Err((_errors, config)) => config,
            })
            .unwrap_or_default();

        let layout = load_layout(config.layout_path.as_deref());
        tracing::info!("Layout ready with {} keys", layout.key_count());

        let camera = NokhwaCamera::open(config.camera_index)
            .unwrap_or_else(|err| abort_startup("Cannot open camera", &err));
        let tracker = SidecarTracker::spawn(
            &config.tracker_command,
            TrackerSettings {
                max_hands: config.max_hands,
                min_detection_confidence: config.min_detection_confidence,
            },
        )
        .unwrap_or_else(|err| {
            abort_startup(
                "Cannot start hand tracker (install tracker/airboard-tracker or set tracker_command)",
                &err,
            )
        });

        let injector = connect_injector();
        tracing::info!("Typing through {}", injector.name());

        // Chromeless overlay
        core.window.show_headerbar = false;

        let startup = match core.main_window_id() {
            Some(id) => window::change_level(id, Level::AlwaysOnTop),
            None => Task::none(),
        };

        let app = AppModel {
            core,
            session: TypingSession::new(layout, config.gesture_config(), config.flash_ticks),
            vision: VisionPipeline::new(Box::new(camera), Box::new(tracker)),
            injector,
            theme: config.theme_name(),
            preview: None,
            config,
            config_handler,
        };

        (app, startup)
    }

    /// Keys and preview side by side, toolbar underneath.
    fn view(&self) -> Element<'_, Self::Message> {
        let palette = self.theme.palette();
        let origin = self.session.layout().origin();

        let preview: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone()).into(),
            None => widget::text(fl!("camera-unavailable")).into(),
        };

        let top = widget::row::row()
            .push(keyboard_view(&self.session, &palette))
            .push(
                container(preview)
                    .padding(Padding::ZERO.top(origin.y).left(app_settings::PREVIEW_GAP)),
            );

        let toolbar = widget::row::row()
            .spacing(16)
            .align_y(Alignment::Center)
            .padding(Padding::ZERO.left(origin.x))
            .push(widget::text(fl!("pinch-hint")).size(14))
            .push(widget::Space::with_width(Length::Fill))
            .push(widget::text(fl!("theme")).size(12))
            .push(widget::dropdown(
                &ThemeName::LABELS,
                Some(self.theme.index()),
                Message::ThemeSelected,
            ))
            .push(widget::button::destructive(fl!("exit")).on_press(Message::Exit));

        let background = Color {
            a: self.config.opacity(),
            ..palette.background
        };

        let canvas = container(
            widget::column::column()
                .spacing(12)
                .push(top)
                .push(toolbar),
        )
        .width(Length::Fixed(app_settings::CANVAS_WIDTH))
        .height(Length::Fixed(app_settings::CANVAS_HEIGHT))
        .padding(Padding::ZERO.right(origin.x).bottom(12))
        .class(cosmic::style::Container::custom(move |_theme| container::Style {
            background: Some(Background::Color(background)),
            text_color: Some(palette.text),
            ..Default::default()
        }));

        widget::mouse_area(canvas)
            .on_press(Message::DragWindow)
            .into()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let tick = cosmic::iced::time::every(self.config.tick_interval()).map(|_| Message::Tick);

        let escape = keyboard::on_key_press(|key, _modifiers| match key {
            Key::Named(Named::Escape) => Some(Message::Exit),
            _ => None,
        });

        // Watch for configuration changes
        let config_subscription = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        Subscription::batch(vec![tick, escape, config_subscription])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::Tick => {
                // A failed read skips gestures and the preview for this tick
                let Some(frame) = self.vision.next_frame() else {
                    return Task::none();
                };

                self.session
                    .on_frame(&frame.hands, frame.size(), Instant::now(), self.injector.as_mut());

                let preview = render_preview(
                    &frame.image,
                    &frame.hands,
                    preview_width(self.session.layout()),
                    app_settings::PREVIEW_DIM_ALPHA,
                );
                self.preview = Some(widget::image::Handle::from_rgba(
                    preview.width(),
                    preview.height(),
                    preview.into_raw(),
                ));
            }

            Message::Exit => {
                tracing::info!("Exiting");
                return cosmic::iced::exit();
            }

            Message::DragWindow => {
                if let Some(id) = self.core.main_window_id() {
                    return window::drag(id);
                }
            }

            Message::ThemeSelected(index) => {
                let Some(theme) = ThemeName::ALL.get(index).copied() else {
                    return Task::none();
                };
                self.theme = theme;

                if let Some(handler) = &self.config_handler {
                    if let Err(err) = self.config.set_theme(handler, theme.as_str().to_string()) {
                        tracing::warn!("Failed to save theme: {}", err);
                    }
                }
            }

            Message::UpdateConfig(config) => {
                if needs_restart(&self.config, &config) {
                    tracing::info!("Camera, tracker or layout changed; restart to apply");
                }
                self.session
                    .reconfigure(config.gesture_config(), config.flash_ticks);
                self.theme = config.theme_name();
                self.config = config;
            }
        }
        Task::none()
    }
}

/// Preview width: the configured width, narrowed to the canvas space right
/// of the keys.
fn preview_width(layout: &Layout) -> u32 {
    let available = app_settings::CANVAS_WIDTH
        - layout.keyboard_right_edge()
        - app_settings::PREVIEW_GAP
        - layout.origin().x;
    (available.max(1.0) as u32).min(app_settings::PREVIEW_WIDTH)
}

/// Whether `new` changes anything only read at startup.
fn needs_restart(old: &Config, new: &Config) -> bool {
    old.camera_index != new.camera_index
        || old.tracker_command != new.tracker_command
        || old.max_hands != new.max_hands
        || old.min_detection_confidence != new.min_detection_confidence
        || old.layout_path != new.layout_path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: live-tunable settings apply without a restart
    #[test]
    fn test_tunable_settings_apply_live() {
        let old = Config::default();
        let new = Config {
            pinch_threshold: 30.0,
            debounce_ms: 600,
            theme: "Neon".to_string(),
            opacity: 0.5,
            ..Config::default()
        };
        assert!(!needs_restart(&old, &new));
    }

    /// Test: the preview never runs past the canvas
    #[test]
    fn test_preview_width_fits_canvas() {
        let layout = crate::layout::LayoutSpec::default().build();
        let width = preview_width(&layout);

        assert!(width <= app_settings::PREVIEW_WIDTH);
        assert!(
            layout.keyboard_right_edge() + app_settings::PREVIEW_GAP + width as f32
                <= app_settings::CANVAS_WIDTH
        );
    }

    /// Test: camera, tracker and layout changes need a restart
    #[test]
    fn test_startup_settings_need_restart() {
        let old = Config::default();

        let camera = Config {
            camera_index: 1,
            ..Config::default()
        };
        assert!(needs_restart(&old, &camera));

        let layout = Config {
            layout_path: Some("/tmp/layout.json".to_string()),
            ..Config::default()
        };
        assert!(needs_restart(&old, &layout));

        let tracker = Config {
            tracker_command: vec!["python3".to_string(), "tracker.py".to_string()],
            ..Config::default()
        };
        assert!(needs_restart(&old, &tracker));
    }
}
