#![deny(clippy::all, clippy::perf)]
#![allow(clippy::items_after_statements)]

mod client;
mod config;
mod countdown;
mod model;
mod reconcile;
mod resolve;
mod schedule;
mod utils;
mod views;

use crate::{
    client::Client,
    config::Config,
    model::ItemCatalogue,
    schedule::{Scheduler, Timer},
    views::{stock, weather, Catalogue, Status, StockTable, WeatherCard},
};
use iced::{
    alignment::Horizontal, executor, theme, Alignment, Application, Command, Element, Length,
    Renderer, Settings, Subscription,
};
use iced_native::{
    subscription, window,
    widget::helpers::{button, container, horizontal_rule, scrollable, text},
    Event,
};
use std::{io, process, sync::Arc, time::Instant};
use tap::Pipe;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use utils::Result;

pub fn main() -> iced::Result {
    let (config, config_error) = Config::load();

    let (non_blocking, _guard) = tracing_appender::non_blocking(io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(non_blocking)
        .init();

    if let Some(error) = config_error {
        error!("{error:#}, falling back to defaults");
    }
    let config = config.validated();

    App::run(Settings {
        window: iced::window::Settings {
            size: (config.window.width, config.window.height),
            resizable: true,
            decorations: true,
            ..iced::window::Settings::default()
        },
        default_text_size: 17,
        antialiasing: true,
        exit_on_close_request: false,
        ..Settings::with_flags(config)
    })
}

#[derive(Debug, Clone)]
enum Message {
    Heartbeat(Instant),
    CloseRequested,
    OpenGame,

    Catalogue(Result<ItemCatalogue>),
    Weather(weather::Message),
    Stock(stock::Message),
}

#[derive(Debug)]
enum State {
    Live {
        scheduler: Scheduler,
        weather: WeatherCard,
        stock: StockTable,
    },
    /// Window is closing: timers are gone and late fetch results are dropped.
    TornDown,
}

struct App {
    state: State,
    config: Config,
    catalogue: Catalogue,

    now_ms: i64,
    tick: u64,
}

impl Application for App
where
    Self: 'static,
{
    type Executor = executor::Default;
    type Message = Message;
    type Theme = iced::Theme;
    type Flags = Config;

    fn new(config: Self::Flags) -> (Self, Command<Self::Message>) {
        info!(api = %config.api.base_url, "starting dashboard");

        let client = Arc::new(Client::new(&config.api.base_url, reqwest::Client::new()));
        let polling = &config.polling;
        let scheduler = Scheduler::new(
            Instant::now(),
            [
                (Timer::Stock, polling.stock_interval()),
                (Timer::Weather, polling.weather_interval()),
                (Timer::Clock, polling.clock_tick()),
            ],
        );

        let catalogue = {
            let client = Arc::clone(&client);
            Command::perform(async move { client.item_info().await }, Message::Catalogue)
        };

        let mut app = Self {
            state: State::Live {
                scheduler,
                weather: WeatherCard::new(Arc::clone(&client)),
                stock: StockTable::new(client),
            },
            config,
            catalogue: Catalogue::default(),
            now_ms: now_ms(),
            tick: 0,
        };
        // the subscription's first beat is one period away
        let initial = app.update(Message::Heartbeat(Instant::now()));

        (app, Command::batch([catalogue, initial]))
    }

    fn title(&self) -> String {
        match self.state {
            State::Live { .. } => "live",
            State::TornDown => "closing",
        }
        .pipe(|str| format!("Grow a Garden Tracker - {str}"))
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match message {
            Message::OpenGame => {
                if let Err(error) = open_in_browser(&self.config.api.game_url) {
                    warn!(%error, "cannot open the game page");
                }
                return Command::none();
            }
            Message::Catalogue(result) => {
                match &result {
                    Ok(catalogue) if catalogue.is_empty() => warn!("item info is empty"),
                    Ok(catalogue) => info!(entries = catalogue.len(), "item info available"),
                    Err(error) => warn!(%error, "item info unavailable"),
                }
                self.catalogue = result.into();
                return Command::none();
            }
            _ => {}
        }

        let State::Live {
            scheduler,
            weather,
            stock,
        } = &mut self.state
        else {
            debug!("dashboard torn down, dropping {message:?}");
            return Command::none();
        };

        match message {
            Message::Heartbeat(now) => {
                let commands: Vec<_> = scheduler
                    .due(now)
                    .into_iter()
                    .map(|timer| match timer {
                        Timer::Stock => stock.update(stock::Message::Poll).map(Message::Stock),
                        Timer::Weather => {
                            weather.update(weather::Message::Poll).map(Message::Weather)
                        }
                        Timer::Clock => {
                            self.now_ms = now_ms();
                            self.tick = self.tick.wrapping_add(1);
                            Command::none()
                        }
                    })
                    .collect();
                Command::batch(commands)
            }
            Message::CloseRequested => {
                scheduler.cancel_all();
                self.state = State::TornDown;
                info!("window closed, polling stopped");
                Command::none()
            }
            Message::Weather(message) => weather.update(message).map(Message::Weather),
            Message::Stock(message) => stock.update(message).map(Message::Stock),
            Message::OpenGame | Message::Catalogue(_) => Command::none(),
        }
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        let close = subscription::events_with(|event, _| match event {
            Event::Window(window::Event::CloseRequested) => Some(Message::CloseRequested),
            _ => None,
        });

        let heartbeat = match &self.state {
            State::Live { scheduler, .. } => scheduler.heartbeat(),
            State::TornDown => None,
        };

        match heartbeat {
            Some(period) => Subscription::batch([
                close,
                iced::time::every(period).map(Message::Heartbeat),
            ]),
            None => close,
        }
    }

    fn should_exit(&self) -> bool {
        matches!(self.state, State::TornDown)
    }

    fn view(&self) -> Element<'_, Self::Message, Renderer<Self::Theme>> {
        let view = match &self.state {
            State::Live { weather, stock, .. } => self.live(weather, stock),
            State::TornDown => text("Closing...").into(),
        };

        container(scrollable(container(view).padding(24).width(Length::Fill)))
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Self::Theme {
        Self::Theme::Light
    }
}

impl App {
    fn live<'a>(
        &'a self,
        weather: &'a WeatherCard,
        stock: &'a StockTable,
    ) -> Element<'a, Message, Renderer<iced::Theme>> {
        let header = columee![
            row![text("🌱").size(40), text("Grow a Garden Tracker").size(40)]
                .spacing(12)
                .align_items(Alignment::Center),
            text("Tracks Grow A Garden items, weather, and events in real time!").size(16),
        ]
        .spacing(6)
        .align_items(Alignment::Center);

        let play = button(
            text("PLAY THE GAME NOW")
                .size(18)
                .horizontal_alignment(Horizontal::Center),
        )
        .padding([10, 24])
        .style(theme::Button::Positive)
        .on_press(Message::OpenGame);

        let status = Status::default()
            .domain(stock.reconciler())
            .domain(weather.reconciler())
            .catalogue(&self.catalogue);

        let footer = columee![
            text("Not affiliated with Roblox or Grow a Garden").size(12),
            text(format!("v{}", env!("CARGO_PKG_VERSION"))).size(12),
        ]
        .spacing(2)
        .align_items(Alignment::Center);

        columee![
            container(header).width(Length::Fill).center_x(),
            container(play).width(Length::Fill).center_x(),
            weather.view(self.now_ms, self.tick).map(Message::Weather),
            stock.view(self.now_ms).map(Message::Stock),
            horizontal_rule(10),
            status.view(),
            container(footer).width(Length::Fill).center_x(),
        ]
        .spacing(20)
        .into()
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn open_in_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = process::Command::new("open");
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = process::Command::new("xdg-open");

    command.arg(url).spawn().map(drop)
}
