use crate::{
    columee, countdown,
    model::{WeatherEvent, WeatherReport},
    reconcile::{Outcome, Reconciler},
    resolve::{UnknownKeys, WeatherKind},
    row,
    utils::{Error, Result},
    Client,
};
use iced::{
    theme, widget, Alignment, Background, Color, Element, Length, Padding, Theme,
};
use iced_native::{
    widget::{
        helpers::{column, container, text},
        tooltip::Position,
    },
    Command,
};
use iced_style::container::Appearance;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Message {
    Poll,
    Fetched(Result<Vec<WeatherEvent>>),
}

#[derive(Debug)]
pub struct WeatherCard {
    reconciler: Reconciler<Vec<WeatherEvent>>,
    unknown: UnknownKeys,
    client: Arc<Client>,
}

macro_rules! backdrop {
    ($($name:ident => $kind:expr),* $(,)?) => {
        $(fn $name(_: &Theme) -> Appearance {
            Appearance {
                background: Some(Background::Color($kind.background())),
                border_radius: 16.0,
                border_width: 1.0,
                border_color: Color::from_rgb(0.75, 0.87, 0.75),
                ..Appearance::default()
            }
        })*
    };
}

backdrop!(
    sunny => WeatherKind::Sunny,
    rain => WeatherKind::Rain,
    cloudy => WeatherKind::Cloudy,
    thunderstorm => WeatherKind::Thunderstorm,
    snow => WeatherKind::Snow,
    night => WeatherKind::Night,
    bloodmoon => WeatherKind::Bloodmoon,
    meteor_shower => WeatherKind::MeteorShower,
    bee => WeatherKind::Bee,
    neutral => WeatherKind::Unknown(String::new()),
);

fn backdrop(kind: &WeatherKind) -> theme::Container {
    let style: fn(&Theme) -> Appearance = match kind {
        WeatherKind::Sunny => sunny,
        WeatherKind::Rain => rain,
        WeatherKind::Cloudy => cloudy,
        WeatherKind::Thunderstorm => thunderstorm,
        WeatherKind::Snow | WeatherKind::Frost => snow,
        WeatherKind::Night => night,
        WeatherKind::Bloodmoon => bloodmoon,
        WeatherKind::MeteorShower => meteor_shower,
        WeatherKind::Bee => bee,
        WeatherKind::Unknown(_) => neutral,
    };
    theme::Container::Custom(Box::new(style))
}

impl WeatherEvent {
    /// Seconds left, from `end_unix` when the server sent one, else the raw `duration`.
    pub fn remaining(&self, now_secs: i64) -> u64 {
        if self.end_unix > 0 {
            countdown::remaining_secs(self.end_unix, now_secs)
        } else {
            self.duration
        }
    }

    pub fn kind(&self) -> WeatherKind {
        WeatherKind::parse(&self.name)
    }
}

impl WeatherCard {
    async fn fetch_events(client: Arc<Client>) -> Result<Vec<WeatherEvent>> {
        let WeatherReport { success, weather } = client.weather().await?;
        if success {
            Ok(weather)
        } else {
            Err(Error::malformed("GetWeather", "`success` is false"))
        }
    }

    pub fn new(client: Arc<Client>) -> Self {
        Self {
            reconciler: Reconciler::new("weather"),
            unknown: UnknownKeys::default(),
            client,
        }
    }

    pub const fn reconciler(&self) -> &Reconciler<Vec<WeatherEvent>> {
        &self.reconciler
    }

    /// Kind that paints the card, the first active event or sunny.
    pub fn headline(&self) -> WeatherKind {
        self.active()
            .next()
            .map(WeatherEvent::kind)
            .unwrap_or_default()
    }

    fn active(&self) -> impl Iterator<Item = &WeatherEvent> {
        self.reconciler
            .snapshot()
            .into_iter()
            .flatten()
            .filter(|event| event.active)
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Poll => {
                self.reconciler.begin();
                let client = Arc::clone(&self.client);
                Command::perform(Self::fetch_events(client), Message::Fetched)
            }
            Message::Fetched(result) => {
                if self.reconciler.complete(result) == Outcome::Updated {
                    let unknown = &mut self.unknown;
                    self.reconciler
                        .snapshot()
                        .into_iter()
                        .flatten()
                        .filter(|event| matches!(event.kind(), WeatherKind::Unknown(_)))
                        .for_each(|event| {
                            unknown.report("weather", &event.name);
                        });
                }
                Command::none()
            }
        }
    }

    /// Text shown in place of the event list, if any.
    fn notice(&self) -> Option<&'static str> {
        match self.reconciler.snapshot() {
            None => Some("Loading weather data..."),
            Some(_) if self.active().next().is_none() => Some("No Active Weather"),
            Some(_) => None,
        }
    }

    pub fn view(&self, now_ms: i64, tick: u64) -> Element<'_, Message> {
        let now_secs = now_ms.div_euclid(1000);

        let body: Element<_> = match self.notice() {
            Some(notice) => text(notice)
                .style(Color::from_rgb(0.45, 0.45, 0.45))
                .into(),
            None => column(
                self.active()
                    .map(|event| Self::event(event, now_secs, tick))
                    .collect(),
            )
            .spacing(8)
            .into(),
        };

        let content = columee![
            row![text("🌦️").size(28), text("Current Weather Events").size(28)]
                .spacing(8)
                .align_items(Alignment::Center),
            text("Weather can affect your garden growth and item spawns!")
                .size(15)
                .style(Color::from_rgb(0.18, 0.42, 0.18)),
            body,
        ]
        .spacing(10);

        container(content)
            .padding(20)
            .width(Length::Fill)
            .style(backdrop(&self.headline()))
            .into()
    }

    fn event<'a>(event: &WeatherEvent, now_secs: i64, tick: u64) -> Element<'a, Message> {
        let look = event.kind().presentation();
        let frame = look.animation.frame(tick);

        let mut glyph = text(look.glyph()).size(30);
        if frame.highlight {
            glyph = glyph.style(Color::from_rgb(1.0, 0.84, 0.0));
        }
        let tip = look
            .icon
            .map_or_else(|| look.animation.tag().to_owned(), |icon| icon.name().to_owned());
        let glyph = container(glyph).padding(Padding {
            top: frame.dy,
            right: 3 - frame.dx.min(3),
            bottom: 4 - frame.dy.min(4),
            left: frame.dx,
        });

        row![
            widget::tooltip(glyph, tip, Position::FollowCursor),
            text(event.name.clone()).size(20),
            text(format!("({} left)", countdown::compact(event.remaining(now_secs))))
                .size(14)
                .style(Color::from_rgb(0.18, 0.42, 0.18)),
        ]
        .spacing(8)
        .align_items(Alignment::Center)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Animation;

    fn event(name: &str, active: bool, end_unix: i64) -> WeatherEvent {
        WeatherEvent {
            id: name.to_lowercase(),
            name: name.to_owned(),
            active,
            duration: 300,
            start_unix: end_unix - 300,
            end_unix,
        }
    }

    fn card() -> WeatherCard {
        WeatherCard::new(Arc::new(Client::new(
            "http://127.0.0.1:9/api",
            reqwest::Client::new(),
        )))
    }

    #[test]
    fn remaining_follows_clock() {
        let rain = event("Rain", true, 1_000);
        assert_eq!(rain.remaining(700), 300);
        assert_eq!(rain.remaining(999), 1);
        assert_eq!(rain.remaining(5_000), 0);
    }

    #[test]
    fn remaining_without_end_uses_duration() {
        let mut bee = event("Bee", true, 0);
        bee.end_unix = 0;
        assert_eq!(bee.remaining(1_700_000_000), 300);
    }

    #[test]
    fn headline_defaults_to_sunny() {
        let mut card = card();
        assert_eq!(card.headline(), WeatherKind::Sunny);

        let _ = card.update(Message::Fetched(Ok(vec![
            event("Rain", false, 100),
            event("Thunderstorm", true, 100),
        ])));
        assert_eq!(card.headline(), WeatherKind::Thunderstorm);
        assert_eq!(card.headline().presentation().animation, Animation::Flash);
    }

    #[test]
    fn refetch_of_same_events_is_quiet() {
        let mut card = card();
        let events = vec![event("Snow", true, 100)];
        let _ = card.update(Message::Fetched(Ok(events.clone())));
        let _ = card.update(Message::Fetched(Ok(events)));
        let _ = card.update(Message::Fetched(Err(Error::malformed("GetWeather", "x"))));

        assert_eq!(card.reconciler().revision(), 1);
        assert!(matches!(card.reconciler().last_outcome(), Some(Outcome::Failed(_))));
        assert_eq!(card.active().count(), 1);
    }

    #[test]
    fn notice_follows_snapshot() {
        let mut card = card();
        assert_eq!(card.notice(), Some("Loading weather data..."));

        let _ = card.update(Message::Fetched(Ok(vec![event("Rain", false, 100)])));
        assert_eq!(card.notice(), Some("No Active Weather"));
        assert_eq!(card.headline(), WeatherKind::Sunny);

        let _ = card.update(Message::Fetched(Ok(vec![event("Rain", true, 100)])));
        assert_eq!(card.notice(), None);
    }

    #[test]
    fn every_backdrop_builds() {
        let mut card = card();
        let _ = card.view(0, 0);
        for name in ["Sunny", "Rain", "Frost", "Bloodmoon", "Meteor Shower", "Bee", "Tornado"] {
            let _ = card.update(Message::Fetched(Ok(vec![event(name, true, 100)])));
            let _ = card.view(50_000, 3);
        }
    }

    #[test]
    fn unknown_weather_is_reported_once() {
        let mut card = card();
        let _ = card.update(Message::Fetched(Ok(vec![event("Tornado", true, 100)])));
        assert_eq!(card.headline(), WeatherKind::Unknown("Tornado".into()));
        assert!(!card.unknown.report("weather", "Tornado"));
    }
}
