use crate::{
    hex,
    model::ItemCatalogue,
    reconcile::{Outcome, Phase, Reconciler},
    utils::Result,
};
use iced::{Color, Element};
use iced_native::widget::helpers::text;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Idle,
    Busy,
    Fresh,
    Quiet,
    Alarm,
}

impl Tone {
    fn as_color(self) -> Color {
        match self {
            Self::Idle => hex!(0x9e9e9e),
            Self::Busy => hex!(0x1565c0),
            Self::Fresh => hex!(0x2e7d32),
            Self::Quiet => hex!(0x558b2f),
            Self::Alarm => hex!(0xc62828),
        }
    }
}

/// Whether `Item-Info` answered at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Catalogue {
    #[default]
    Pending,
    Available(usize),
    Unavailable(String),
}

impl From<Result<ItemCatalogue>> for Catalogue {
    fn from(result: Result<ItemCatalogue>) -> Self {
        match result {
            Ok(catalogue) => Self::Available(catalogue.len()),
            Err(error) => Self::Unavailable(error.to_string()),
        }
    }
}

/// One line of poll bookkeeping per domain, coloured by how the last poll went.
#[derive(Default)]
pub struct Status(Vec<(Tone, String)>);

impl Status {
    pub fn domain<T: PartialEq + Debug>(mut self, reconciler: &Reconciler<T>) -> Self {
        let name = reconciler.domain();
        let line = match (reconciler.phase(), reconciler.last_outcome()) {
            (Phase::Fetching, _) => (Tone::Busy, format!("{name}: fetching")),
            (Phase::Idle, None) => (Tone::Idle, format!("{name}: waiting")),
            (Phase::Idle, Some(Outcome::Updated)) => (
                Tone::Fresh,
                format!("{name}: updated (rev {})", reconciler.revision()),
            ),
            (Phase::Idle, Some(Outcome::Unchanged)) => (Tone::Quiet, format!("{name}: up to date")),
            (Phase::Idle, Some(Outcome::Failed(error))) => {
                (Tone::Alarm, format!("{name}: showing last data, {error}"))
            }
        };
        self.0.push(line);
        self
    }

    pub fn catalogue(mut self, catalogue: &Catalogue) -> Self {
        self.0.push(match catalogue {
            Catalogue::Pending => (Tone::Idle, "item info: checking".to_owned()),
            Catalogue::Available(count) => (Tone::Fresh, format!("item info: {count} entries")),
            Catalogue::Unavailable(_) => (Tone::Alarm, "item info: unavailable".to_owned()),
        });
        self
    }

    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        iced::widget::Row::with_children(
            self.0
                .into_iter()
                .map(|(tone, line)| text(line).size(13).style(tone.as_color()).into())
                .collect(),
        )
        .spacing(24)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anyerr;

    macro_rules! assert_tone {
        ($status:expr, $index:expr, $tone:expr) => {
            assert_eq!($status.0[$index].0, $tone, "{}", $status.0[$index].1)
        };
    }

    #[test]
    fn tones_follow_outcomes() {
        let mut rec = Reconciler::<u8>::new("stock");
        assert_tone!(Status::default().domain(&rec), 0, Tone::Idle);

        rec.begin();
        assert_tone!(Status::default().domain(&rec), 0, Tone::Busy);

        rec.complete(Ok(1));
        assert_tone!(Status::default().domain(&rec), 0, Tone::Fresh);

        rec.complete(Ok(1));
        assert_tone!(Status::default().domain(&rec), 0, Tone::Quiet);

        rec.complete(Err(anyerr!("offline")));
        let status = Status::default().domain(&rec);
        assert_tone!(status, 0, Tone::Alarm);
        assert!(status.0[0].1.contains("offline"));
    }

    #[test]
    fn catalogue_availability() {
        let ok: Catalogue = Ok(ItemCatalogue(json::json!([1, 2]))).into();
        assert_eq!(ok, Catalogue::Available(2));

        let down: Catalogue = Err(anyerr!("503")).into();
        assert!(matches!(down, Catalogue::Unavailable(_)));

        let status = Status::default().catalogue(&down).catalogue(&ok);
        assert_tone!(status, 0, Tone::Alarm);
        assert_tone!(status, 1, Tone::Fresh);
    }
}
