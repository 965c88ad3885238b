//! Presentation lookups for server enumerations.
//!
//! Weather names and stock buckets are two separate keyspaces. Both parse into
//! closed enums with an `Unknown` arm, so every lookup below is total.

use crate::{
    hex,
    model::{StockData, StockItem},
};
use iced::Color;
use std::collections::HashSet;
use tracing::warn;

pub const WEATHER_FALLBACK: &str = "🌤️";
pub const ITEM_FALLBACK: &str = "🌱";
pub const CATEGORY_FALLBACK: &str = "📦";

/// Unmapped keys already warned about. Lives as long as the component that
/// decodes them, so a torn down dashboard forgets them.
#[derive(Debug, Default)]
pub struct UnknownKeys(HashSet<String>);

impl UnknownKeys {
    /// Warns once per distinct `(keyspace, key)`. Returns whether it warned.
    pub fn report(&mut self, keyspace: &str, key: &str) -> bool {
        let fresh = self.0.insert(format!("{keyspace}:{key}"));
        if fresh {
            warn!(keyspace, key, "no presentation mapping, using fallback");
        }
        fresh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    DaySunny,
    Rain,
    Cloudy,
    Thunderstorm,
    Snow,
    FruitBowl,
    EggClutch,
    GardeningShears,
    Honeycomb,
    Lipstick,
}

impl Icon {
    pub const fn name(self) -> &'static str {
        match self {
            Self::DaySunny => "wi-day-sunny",
            Self::Rain => "wi-rain",
            Self::Cloudy => "wi-cloudy",
            Self::Thunderstorm => "wi-thunderstorm",
            Self::Snow => "wi-snow",
            Self::FruitBowl => "gi-fruit-bowl",
            Self::EggClutch => "gi-egg-clutch",
            Self::GardeningShears => "gi-gardening-shears",
            Self::Honeycomb => "gi-honeycomb",
            Self::Lipstick => "gi-lipstick",
        }
    }

    /// What gets drawn for the icon; we ship no icon font.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::DaySunny => "☀️",
            Self::Rain => "🌧️",
            Self::Cloudy => "☁️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "🌨️",
            Self::FruitBowl => "🍇",
            Self::EggClutch => "🥚",
            Self::GardeningShears => "✂️",
            Self::Honeycomb => "🍯",
            Self::Lipstick => "💄",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    #[default]
    None,
    Float,
    BounceSoft,
    Flash,
    Wiggle,
}

/// Offsets and highlight for one clock tick of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub dx: u16,
    pub dy: u16,
    pub highlight: bool,
}

impl Animation {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Float => "animate-float",
            Self::BounceSoft => "animate-bounce-soft",
            Self::Flash => "animate-flash",
            Self::Wiggle => "animate-wiggle",
        }
    }

    pub const fn frame(self, tick: u64) -> Frame {
        let none = Frame {
            dx: 0,
            dy: 0,
            highlight: false,
        };
        match self {
            Self::None => none,
            Self::Float => Frame {
                dy: [0, 2, 4, 2][(tick % 4) as usize],
                ..none
            },
            Self::BounceSoft => Frame {
                dy: if tick % 2 == 0 { 0 } else { 3 },
                ..none
            },
            Self::Flash => Frame {
                highlight: tick % 2 == 1,
                ..none
            },
            Self::Wiggle => Frame {
                dx: if tick % 2 == 0 { 0 } else { 3 },
                ..none
            },
        }
    }
}

/// Resolved look of an enumeration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub icon: Option<Icon>,
    pub fallback: &'static str,
    pub animation: Animation,
}

impl Presentation {
    pub fn glyph(&self) -> &'static str {
        self.icon.map_or(self.fallback, Icon::glyph)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum WeatherKind {
    #[default]
    Sunny,
    Rain,
    Cloudy,
    Thunderstorm,
    Snow,
    Frost,
    Night,
    Bloodmoon,
    MeteorShower,
    Bee,
    Unknown(String),
}

impl WeatherKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "Sunny" => Self::Sunny,
            "Rain" => Self::Rain,
            "Cloudy" => Self::Cloudy,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Frost" => Self::Frost,
            "Night" => Self::Night,
            "Bloodmoon" => Self::Bloodmoon,
            "Meteor Shower" => Self::MeteorShower,
            "Bee" => Self::Bee,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn presentation(&self) -> Presentation {
        let (icon, animation) = match self {
            Self::Sunny => (Some(Icon::DaySunny), Animation::Float),
            Self::Rain => (Some(Icon::Rain), Animation::BounceSoft),
            Self::Cloudy => (Some(Icon::Cloudy), Animation::Float),
            Self::Thunderstorm => (Some(Icon::Thunderstorm), Animation::Flash),
            Self::Snow | Self::Frost | Self::Night => {
                let icon = matches!(self, Self::Snow).then_some(Icon::Snow);
                (icon, Animation::Float)
            }
            Self::Bloodmoon => (None, Animation::Wiggle),
            Self::MeteorShower => (None, Animation::Flash),
            Self::Bee => (None, Animation::BounceSoft),
            Self::Unknown(_) => (None, Animation::None),
        };
        Presentation {
            icon,
            fallback: WEATHER_FALLBACK,
            animation,
        }
    }

    pub fn background(&self) -> Color {
        match self {
            Self::Sunny => hex!(0xfff8e1),
            Self::Rain => hex!(0xe3f2fd),
            Self::Cloudy => hex!(0xeceff1),
            Self::Thunderstorm => hex!(0xd1c4e9),
            Self::Snow | Self::Frost => hex!(0xf0f8ff),
            Self::Night => hex!(0xc5cae9),
            Self::Bloodmoon => hex!(0xffcdd2),
            Self::MeteorShower => hex!(0xffe0b2),
            Self::Bee => hex!(0xfff59d),
            Self::Unknown(_) => hex!(0xf1f8e9),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Seeds,
    Eggs,
    Gear,
    Honey,
    Cosmetics,
    Unknown(String),
}

impl CategoryKind {
    /// Render order of the stock cards.
    pub const ALL: [Self; 5] = [
        Self::Seeds,
        Self::Eggs,
        Self::Gear,
        Self::Honey,
        Self::Cosmetics,
    ];

    pub fn from_stock_key(key: &str) -> Self {
        match key {
            "seedsStock" => Self::Seeds,
            "eggStock" => Self::Eggs,
            "gearStock" => Self::Gear,
            "honeyStock" => Self::Honey,
            "cosmeticsStock" => Self::Cosmetics,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn from_restock_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.restock_key() == Some(key))
            .unwrap_or_else(|| Self::Unknown(key.to_owned()))
    }

    pub const fn restock_key(&self) -> Option<&'static str> {
        match self {
            Self::Seeds => Some("seeds"),
            Self::Eggs => Some("egg"),
            Self::Gear => Some("gear"),
            Self::Honey => Some("Event"),
            Self::Cosmetics => Some("cosmetic"),
            Self::Unknown(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Seeds => "Fruits & Seeds",
            Self::Eggs => "Eggs",
            Self::Gear => "Garden Gear",
            Self::Honey => "Bee Event",
            Self::Cosmetics => "Cosmetics",
            Self::Unknown(key) => key,
        }
    }

    pub fn presentation(&self) -> Presentation {
        let icon = match self {
            Self::Seeds => Some(Icon::FruitBowl),
            Self::Eggs => Some(Icon::EggClutch),
            Self::Gear => Some(Icon::GardeningShears),
            Self::Honey => Some(Icon::Honeycomb),
            Self::Cosmetics => Some(Icon::Lipstick),
            Self::Unknown(_) => None,
        };
        Presentation {
            icon,
            fallback: CATEGORY_FALLBACK,
            animation: Animation::None,
        }
    }
}

impl StockData {
    pub fn bucket(&self, kind: &CategoryKind) -> &[StockItem] {
        match kind {
            CategoryKind::Seeds => &self.seeds_stock,
            CategoryKind::Eggs => &self.egg_stock,
            CategoryKind::Gear => &self.gear_stock,
            CategoryKind::Honey => &self.honey_stock,
            CategoryKind::Cosmetics => &self.cosmetics_stock,
            CategoryKind::Unknown(_) => &[],
        }
    }
}

/// Load state of a remote item picture. `Failed` is final, the picture is
/// never requested again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState<H> {
    Loading,
    Loaded(H),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemGlyph<'a, H> {
    Image(&'a H),
    Emoji(&'a str),
    Default,
}

impl<H> ItemGlyph<'_, H> {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Image(_) => None,
            Self::Emoji(emoji) => Some(*emoji),
            Self::Default => Some(ITEM_FALLBACK),
        }
    }
}

/// Remote picture once it loaded, else the item's emoji, else the sprout.
pub fn item_glyph<'a, H>(item: &'a StockItem, image: Option<&'a ImageState<H>>) -> ItemGlyph<'a, H> {
    match (item.image.as_deref(), image) {
        (Some(_), Some(ImageState::Loaded(handle))) => ItemGlyph::Image(handle),
        _ => match item.emoji.as_deref() {
            Some(emoji) if !emoji.is_empty() => ItemGlyph::Emoji(emoji),
            _ => ItemGlyph::Default,
        },
    }
}
