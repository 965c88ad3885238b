use crate::{
    columee, countdown,
    model::{StockBoard, StockItem},
    reconcile::{Outcome, Reconciler},
    resolve::{item_glyph, CategoryKind, ImageState, ItemGlyph, UnknownKeys},
    row,
    utils::Result,
    Client,
};
use futures::try_join;
use iced::{
    alignment::Horizontal, theme, widget, Alignment, Background, Color, Element, Length, Theme,
};
use iced_native::{
    image,
    widget::{
        helpers::{column, container, image as picture, text},
        tooltip::Position,
    },
    Command,
};
use iced_style::container::Appearance;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Message {
    Poll,
    Fetched(Result<StockBoard>),
    ImageLoaded(String, Result<image::Handle>),
}

#[derive(Debug)]
pub struct StockTable {
    reconciler: Reconciler<StockBoard>,
    images: HashMap<String, ImageState<image::Handle>>,
    unknown: UnknownKeys,
    client: Arc<Client>,
}

const CARDS_PER_ROW: usize = 3;

fn styled(style: fn(&Theme) -> Appearance) -> theme::Container {
    theme::Container::Custom(Box::new(style))
}

fn card(_: &Theme) -> Appearance {
    Appearance {
        background: Some(Background::Color(crate::hex!(0xf1f8e9))),
        border_radius: 16.0,
        border_width: 1.0,
        border_color: crate::hex!(0xc8e6c9),
        ..Appearance::default()
    }
}

fn line(_: &Theme) -> Appearance {
    Appearance {
        background: Some(Background::Color(Color::WHITE)),
        border_radius: 10.0,
        border_width: 1.0,
        border_color: crate::hex!(0xc8e6c9),
        ..Appearance::default()
    }
}

fn badge(_: &Theme) -> Appearance {
    Appearance {
        background: Some(Background::Color(crate::hex!(0xc8e6c9))),
        border_radius: 6.0,
        ..Appearance::default()
    }
}

impl StockTable {
    async fn fetch_board(client: Arc<Client>) -> Result<StockBoard> {
        let (stock, restock) = try_join!(client.stock(), client.restock_times())?;
        Ok(StockBoard { stock, restock })
    }

    async fn fetch_image(client: Arc<Client>, url: String) -> Result<image::Handle> {
        client
            .image_bytes(&url)
            .await
            .map(|b| b.as_ref().to_vec())
            .map(image::Handle::from_memory)
    }

    pub fn new(client: Arc<Client>) -> Self {
        Self {
            reconciler: Reconciler::new("stock"),
            images: HashMap::new(),
            unknown: UnknownKeys::default(),
            client,
        }
    }

    pub const fn reconciler(&self) -> &Reconciler<StockBoard> {
        &self.reconciler
    }

    /// Warns about buckets and restock keys that have no card.
    fn audit_keys(unknown: &mut UnknownKeys, board: &StockBoard) {
        let buckets = board
            .stock
            .other
            .iter()
            .filter(|(_, value)| value.is_array())
            .map(|(key, _)| ("stock bucket", CategoryKind::from_stock_key(key)));
        let restocks = board
            .restock
            .keys()
            .map(|key| ("restock key", CategoryKind::from_restock_key(key)));

        for (keyspace, kind) in buckets.chain(restocks) {
            if let CategoryKind::Unknown(key) = kind {
                unknown.report(keyspace, &key);
            }
        }
    }

    /// Forgets pictures no longer on the board and starts a load for every
    /// picture not seen before. Failed pictures stay failed while listed.
    fn request_images(&mut self) -> Command<Message> {
        let Some(board) = self.reconciler.snapshot() else {
            return Command::none();
        };

        let listed: HashSet<&String> = CategoryKind::ALL
            .iter()
            .flat_map(|kind| board.stock.bucket(kind))
            .filter_map(|item| item.image.as_ref())
            .filter(|url| !url.is_empty())
            .collect();
        self.images.retain(|url, _| listed.contains(url));

        let fresh: Vec<String> = listed
            .into_iter()
            .filter(|url| !self.images.contains_key(*url))
            .cloned()
            .collect();

        let commands = fresh.into_iter().map(|url| {
            self.images.insert(url.clone(), ImageState::Loading);
            let client = Arc::clone(&self.client);
            Command::perform(
                async move {
                    let result = Self::fetch_image(client, url.clone()).await;
                    (url, result)
                },
                |(url, result)| Message::ImageLoaded(url, result),
            )
        });
        Command::batch(commands.collect::<Vec<_>>())
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Poll => {
                self.reconciler.begin();
                let client = Arc::clone(&self.client);
                Command::perform(Self::fetch_board(client), Message::Fetched)
            }
            Message::Fetched(result) => {
                if self.reconciler.complete(result) == Outcome::Updated {
                    if let Some(board) = self.reconciler.snapshot() {
                        Self::audit_keys(&mut self.unknown, board);
                    }
                    self.request_images()
                } else {
                    Command::none()
                }
            }
            Message::ImageLoaded(url, result) => {
                let state = match result {
                    Ok(handle) => ImageState::Loaded(handle),
                    Err(error) => {
                        debug!(%url, %error, "item image failed, falling back");
                        ImageState::Failed
                    }
                };
                // dropped from the board while loading
                if let Some(slot) = self.images.get_mut(&url) {
                    *slot = state;
                }
                Command::none()
            }
        }
    }

    pub fn view(&self, now_ms: i64) -> Element<'_, Message> {
        let Some(board) = self.reconciler.snapshot() else {
            return container(columee![
                text("Current Stock").size(28),
                text("Loading your garden items..."),
            ])
            .padding(20)
            .width(Length::Fill)
            .style(styled(card))
            .into();
        };

        let cards: Vec<Element<_>> = CategoryKind::ALL
            .iter()
            .map(|kind| self.category(board, kind, now_ms))
            .collect();

        let mut rows = Vec::new();
        let mut cards = cards.into_iter().peekable();
        while cards.peek().is_some() {
            let chunk: Vec<Element<_>> = cards.by_ref().take(CARDS_PER_ROW).collect();
            rows.push(iced::widget::Row::with_children(chunk).spacing(16).into());
        }

        column(rows).spacing(16).into()
    }

    fn category<'a>(
        &'a self,
        board: &'a StockBoard,
        kind: &CategoryKind,
        now_ms: i64,
    ) -> Element<'a, Message> {
        let look = kind.presentation();
        let restock = kind
            .restock_key()
            .and_then(|key| board.restock.get(key))
            .and_then(|entry| entry.timestamp);

        let items = board.stock.bucket(kind);
        let body: Element<_> = if items.is_empty() {
            text("No items in stock. Check back soon!")
                .style(Color::from_rgb(0.6, 0.6, 0.6))
                .into()
        } else {
            column(items.iter().map(|item| self.item(item)).collect())
                .spacing(8)
                .into()
        };

        let head = columee![
            row![
                widget::tooltip(
                    text(look.glyph()).size(22),
                    look.icon.map_or("", |icon| icon.name()),
                    Position::FollowCursor
                ),
                text(kind.label()).size(22),
            ]
            .spacing(6)
            .align_items(Alignment::Center),
            row![
                text("Next Restock:").size(14),
                container(text(countdown::until(restock, now_ms)).size(14))
                    .padding([2, 8])
                    .style(styled(badge)),
            ]
            .spacing(6)
            .align_items(Alignment::Center),
        ]
        .spacing(4);

        container(columee![head, body].spacing(12))
            .padding(16)
            .width(Length::FillPortion(1))
            .style(styled(card))
            .into()
    }

    fn item<'a>(&'a self, item: &'a StockItem) -> Element<'a, Message> {
        let state = item.image.as_ref().and_then(|url| self.images.get(url));
        let glyph: Element<_> = match item_glyph(item, state) {
            ItemGlyph::Image(handle) => picture(handle.clone())
                .width(Length::Units(40))
                .height(Length::Units(40))
                .into(),
            fallback => text(fallback.text().unwrap_or_default())
                .size(28)
                .width(Length::Units(40))
                .horizontal_alignment(Horizontal::Center)
                .into(),
        };

        container(
            row![
                glyph,
                text(&item.name).size(17).width(Length::Fill),
                text(format!("Stock: {}", item.quantity))
                    .size(16)
                    .style(Color::from_rgb(0.18, 0.49, 0.2)),
            ]
            .spacing(12)
            .align_items(Alignment::Center),
        )
        .padding([8, 14])
        .width(Length::Fill)
        .style(styled(line))
        .into()
    }
}
