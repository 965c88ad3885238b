/// Creates a `Column` with the given children.
#[macro_export]
macro_rules! columee {
    () => (
        iced::widget::Column::new()
    );
    ($($x:expr),+ $(,)?) => (
        iced::widget::Column::with_children(vec![$(iced::Element::from($x)),+])
    );
}

/// Creates a `Row` with the given children.
#[macro_export]
macro_rules! row {
    () => (
        iced::widget::Row::new()
    );
    ($($x:expr),+ $(,)?) => (
        iced::widget::Row::with_children(vec![$(iced::Element::from($x)),+])
    );
}

/// Turns a hex literal into an `iced::Color` at compile time.
#[macro_export]
macro_rules! hex {
    ($($tt:tt)*) => {{
        let [r, g, b]: [u8; 3] = hex_colors::color_from_hex!($($tt)*);
        iced::Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }};
}
