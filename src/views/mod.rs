pub mod status;
pub mod stock;
pub mod weather;

pub use status::{Catalogue, Status};
pub use stock::StockTable;
pub use weather::WeatherCard;
