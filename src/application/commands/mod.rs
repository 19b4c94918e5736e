//! Built-in commands

pub mod coinflip;
pub mod kudos;

use crate::domain::entities::{Command, CommandRegistry};
use crate::infrastructure::config::HandlersConfig;
use crate::infrastructure::images::ImageSearch;
use crate::infrastructure::quotes::QuoteService;

pub use coinflip::coinflip;
pub use kudos::kudos;

/// Register every built-in command
pub fn register_defaults(registry: &mut CommandRegistry, config: &HandlersConfig) {
    registry.register(Command::new("coinflip")
        .with_description("Flip a Coin - 'coinflip'")
        .with_usage("coinflip")
        .with_handler(coinflip));

    let quotes = QuoteService::new(&config.quote_url, config.timeout());
    registry.register(Command::new("stock")
        .with_description("Get a Stock Quote - 'stock AAPL'")
        .with_usage("stock TICKER")
        .with_handler(move |args| quotes.reply(args)));

    registry.register(Command::new("kudos")
        .with_description("Send kudos to a teammate - 'kudos @teammate'")
        .with_usage("kudos @teammate")
        .with_handler(kudos));

    let images = ImageSearch::new(&config.image_url, config.timeout());
    registry.register(Command::new("image")
        .with_description("Returns the first google image for query - 'image <query>'")
        .with_usage("image kittens")
        .with_handler(move |args| images.reply(args)));
}
