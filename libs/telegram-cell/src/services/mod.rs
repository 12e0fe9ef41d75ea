pub mod client;
pub mod dispatcher;
pub mod render;

pub use client::TelegramClient;
pub use dispatcher::{BotDispatcher, Inbound, InboundEvent};
pub use render::{ChatTarget, RenderTarget};
