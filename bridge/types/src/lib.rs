mod address;
mod bank;
mod bytes;
mod channel;
mod config;
mod context;
mod crypto;
pub mod endpoint;
mod error;
mod events;
pub mod gateway;
pub mod hub;
mod ledger;
mod link;
mod message;
mod payload;
mod response;

pub use {
    address::*, bank::*, bytes::*, channel::*, config::*, context::*, crypto::*, error::*,
    events::*, ledger::*, link::*, message::*, payload::*, response::*,
};
