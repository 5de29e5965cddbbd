//! HTTP route handlers.

pub mod nfts;
pub mod qrcode;
