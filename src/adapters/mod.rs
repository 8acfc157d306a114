// Adapters layer: concrete implementations for external systems (storage, mail, http).

pub mod http;
pub mod mail;
pub mod storage;
