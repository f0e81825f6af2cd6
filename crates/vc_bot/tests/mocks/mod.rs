#![allow(dead_code)]

pub mod channel_scraper;
pub mod completer;
pub mod document_fetcher;
pub mod http_server;
pub mod transcript_fetcher;
