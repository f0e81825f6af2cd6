use std::sync::{Arc, Mutex};
use vc_bot::document::DocumentFetcher;

#[derive(Clone)]
pub struct MockDocumentFetcher {
    pub html: Arc<Mutex<String>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockDocumentFetcher {
    pub fn new(html: &str) -> Self {
        Self {
            html: Arc::new(Mutex::new(html.to_string())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl DocumentFetcher for MockDocumentFetcher {
    async fn fetch_document(&self, url: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.html.lock().unwrap().clone())
    }
}
