use std::sync::{Arc, Mutex};
use vc_bot::Completer;

#[derive(Clone)]
pub struct MockCompleter {
    pub answer: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockCompleter {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            answer: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Completer for MockCompleter {
    const DEFAULT_MODEL: &'static str = "mock-gpt";
    type Error = anyhow::Error;

    async fn complete(
        &self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.answer.clone())
    }
}
