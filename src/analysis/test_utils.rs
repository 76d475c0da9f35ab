use super::{GenerativeModel, Sleep};
use crate::errors::ProviderError;
use crate::payload::ImagePayload;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const JPEG_DATA_URI: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

pub fn jpeg_payload() -> ImagePayload {
    ImagePayload::from_data_uri(JPEG_DATA_URI).unwrap()
}

pub fn overloaded() -> ProviderError {
    ProviderError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: r#"{"error":{"code":503,"message":"The model is overloaded. Please try again later.","status":"UNAVAILABLE"}}"#.to_string(),
    }
}

pub fn rejected() -> ProviderError {
    ProviderError::Status {
        status: StatusCode::BAD_REQUEST,
        body: r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#.to_string(),
    }
}

/// Replays a fixed list of outcomes; once exhausted it repeats the fallback.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: fn() -> Result<String, ProviderError>,
    calls: AtomicUsize,
    mime_types: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self::with_fallback(script, || Err(overloaded()))
    }

    pub fn with_fallback(
        script: Vec<Result<String, ProviderError>>,
        fallback: fn() -> Result<String, ProviderError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            mime_types: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn always_overloaded() -> Self {
        Self::new(vec![])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn mime_types(&self) -> Vec<String> {
        self.mime_types.lock().unwrap().clone()
    }
}

impl GenerativeModel for ScriptedModel {
    fn generate_content(
        &self,
        _prompt: &str,
        image: &ImagePayload,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mime_types
            .lock()
            .unwrap()
            .push(image.mime_type().to_string());
        let next = self.script.lock().unwrap().pop_front();
        ready(next.unwrap_or_else(self.fallback))
    }
}

/// Records requested delays instead of waiting for them.
#[derive(Default)]
pub struct RecordingSleep {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleep {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleep for RecordingSleep {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.delays.lock().unwrap().push(duration);
        ready(())
    }
}

impl Sleep for &RecordingSleep {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}

impl GenerativeModel for &ScriptedModel {
    fn generate_content(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        (**self).generate_content(prompt, image)
    }
}
