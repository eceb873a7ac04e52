use super::error::FetchError;
use super::http::Fetch;
use super::types::FetchResult;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use url::Url;

type Response = Result<FetchResult, FetchError>;

/// In-memory [`Fetch`] double. Unscripted URLs fail with a network error.
///
/// A scripted sequence is consumed one response per call; its last response repeats.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<Response>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, url: &str, response: Response) -> Self {
        self.respond_sequence(url, vec![response])
    }

    pub(crate) fn respond_sequence(self, url: &str, responses: Vec<Response>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self, url: &str) -> Response {
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FetchError::network("empty script"))),
            None => Err(FetchError::network(format!("no route to {url}"))),
        }
    }
}

impl Fetch for ScriptedFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Response> + Send {
        self.calls.lock().unwrap().push(url.to_string());
        let response = self.next_response(url.as_str());
        async move { response }
    }
}
