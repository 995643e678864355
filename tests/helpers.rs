// Shared test helpers: scripted probers for scheduler and end-to-end tests.
//
// These probers never touch the network. Answers are looked up by endpoint URL
// and every call is recorded, so tests can assert on call counts and the
// number of probes in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use domain_reach::{Endpoint, ProbeAttempt, Prober};

/// How a scripted endpoint behaves.
#[derive(Clone)]
#[allow(dead_code)] // Not every test file uses every variant
pub enum Script {
    /// Respond with a status after the given latency
    Respond(u16, Duration),
    /// Fail with an error description after the given latency
    Fail(String, Duration),
    /// Panic inside the probe
    Panic,
}

/// Prober answering from a per-URL script, with a default for unknown URLs.
pub struct ScriptedProber {
    scripts: HashMap<String, Script>,
    default: Script,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)] // Used by other test files
impl ScriptedProber {
    pub fn new(default: Script) -> Self {
        Self {
            scripts: HashMap::new(),
            default,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == url).count()
    }

    /// Highest number of probes observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeAttempt {
        let url = endpoint.url();
        self.calls.lock().unwrap().push(url.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let script = self.scripts.get(&url).unwrap_or(&self.default).clone();
        let attempt = match script {
            Script::Respond(status, latency) => {
                tokio::time::sleep(latency).await;
                ProbeAttempt::reachable(endpoint.clone(), status, latency, 0)
            }
            Script::Fail(error, latency) => {
                tokio::time::sleep(latency).await;
                ProbeAttempt::unreachable(endpoint.clone(), error, latency, 1)
            }
            Script::Panic => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                panic!("scripted panic for {url}");
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        attempt
    }
}

/// `count` distinct, valid domain strings.
#[allow(dead_code)] // Used by other test files
pub fn domains(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("d{i}.example")).collect()
}
