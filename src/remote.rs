//! Loading palettes from online services (Colormind, COLOURlovers).
//!
//! The HTTP exchange itself is left to a [`Transport`] supplied by the
//! host.  A [`Loader`] runs the request on a worker thread and hands
//! back a [`Pending`] value which is waited on with a bounded delay,
//! polled, canceled, or given success/failure continuations.

use std::{sync::{atomic::{AtomicBool, Ordering}, mpsc::{self, Receiver,
                                                         RecvTimeoutError,
                                                         TryRecvError},
                 Arc},
          thread::{self, JoinHandle},
          time::{Duration, Instant}};
use log::{debug, warn};
use rand::Rng;
use rgb::RGBA;
use serde::Deserialize;
use crate::{error::FetchError, Palette, RGBColor};

pub const COLORMIND_API_URL: &str = "http://colormind.io/api/";
pub const COLOURLOVERS_API_URL: &str =
    "http://www.colourlovers.com/api/palettes/top?format=json&numResults=1&resultOffset=";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method { Get, Post }

/// An HTTP request to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

/// Performs requests and returns the body of the answer.
pub trait Transport: Send + Sync + 'static {
    fn request(&self, request: &Request) -> Result<String, FetchError>;
}

/// Endpoints and delays used by a [`Loader`].
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// How long [`Pending::wait`] waits for an answer.
    pub timeout: Duration,
    pub colormind_url: String,
    /// Prefix to which a random result offset is appended.
    pub colourlovers_url: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig { timeout: Duration::from_secs(5),
                       colormind_url: COLORMIND_API_URL.to_string(),
                       colourlovers_url: COLOURLOVERS_API_URL.to_string() }
    }
}

/// Cancellation flag shared with the worker thread.
#[derive(Debug, Default, Clone)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn is_canceled(&self) -> bool { self.0.load(Ordering::Acquire) }

    pub fn cancel(&self) { self.0.store(true, Ordering::Release) }
}

/// A value being computed on another thread.
#[derive(Debug)]
pub struct Pending<V> {
    rx: Receiver<Result<V, FetchError>>,
    // Answer taken from `rx` by `try_get`.
    received: Option<Result<V, FetchError>>,
    cancel: Cancel,
    timeout: Duration,
    deadline: Instant,
}

impl<V: Send + 'static> Pending<V> {
    /// Run `f` on a worker thread.  The timeout starts now.
    pub fn spawn<F>(timeout: Duration, f: F) -> Self
    where F: FnOnce(&Cancel) -> Result<V, FetchError> + Send + 'static {
        let (tx, rx) = mpsc::channel();
        let cancel = Cancel::default();
        let flag = cancel.clone();
        let spawned = thread::Builder::new()
            .name("palette-loader".into())
            .spawn({
                let tx = tx.clone();
                move || {
                    let r = if flag.is_canceled() { Err(FetchError::Canceled) }
                            else { f(&flag) };
                    let r = if flag.is_canceled() { Err(FetchError::Canceled) }
                            else { r };
                    // The receiver may be gone (timeout); nothing to do then.
                    let _ = tx.send(r);
                }
            });
        if let Err(e) = spawned {
            let _ = tx.send(Err(FetchError::Http(format!("cannot start loader: {e}"))));
        }
        Pending { rx, received: None, cancel, timeout,
                  deadline: Instant::now() + timeout }
    }

    /// An already available result.
    pub fn ready(result: Result<V, FetchError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Pending { rx, received: None, cancel: Cancel::default(),
                  timeout: Duration::ZERO, deadline: Instant::now() }
    }

    /// Block until the value arrives or the configured delay expires.
    /// A result already seen by [`try_get`][Pending::try_get] is
    /// returned at once.
    pub fn wait(mut self) -> Result<V, FetchError> {
        if self.cancel.is_canceled() {
            warn!("palette request canceled");
            return Err(FetchError::Canceled)
        }
        if let Some(r) = self.received.take() { return r }
        let left = self.deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(left) {
            Ok(r) => r,
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                warn!("no answer after {:?}", self.timeout);
                Err(FetchError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(worker_vanished()),
        }
    }

    /// Like [`wait`][Pending::wait] but falls back on `fallback` when
    /// the value cannot be obtained.
    pub fn wait_or(self, fallback: V) -> V {
        self.wait().unwrap_or_else(|e| {
            warn!("{e}; using the fallback");
            fallback
        })
    }

    /// The result if it is already there.  Does not look at the
    /// deadline.  The result is kept, so it can be polled again or
    /// obtained by value with [`wait`][Pending::wait].
    pub fn try_get(&mut self) -> Option<&Result<V, FetchError>> {
        if self.cancel.is_canceled() {
            self.received = Some(Err(FetchError::Canceled));
        } else if self.received.is_none() {
            self.received = match self.rx.try_recv() {
                Ok(r) => Some(r),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(worker_vanished())),
            };
        }
        self.received.as_ref()
    }

    /// Ask the worker to drop its result.  Later waits fail with
    /// [`FetchError::Canceled`].
    pub fn cancel(&self) { self.cancel.cancel() }

    pub fn is_canceled(&self) -> bool { self.cancel.is_canceled() }

    /// Wait on another thread and call `on_success` or `on_failure`.
    pub fn then<S, E>(self, on_success: S, on_failure: E) -> JoinHandle<()>
    where S: FnOnce(V) + Send + 'static,
          E: FnOnce(FetchError) + Send + 'static {
        thread::spawn(move || match self.wait() {
            Ok(v) => on_success(v),
            Err(e) => on_failure(e),
        })
    }
}

fn worker_vanished() -> FetchError {
    FetchError::Http("loader thread stopped without an answer".into())
}

/// Fetches palettes through a [`Transport`].
pub struct Loader<T> {
    transport: Arc<T>,
    config: LoaderConfig,
}

impl<T: Transport> Loader<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, LoaderConfig::default())
    }

    pub fn with_config(transport: T, config: LoaderConfig) -> Self {
        Loader { transport: Arc::new(transport), config }
    }

    pub fn config(&self) -> &LoaderConfig { &self.config }

    /// The request asking Colormind for a random 5-color palette.
    pub fn colormind_request(&self) -> Request {
        Request { method: Method::Post, url: self.config.colormind_url.clone(),
                  body: Some(r#"{"model":"default"}"#.to_string()) }
    }

    /// The request for one of the top 50 COLOURlovers palettes.
    pub fn colourlovers_request<R: Rng + ?Sized>(&self, rng: &mut R) -> Request {
        let offset: u32 = rng.gen_range(1 ..= 50);
        Request { method: Method::Get,
                  url: format!("{}{offset}", self.config.colourlovers_url),
                  body: None }
    }

    pub fn load_colormind<Color>(&self) -> Pending<Palette<Color>>
    where Color: RGBColor + Send + 'static {
        self.load(self.colormind_request(), parse_colormind)
    }

    pub fn load_colourlovers<Color>(&self) -> Pending<Palette<Color>>
    where Color: RGBColor + Send + 'static {
        self.load(self.colourlovers_request(&mut rand::thread_rng()),
                  parse_colourlovers)
    }

    fn load<Color>(&self, request: Request,
                   parse: fn(&str) -> Result<Palette<Color>, FetchError>)
                   -> Pending<Palette<Color>>
    where Color: RGBColor + Send + 'static {
        let transport = Arc::clone(&self.transport);
        debug!("{:?} {}", request.method, request.url);
        Pending::spawn(self.config.timeout, move |_| {
            let body = transport.request(&request)?;
            parse(&body)
        })
    }
}

#[derive(Deserialize)]
struct ColormindAnswer {
    result: Vec<[f64; 3]>,
}

#[derive(Deserialize)]
struct ColourLoversPalette {
    colors: Vec<String>,
}

/// Read a Colormind answer, `{"result": [[r, g, b], …]}`.
pub fn parse_colormind<Color: RGBColor>(body: &str) -> Result<Palette<Color>, FetchError> {
    let answer: ColormindAnswer = serde_json::from_str(body)?;
    Ok(answer.result.into_iter()
       .map(|[r, g, b]| Color::from_rgba(RGBA { r, g, b, a: 255. }))
       .collect())
}

/// Read a COLOURlovers answer, `[{"colors": ["rrggbb", …], …}]`,
/// possibly wrapped in a JSONP callback.  The first palette is used.
pub fn parse_colourlovers<Color: RGBColor>(body: &str) -> Result<Palette<Color>, FetchError> {
    let answer: Vec<ColourLoversPalette> = serde_json::from_str(strip_jsonp(body))?;
    let first = answer.into_iter().next()
        .ok_or_else(|| FetchError::Parse("no palette in the answer".into()))?;
    first.colors.iter()
        .map(|hex| Color::parse(hex).map_err(|e| FetchError::Parse(e.to_string())))
        .collect()
}

/// `callback([...]);` → `[...]`
fn strip_jsonp(body: &str) -> &str {
    let body = body.trim();
    match (body.find('('), body.find(|c| c == '[' || c == '{')) {
        (Some(open), Some(json)) if open < json => {
            let inner = body[open + 1 ..].trim_end().trim_end_matches(';');
            inner.strip_suffix(')').unwrap_or(inner)
        }
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use rgb::RGB8;
    use std::sync::Mutex;

    struct Scripted {
        answer: Result<String, FetchError>,
        delay: Duration,
        seen: Mutex<Vec<Request>>,
    }

    impl Scripted {
        fn new(answer: Result<&str, FetchError>, delay_ms: u64) -> Self {
            Scripted { answer: answer.map(String::from),
                       delay: Duration::from_millis(delay_ms),
                       seen: Mutex::new(Vec::new()) }
        }
    }

    impl Transport for Scripted {
        fn request(&self, request: &Request) -> Result<String, FetchError> {
            if let Ok(mut seen) = self.seen.lock() { seen.push(request.clone()) }
            thread::sleep(self.delay);
            self.answer.clone()
        }
    }

    const COLORMIND: &str = r#"{"result":[[49,47,49],[91,83,81],[133,155,143],[226,209,172],[235,110,76]]}"#;
    const LOVERS: &str = r#"[{"id":92095,"title":"Giant Goldfish","colors":["69D2E7","A7DBD8","E0E4CC","F38630","FA6900"]}]"#;

    fn config(timeout_ms: u64) -> LoaderConfig {
        LoaderConfig { timeout: Duration::from_millis(timeout_ms), ..Default::default() }
    }

    #[test]
    fn parse_answers() {
        let p: Palette<RGB8> = parse_colormind(COLORMIND).unwrap();
        assert_eq!(p.len(), 5);
        assert_eq!(p.get(4), Ok(&RGB8::new(235, 110, 76)));
        let p: Palette<RGB8> = parse_colourlovers(LOVERS).unwrap();
        assert_eq!(p.to_hex_string(), "69d2e7-a7dbd8-e0e4cc-f38630-fa6900");
        let wrapped = format!("callback({LOVERS});");
        let q: Palette<RGB8> = parse_colourlovers(&wrapped).unwrap();
        assert_eq!(p, q);
        assert!(matches!(parse_colourlovers::<RGB8>("[]"), Err(FetchError::Parse(_))));
        assert!(matches!(parse_colormind::<RGB8>("<html>"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn requests() {
        let loader = Loader::new(Scripted::new(Ok(""), 0));
        let r = loader.colormind_request();
        assert_eq!(r.method, Method::Post);
        assert_eq!(r.url, COLORMIND_API_URL);
        let r = loader.colourlovers_request(&mut StdRng::seed_from_u64(5));
        let offset: u32 = r.url.strip_prefix(COLOURLOVERS_API_URL).unwrap()
            .parse().unwrap();
        assert!((1 ..= 50).contains(&offset));
    }

    #[test]
    fn load_success() {
        let loader = Loader::with_config(Scripted::new(Ok(COLORMIND), 0), config(2000));
        let p: Palette<RGB8> = loader.load_colormind().wait().unwrap();
        assert_eq!(p.len(), 5);
        assert_eq!(p.index(), Some(0));
        let seen = loader.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"model":"default"}"#));
    }

    #[test]
    fn load_timeout_and_fallback() {
        let loader = Loader::with_config(Scripted::new(Ok(LOVERS), 300), config(10));
        let r = loader.load_colourlovers::<RGB8>().wait();
        assert_eq!(r.unwrap_err(), FetchError::Timeout(Duration::from_millis(10)));
        let local: Palette<RGB8> = "000000-ffffff".parse().unwrap();
        let p = loader.load_colourlovers().wait_or(local.clone());
        assert_eq!(p, local);
    }

    #[test]
    fn transport_failure() {
        let err = FetchError::Http("503".into());
        let loader = Loader::with_config(Scripted::new(Err(err.clone()), 0), config(2000));
        assert_eq!(loader.load_colormind::<RGB8>().wait().unwrap_err(), err);
    }

    #[test]
    fn cancel() {
        let loader = Loader::with_config(Scripted::new(Ok(COLORMIND), 50), config(2000));
        let mut pending = loader.load_colormind::<RGB8>();
        pending.cancel();
        assert!(pending.is_canceled());
        assert!(matches!(pending.try_get(), Some(Err(FetchError::Canceled))));
        assert_eq!(pending.wait().unwrap_err(), FetchError::Canceled);
    }

    #[test]
    fn continuations() {
        let (tx, rx) = mpsc::channel();
        let ok = Pending::ready(Ok(3));
        let tx1 = tx.clone();
        ok.then(move |v| { let _ = tx1.send(Ok(v)); },
                |_| panic!("unexpected failure")).join().unwrap();
        let failed: Pending<i32> = Pending::ready(Err(FetchError::Canceled));
        failed.then(|_| panic!("unexpected success"),
                    move |e| { let _ = tx.send(Err(e)); }).join().unwrap();
        assert_eq!(rx.recv().unwrap(), Ok(3));
        assert_eq!(rx.recv().unwrap(), Err(FetchError::Canceled));
    }

    #[test]
    fn polling() {
        let mut pending = Pending::spawn(Duration::from_secs(2), |_| Ok(7));
        let deadline = Instant::now() + Duration::from_secs(2);
        while pending.try_get().is_none() {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(pending.try_get(), Some(&Ok(7)));
        // Polling does not consume the answer.
        assert_eq!(pending.wait(), Ok(7));
    }
}
