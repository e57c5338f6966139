use std::{
    fmt,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::Duration,
};

use logger::{Color, Logger};

use crate::types::Lemon;

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Status(code) => write!(f, "Unexpected HTTP status: {}", code),
            FetchError::Parse(msg) => write!(f, "Invalid lemons payload: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// A source of lemons. The application uses [`HttpProvider`]; tests plug in
/// their own.
pub trait Provider {
    fn get_lemons(&mut self) -> Result<Vec<Lemon>, FetchError>;
}

/// Fetches the lemons list from a JSON endpoint with a blocking client.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpProvider {
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::blocking::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

impl Provider for HttpProvider {
    /// Issues a single GET; there is no retry.
    fn get_lemons(&mut self) -> Result<Vec<Lemon>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        parse_lemons(&body)
    }
}

/// Parses the endpoint payload, a JSON array of lemons.
pub fn parse_lemons(body: &str) -> Result<Vec<Lemon>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Loading flag and last error of the lemons fetch.
#[derive(Debug, Default)]
pub struct FetchState {
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl FetchState {
    fn begin(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Ends the fetch. A failure yields no lemons and keeps its message.
    fn finish(&mut self, result: Result<Vec<Lemon>, FetchError>) -> Vec<Lemon> {
        self.is_loading = false;
        match result {
            Ok(lemons) => lemons,
            Err(e) => {
                self.error_message = Some(e.to_string());
                Vec::new()
            }
        }
    }
}

/// Runs the one-shot fetch on a worker thread and hands the lemons back to
/// the UI thread.
pub struct LemonsLoader {
    receiver: Option<Receiver<Result<Vec<Lemon>, FetchError>>>,
    state: FetchState,
    logger: Logger,
}

impl LemonsLoader {
    pub fn spawn<P>(mut provider: P, logger: Logger) -> std::io::Result<Self>
    where
        P: Provider + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let thread_logger = logger.clone();

        thread::Builder::new()
            .name("lemons-fetcher".to_string())
            .spawn(move || {
                let _ = thread_logger.debug("Fetching lemons");
                let _ = sender.send(provider.get_lemons());
            })?;

        let mut state = FetchState::default();
        state.begin();

        Ok(Self {
            receiver: Some(receiver),
            state,
            logger,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message.as_deref()
    }

    /// Returns the lemons once the fetch has ended, then `None` forever.
    pub fn poll(&mut self) -> Option<Vec<Lemon>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(FetchError::Network(
                "fetcher thread stopped before answering".to_string(),
            )),
        };
        self.receiver = None;

        match &result {
            Ok(lemons) => {
                let _ = self.logger.info(
                    &format!("Fetched {} lemons", lemons.len()),
                    Color::Green,
                    true,
                );
            }
            Err(e) => {
                let _ = self
                    .logger
                    .error(&format!("Could not fetch lemons: {}", e), true);
            }
        }

        Some(self.state.finish(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        time::Instant,
    };

    const BODY: &str = r##"[
        {"id": 1, "color": "#FF0000", "title": "Red", "latitude": 55.75, "longitude": 37.61, "content": "a"},
        {"id": 2, "title": "Plain", "latitude": 55.76, "longitude": 37.62, "content": "b"}
    ]"##;

    struct FixedProvider(Result<Vec<Lemon>, FetchError>);

    impl Provider for FixedProvider {
        fn get_lemons(&mut self) -> Result<Vec<Lemon>, FetchError> {
            self.0.clone()
        }
    }

    fn test_logger(name: &str) -> Logger {
        let dir = std::env::temp_dir().join(format!("lemons_fetcher_{}", std::process::id()));
        Logger::new(&dir, name).expect("Failed to create logger")
    }

    fn local_provider(url: &str) -> HttpProvider {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        HttpProvider::with_client(client, url)
    }

    fn wait_for(loader: &mut LemonsLoader) -> Vec<Lemon> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(lemons) = loader.poll() {
                return lemons;
            }
            assert!(Instant::now() < deadline, "fetch did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Serves a single HTTP response on a local port and returns its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}/data.json", address)
    }

    #[test]
    fn test_parse_lemons() {
        let lemons = parse_lemons(BODY).unwrap();

        assert_eq!(lemons.len(), 2);
        assert_eq!(lemons[0].color.as_deref(), Some("#FF0000"));
        assert_eq!(lemons[1].color_or_default(), "#FFC700");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_lemons(r#"{"id": 1}"#),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_http_provider_fetches_lemons() {
        let url = serve_once("HTTP/1.1 200 OK", BODY);
        let mut provider = local_provider(&url);

        let lemons = provider.get_lemons().unwrap();

        assert_eq!(lemons.len(), 2);
        assert_eq!(lemons[1].title, "Plain");
    }

    #[test]
    fn test_http_provider_reports_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "");
        let mut provider = local_provider(&url);

        assert_eq!(provider.get_lemons(), Err(FetchError::Status(404)));
    }

    #[test]
    fn test_http_provider_reports_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let mut provider = local_provider(&format!("http://{}/", address));

        assert!(matches!(
            provider.get_lemons(),
            Err(FetchError::Network(_))
        ));
    }

    #[test]
    fn test_loader_delivers_lemons_once() {
        let lemons = parse_lemons(BODY).unwrap();
        let mut loader =
            LemonsLoader::spawn(FixedProvider(Ok(lemons.clone())), test_logger("ok")).unwrap();
        assert!(loader.is_loading());

        assert_eq!(wait_for(&mut loader), lemons);
        assert!(!loader.is_loading());
        assert_eq!(loader.error_message(), None);
        assert_eq!(loader.poll(), None);
    }

    #[test]
    fn test_loader_failure_yields_no_lemons() {
        let mut loader = LemonsLoader::spawn(
            FixedProvider(Err(FetchError::Network("offline".to_string()))),
            test_logger("failure"),
        )
        .unwrap();

        assert!(wait_for(&mut loader).is_empty());
        assert!(!loader.is_loading());
        assert_eq!(loader.error_message(), Some("Network error: offline"));
    }
}
