//! Client configuration

use hearth_printer::CodePage;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Printer the client sends kitchen tickets and receipts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    /// `host:port` or bare host (port 9100)
    pub addr: Option<String>,
    /// Characters per line: 32 for 58mm paper, 48 for 80mm
    pub paper_width: usize,
    pub code_page: CodePage,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            addr: None,
            paper_width: hearth_printer::WIDTH_80MM,
            code_page: CodePage::default(),
        }
    }
}

/// Push notification channel settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Heartbeat interval (zero disables heartbeats)
    pub heartbeat_interval: Duration,
    /// Capacity of the broadcast channel handed to subscribers
    pub buffer_size: usize,
    pub connect_timeout: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            buffer_size: 256,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl NotificationConfig {
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}

/// Client configuration for the Hearth back-office API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Push notification address (`host:port`)
    pub notify_addr: Option<String>,

    /// Default page size for list endpoints
    pub page_size: u32,

    pub printer: PrinterConfig,

    pub notification: NotificationConfig,

    pub log_level: String,

    /// Directory for daily log files; console only when unset
    pub log_dir: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            notify_addr: None,
            page_size: shared::request::DEFAULT_PAGE_SIZE,
            printer: PrinterConfig::default(),
            notification: NotificationConfig::default(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    /// Load from `HEARTH_*` environment variables, after reading `.env`
    ///
    /// Unset or unparsable values fall back to defaults; only an unknown code
    /// page is an error.
    pub fn from_env() -> ClientResult<Self> {
        let _ = dotenvy::dotenv();

        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            env("HEARTH_API_URL").unwrap_or_else(|| "http://localhost:8080/api".to_string()),
        );
        if let Some(timeout) = env("HEARTH_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = timeout;
        }
        config.notify_addr = env("HEARTH_NOTIFY_ADDR");
        if let Some(size) = env("HEARTH_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            config = config.with_page_size(size);
        }
        config.printer.addr = env("HEARTH_PRINTER_ADDR");
        if let Some(width) = env("HEARTH_PAPER_WIDTH").and_then(|v| v.parse().ok()) {
            config.printer.paper_width = width;
        }
        if let Some(code_page) = env("HEARTH_CODE_PAGE") {
            config.printer.code_page = code_page
                .parse()
                .map_err(|e: hearth_printer::PrintError| ClientError::Config(e.to_string()))?;
        }
        if let Some(level) = env("HEARTH_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = env("HEARTH_LOG_DIR");

        Ok(config)
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_notify_addr(mut self, addr: impl Into<String>) -> Self {
        self.notify_addr = Some(addr.into());
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(1, shared::request::MAX_PAGE_SIZE);
        self
    }

    pub fn with_printer(mut self, printer: PrinterConfig) -> Self {
        self.printer = printer;
        self
    }

    pub fn with_notification(mut self, notification: NotificationConfig) -> Self {
        self.notification = notification;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// First page of a list with the configured page size
    pub fn list_query(&self) -> shared::ListQuery {
        shared::ListQuery::default().with_limit(self.page_size)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
