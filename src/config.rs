use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Endpoint the view reads from when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001";

/// Config file picked up from the working directory when `--config` is absent.
const CWD_CONFIG_FILE: &str = "config.yaml";

/// Prefix for `MESSAGES_VIEW__SECTION__KEY` environment overrides.
const ENV_PREFIX: &str = "MESSAGES_VIEW";

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Message endpoint to fetch from
    #[arg(long, env = "MESSAGES_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Render the view once to stdout and exit
    #[arg(long)]
    pub once: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub endpoint: EndpointConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a page request waits for its view to settle.
    pub render_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_ms: u64,
    /// Treat non-2xx responses as failures instead of parsing them.
    pub require_success_status: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
            require_success_status: false,
        }
    }
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layer defaults, config file, environment and CLI flags, lowest first.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.render_timeout_ms", 5000)?
            .set_default("endpoint.url", DEFAULT_ENDPOINT)?
            .set_default("endpoint.timeout_ms", 10_000)?
            .set_default("endpoint.require_success_status", false)?
            .set_default("logging.format", LogFormat::default().as_str())?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(PathBuf::from(path)));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)));
        }

        // E.g. MESSAGES_VIEW__ENDPOINT__URL=http://localhost:5002
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.endpoint {
            builder = builder.set_override("endpoint.url", url.as_str())?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format.as_str())?;
        }

        builder.build()?.try_deserialize()
    }
}
