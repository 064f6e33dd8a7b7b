//! Startup configuration: command-line flags with environment fallbacks,
//! validated into a [`Config`] before the server binds.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use attune_core::PromptTemplate;
use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("completion API key is missing; set OPEN_AI_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("allowed origin {0:?} must look like scheme://host[:port]")]
    InvalidOrigin(String),

    #[error("completion base URL {0:?} must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("completion model identifier is empty")]
    EmptyModel,

    #[error("completion timeout must be at least one second")]
    ZeroTimeout,

    #[error("cannot read style example {}: {source}", path.display())]
    StyleExample {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("style example {} is empty", .0.display())]
    EmptyStyleExample(PathBuf),

    #[error("embedding model produces {embedder}-dim vectors but the classifier expects {classifier}")]
    DimensionMismatch { embedder: usize, classifier: usize },
}

#[derive(Parser)]
#[command(name = "attune")]
#[command(version, about = "Classify patient statements and generate therapist-assistant advice")]
pub struct Args {
    /// API key for the completion provider
    #[arg(long, env = "OPEN_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Address to listen on
    #[arg(long, env = "ATTUNE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// The single browser origin allowed by CORS
    #[arg(long, env = "ATTUNE_ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Directory containing model.onnx and tokenizer.json
    #[arg(long, env = "ATTUNE_EMBEDDING_MODEL_DIR", default_value = "models/all-MiniLM-L6-v2")]
    pub embedding_model_dir: PathBuf,

    /// Classifier artifact (JSON)
    #[arg(long, env = "ATTUNE_CLASSIFIER", default_value = "models/classifier.json")]
    pub classifier: PathBuf,

    /// Model identifier sent to the completion provider
    #[arg(
        long,
        env = "ATTUNE_COMPLETION_MODEL",
        default_value = "ft:gpt-3.5-turbo-0125:personal:mental-health-data:Ag8EKMsD"
    )]
    pub completion_model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "ATTUNE_COMPLETION_BASE_URL", default_value = attune_llm::openai::DEFAULT_BASE_URL)]
    pub completion_base_url: String,

    /// Per-request timeout for completion calls, in seconds
    #[arg(long, env = "ATTUNE_COMPLETION_TIMEOUT_SECS", default_value_t = 60)]
    pub completion_timeout_secs: u64,

    /// File whose contents replace the built-in style example in the prompt
    #[arg(long, env = "ATTUNE_STYLE_EXAMPLE")]
    pub style_example: Option<PathBuf>,
}

/// Validated configuration.
pub struct Config {
    pub bind: SocketAddr,
    pub allowed_origin: HeaderValue,
    pub api_key: String,
    pub embedding_model_dir: PathBuf,
    pub classifier_path: PathBuf,
    pub completion_model: String,
    pub completion_base_url: String,
    pub completion_timeout: Duration,
    pub style_example: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let allowed_origin = parse_origin(&args.allowed_origin)?;

        let base_url = args.completion_base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let completion_model = args.completion_model.trim().to_string();
        if completion_model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if args.completion_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let style_example = args.style_example.map(read_style_example).transpose()?;

        Ok(Self {
            bind: args.bind,
            allowed_origin,
            api_key,
            embedding_model_dir: args.embedding_model_dir,
            classifier_path: args.classifier,
            completion_model,
            completion_base_url: base_url,
            completion_timeout: Duration::from_secs(args.completion_timeout_secs),
            style_example,
        })
    }

    pub fn prompt_template(&self) -> PromptTemplate {
        match &self.style_example {
            Some(example) => PromptTemplate::with_style_example(example.clone()),
            None => PromptTemplate::default(),
        }
    }
}

fn parse_origin(raw: &str) -> Result<HeaderValue, ConfigError> {
    let origin = raw.trim().trim_end_matches('/');
    let host = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() && !host.contains('/') => HeaderValue::from_str(origin)
            .map_err(|_| ConfigError::InvalidOrigin(raw.to_string())),
        _ => Err(ConfigError::InvalidOrigin(raw.to_string())),
    }
}

fn read_style_example(path: PathBuf) -> Result<String, ConfigError> {
    match std::fs::read_to_string(&path) {
        Ok(text) if text.trim().is_empty() => Err(ConfigError::EmptyStyleExample(path)),
        Ok(text) => Ok(text),
        Err(source) => Err(ConfigError::StyleExample { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["attune"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let config = Config::from_args(args(&["--api-key", "sk-test"])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.bind, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.allowed_origin, "http://localhost:3000");
        assert_eq!(
            config.completion_model,
            "ft:gpt-3.5-turbo-0125:personal:mental-health-data:Ag8EKMsD"
        );
        assert_eq!(config.completion_base_url, "https://api.openai.com/v1");
        assert_eq!(config.completion_timeout, Duration::from_secs(60));
        assert!(config.style_example.is_none());
        assert_eq!(
            config.prompt_template().style_example(),
            attune_core::prompt::DEFAULT_STYLE_EXAMPLE
        );
    }

    #[test]
    fn blank_api_key_rejected() {
        let err = Config::from_args(args(&["--api-key", "   "])).err().unwrap();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("OPEN_AI_API_KEY"));
    }

    #[test]
    fn origin_trailing_slash_trimmed() {
        let config = Config::from_args(args(&[
            "--api-key",
            "sk",
            "--allowed-origin",
            "https://dashboard.example.com/",
        ]))
        .unwrap();
        assert_eq!(config.allowed_origin, "https://dashboard.example.com");
    }

    #[test]
    fn origin_with_path_rejected() {
        let err = Config::from_args(args(&[
            "--api-key",
            "sk",
            "--allowed-origin",
            "http://localhost:3000/app",
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }

    #[test]
    fn origin_without_scheme_rejected() {
        let err = Config::from_args(args(&["--api-key", "sk", "--allowed-origin", "localhost:3000"]))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }

    #[test]
    fn base_url_needs_scheme() {
        let err = Config::from_args(args(&[
            "--api-key",
            "sk",
            "--completion-base-url",
            "api.openai.com/v1",
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = Config::from_args(args(&["--api-key", "sk", "--completion-timeout-secs", "0"]))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn empty_model_rejected() {
        let err = Config::from_args(args(&["--api-key", "sk", "--completion-model", " "]))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::EmptyModel));
    }

    #[test]
    fn style_example_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "You are not alone in this.").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config =
            Config::from_args(args(&["--api-key", "sk", "--style-example", &path])).unwrap();
        assert_eq!(
            config.prompt_template().style_example(),
            "You are not alone in this.\n"
        );
    }

    #[test]
    fn empty_style_example_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let err = Config::from_args(args(&["--api-key", "sk", "--style-example", &path]))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::EmptyStyleExample(_)));
    }

    #[test]
    fn missing_style_example_rejected() {
        let err = Config::from_args(args(&[
            "--api-key",
            "sk",
            "--style-example",
            "/nonexistent/example.txt",
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::StyleExample { .. }));
    }

    #[test]
    fn invalid_bind_rejected_by_parser() {
        assert!(Args::try_parse_from(["attune", "--bind", "not-an-addr"]).is_err());
    }
}
