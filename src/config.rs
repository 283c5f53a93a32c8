use clap::{Args, Parser};
use tracing::Level;

/// Command line and environment configuration for the server.
#[derive(Clone, Debug, Parser)]
#[command(name = "adgen_server", about, version)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "ADGEN_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    #[arg(long, env = "ADGEN_MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// Name of the MongoDB database holding users, products and campaigns.
    #[arg(long, env = "ADGEN_DATABASE", default_value = "adgen")]
    pub database: String,

    #[arg(long, env = "ADGEN_LOG_LEVEL", default_value = "debug")]
    pub log_level: Level,

    #[command(flatten)]
    pub generation: GenerationConfig,

    #[command(flatten)]
    pub upload: UploadConfig,
}

#[derive(Clone, Debug, Args)]
#[command(next_help_heading = "Text generation")]
pub struct GenerationConfig {
    /// API key for the chat completions backend. Generation is disabled
    /// when unset.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    pub openai_api_base: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,
}

#[derive(Clone, Debug, Args)]
#[command(next_help_heading = "Uploads")]
pub struct UploadConfig {
    /// Directory served as `/static`; uploads go to its `uploads` subdirectory.
    #[arg(long, env = "ADGEN_STATIC_DIR", default_value = "./static")]
    pub static_dir: std::path::PathBuf,

    /// Base URL clients use to reach this server, used in returned file URLs.
    #[arg(long, env = "API_URL", default_value = "http://127.0.0.1:8000")]
    pub public_url: String,

    /// Maximum accepted upload size in bytes.
    #[arg(long, env = "ADGEN_UPLOAD_LIMIT", default_value_t = 10 * 1024 * 1024)]
    pub upload_limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_are_parsed() {
        let config = Config::try_parse_from([
            "adgen_server",
            "--bind",
            "0.0.0.0:9000",
            "--mongodb-uri",
            "mongodb://db:27017",
            "--database",
            "adgen_test",
            "--log-level",
            "info",
            "--openai-api-key",
            "sk-test",
            "--openai-api-base",
            "http://localhost:11434/v1",
            "--openai-model",
            "llama3",
            "--static-dir",
            "/srv/static",
            "--public-url",
            "https://ads.example.com",
            "--upload-limit",
            "2048",
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.mongodb_uri, "mongodb://db:27017");
        assert_eq!(config.database, "adgen_test");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.generation.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generation.openai_api_base, "http://localhost:11434/v1");
        assert_eq!(config.generation.openai_model, "llama3");
        assert_eq!(config.upload.static_dir, std::path::PathBuf::from("/srv/static"));
        assert_eq!(config.upload.public_url, "https://ads.example.com");
        assert_eq!(config.upload.upload_limit, 2048);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let result = Config::try_parse_from(["adgen_server", "--log-level", "loud"]);

        assert!(result.is_err());
    }
}
