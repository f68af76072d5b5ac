// src/config.rs

//! Módulo de configuração para o Tableau-MCP-Server.
//!
//! Define as estruturas para carregar as configurações da aplicação a partir
//! de um arquivo TOML e/ou variáveis de ambiente. A precedência é:
//! 1. Valores padrão definidos no código.
//! 2. Valores do arquivo de configuração (ex: `tableau_mcp_server_config.toml`).
//! 3. Valores de variáveis de ambiente (prefixadas com `MCP_` e usando `__` como separador para aninhamento).
//! 4. Variáveis de ambiente históricas do servidor (`TABLEAU_SERVER_URL`, `HTTPS_PROXY`, ...).

use config::{Config, ConfigError, Environment, File as ConfigFile};
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::CatalogError;

/// Nome padrão do arquivo de configuração se `MCP_CONFIG_PATH` não estiver definida.
pub const DEFAULT_CONFIG_FILENAME: &str = "tableau_mcp_server_config.toml";
/// Prefixo para variáveis de ambiente que sobrescrevem as configurações do arquivo.
const ENV_PREFIX: &str = "MCP";
/// Separador usado em variáveis de ambiente para indicar aninhamento de configuração.
const ENV_SEPARATOR: &str = "__";

/// Variáveis de ambiente "legadas" e a chave de configuração que cada uma sobrescreve.
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TABLEAU_SERVER_URL", "tableau.server_url"),
    ("TABLEAU_SITE_ID", "tableau.site_id"),
    ("TABLEAU_API_VERSION", "tableau.api_version"),
    ("TABLEAU_TOKEN_NAME", "tableau.token_name"),
    ("TABLEAU_TOKEN_VALUE", "tableau.token_value"),
    ("HTTPS_PROXY", "proxy.url"),
    ("NO_PROXY", "proxy.no_proxy"),
];

/// Estrutura principal que agrupa todas as configurações da aplicação.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Servidor Tableau e credenciais (Personal Access Token).
    #[serde(default = "default_tableau_settings")]
    pub tableau: Tableau,

    /// Proxy de saída para as chamadas à REST API.
    #[serde(default = "default_proxy_settings")]
    pub proxy: Proxy,

    /// Parâmetros do cliente HTTP.
    #[serde(default = "default_http_settings")]
    pub http: Http,

    /// Configurações de logging.
    #[serde(default = "default_logging_settings")]
    pub logging: Logging,

    /// Configurações do processo servidor (runtime e métricas).
    #[serde(default = "default_server_settings")]
    pub server: Server,
}

/// Configurações do Tableau Server.
#[derive(Deserialize, Clone)]
pub struct Tableau {
    /// URL base do servidor, ex: `https://tableau.example.com`.
    pub server_url: String,
    /// `contentUrl` do site. Vazio seleciona o site padrão.
    #[serde(default)]
    pub site_id: String,
    /// Versão da REST API usada nos caminhos `/api/{versão}/...`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Nome do Personal Access Token.
    #[serde(default)]
    pub token_name: Option<String>,
    /// Segredo do Personal Access Token. Nunca aparece em logs.
    #[serde(default)]
    pub token_value: Option<String>,
}

impl Tableau {
    /// Retorna o par de credenciais apenas se ambos os valores estiverem presentes e não vazios.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.token_name.as_deref(), self.token_value.as_deref()) {
            (Some(name), Some(secret)) if !name.is_empty() && !secret.is_empty() => {
                Some((name, secret))
            }
            _ => None,
        }
    }

    /// URL do servidor validada, sem credenciais embutidas, query ou fragmento.
    ///
    /// # Errors
    ///
    /// `CatalogError::Configuration` se `server_url` não for uma URL http(s) absoluta.
    pub fn base_url(&self) -> Result<Url, CatalogError> {
        parse_server_url(&self.server_url).map_err(CatalogError::Configuration)
    }

    /// `base_url` sem a barra final, para mensagens e logs.
    #[must_use]
    pub fn display_url(&self) -> String {
        self.base_url()
            .map(|url| url.as_str().trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    /// Prefixo `{server_url}/api/{api_version}` de todas as chamadas à REST API.
    ///
    /// # Errors
    ///
    /// Ver [`Tableau::base_url`].
    pub fn api_base_url(&self) -> Result<String, CatalogError> {
        let url = self.base_url()?;
        Ok(format!("{}/api/{}", url.as_str().trim_end_matches('/'), self.api_version))
    }

    /// `host[:porta]` do servidor, usado nas mensagens de resumo das ferramentas.
    #[must_use]
    pub fn host(&self) -> String {
        let Ok(url) = self.base_url() else {
            return String::new();
        };
        match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        }
    }
}

/// Valida `raw` como URL http(s) absoluta e remove usuário e senha embutidos.
fn parse_server_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| format!("tableau.server_url não é uma URL absoluta válida: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("tableau.server_url deve usar http ou https, não '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("tableau.server_url não tem host".to_string());
    }
    if !url.username().is_empty() || url.password().is_some() {
        tracing::warn!("tableau.server_url contém credenciais embutidas; elas serão ignoradas.");
        // Só falha para URLs sem host, já descartadas acima.
        let _ = url.set_username("");
        let _ = url.set_password(None);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

impl fmt::Debug for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tableau")
            .field("server_url", &self.display_url())
            .field("site_id", &self.site_id)
            .field("api_version", &self.api_version)
            .field("token_name", &self.token_name)
            .field("token_value", &self.token_value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_api_version() -> String {
    "3.19".to_string()
}

fn default_tableau_settings() -> Tableau {
    Tableau {
        server_url: "https://tableau.example.com".to_string(),
        site_id: String::new(),
        api_version: default_api_version(),
        token_name: None,
        token_value: None,
    }
}

/// Configurações de proxy.
#[derive(Debug, Deserialize, Clone)]
pub struct Proxy {
    /// URL do proxy (ex: `http://gateway.example.net:80`). `None` desativa o uso de proxy.
    #[serde(default)]
    pub url: Option<String>,
    /// Hosts, separados por vírgula, que não passam pelo proxy.
    #[serde(default = "default_no_proxy")]
    pub no_proxy: String,
}

fn default_no_proxy() -> String {
    "localhost,127.0.0.1".to_string()
}

fn default_proxy_settings() -> Proxy {
    Proxy { url: None, no_proxy: default_no_proxy() }
}

/// Parâmetros do cliente HTTP.
#[derive(Debug, Deserialize, Clone)]
pub struct Http {
    /// Valor do header `User-Agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout por requisição já convertido. Preenchido a partir de `request_timeout_raw`.
    #[serde(skip)]
    pub request_timeout: Duration,
    /// Timeout em formato humantime (ex: "30s", "2m").
    #[serde(rename = "request_timeout", default = "default_request_timeout_raw")]
    pub request_timeout_raw: String,
}

fn default_user_agent() -> String {
    format!("Tableau-MCP-Server/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_raw() -> String {
    "30s".to_string()
}

fn default_http_settings() -> Http {
    Http {
        user_agent: default_user_agent(),
        request_timeout: Duration::from_secs(30),
        request_timeout_raw: default_request_timeout_raw(),
    }
}

/// Configurações de logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Logging {
    /// String de configuração para o `EnvFilter` do `tracing_subscriber`.
    /// Ex: "`info,tableau_mcp_server_lib=debug`"
    pub rust_log: String,
}

fn default_logging_settings() -> Logging {
    Logging { rust_log: "info,tableau_mcp_server_lib=info".to_string() }
}

/// Configurações do processo.
#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    /// Número de threads worker para runtime Tokio.
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Habilita o exportador Prometheus.
    #[serde(default)]
    pub metrics_enabled: bool,
    /// Endereço do endpoint de métricas Prometheus.
    #[serde(default = "default_metrics_bind_address")]
    pub metrics_bind_address: String,
}

fn default_metrics_bind_address() -> String {
    "127.0.0.1:9464".to_string()
}

fn default_server_settings() -> Server {
    Server {
        worker_threads: None,
        metrics_enabled: false,
        metrics_bind_address: default_metrics_bind_address(),
    }
}

impl Settings {
    /// Carrega as configurações da aplicação.
    ///
    /// O arquivo é lido de `MCP_CONFIG_PATH` ou, na ausência dela,
    /// de [`DEFAULT_CONFIG_FILENAME`]. O arquivo é opcional.
    ///
    /// # Errors
    ///
    /// Retorna `ConfigError` se houver um problema ao construir ou desserializar as configurações,
    /// como um arquivo malformado ou um `http.request_timeout` inválido.
    pub fn new() -> Result<Self, ConfigError> {
        let config_file_path = std::env::var("MCP_CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILENAME.to_string());
        Self::from_path(&config_file_path)
    }

    /// Carrega as configurações usando o arquivo indicado em vez de `MCP_CONFIG_PATH`.
    ///
    /// # Errors
    ///
    /// Mesmas condições de [`Settings::new`].
    pub fn from_path(config_file_path: &str) -> Result<Self, ConfigError> {
        tracing::info!(
            "Carregando configurações. Arquivo: '{}', Prefixo Env: '{}', Separador Env: '{}'",
            config_file_path,
            ENV_PREFIX,
            ENV_SEPARATOR
        );

        let mut builder = Config::builder()
            .add_source(ConfigFile::with_name(config_file_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );

        for (env_name, key) in LEGACY_ENV_OVERRIDES {
            let value = std::env::var(env_name).ok().filter(|v| !v.is_empty());
            if value.is_some() {
                tracing::debug!("Variável de ambiente {} sobrescreve '{}'.", env_name, key);
            }
            builder = builder.set_override_option(*key, value)?;
        }

        let mut settings: Self = builder.build()?.try_deserialize()?;

        settings.http.request_timeout = humantime::parse_duration(&settings.http.request_timeout_raw)
            .map_err(|e| {
                ConfigError::Message(format!(
                    "Falha ao parsear http.request_timeout ('{}'): {}",
                    settings.http.request_timeout_raw, e
                ))
            })?;

        parse_server_url(&settings.tableau.server_url).map_err(ConfigError::Message)?;

        Ok(settings)
    }
}
