// src/main.rs

// MIT License
//
// Copyright (c) 2025 Guilherme Leste
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Ponto de entrada do binário `tableau-mcp-server`.
//!
//! Carrega a configuração, inicializa o logging (JSON em stderr, já que stdout
//! é o canal do protocolo) e então:
//! - por padrão, serve MCP sobre stdio até o cliente desconectar ou chegar SIGINT/SIGTERM;
//! - com `--test`, faz um teste único de conexão e sai.

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use rmcp::{service::ServiceExt as RmcpServiceExt, transport::stdio};
use tableau_mcp_server_lib::{
    api_client::TableauApiClient,
    catalog,
    config::{self, Settings},
    error::McpServerError,
    mcp_service_handler::McpServiceHandler,
    metrics,
    session::TableauSession,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Servidor MCP para o catálogo de um Tableau Server.
#[derive(Parser, Debug)]
#[command(name = "tableau-mcp-server", version, about)]
struct Cli {
    /// Testa a conexão com o Tableau Server e sai.
    #[arg(long)]
    test: bool,

    /// Habilita logs em nível debug.
    #[arg(long)]
    debug: bool,

    /// Caminho do arquivo de configuração TOML.
    #[arg(long, env = "MCP_CONFIG_PATH")]
    config: Option<String>,
}

fn setup_logging(settings: &config::Settings, debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(settings.logging.rust_log.clone()))
    };

    let formatting_layer = tracing_fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(env_filter).with(formatting_layer).init();
}

fn setup_metrics_exporter(server_settings: &config::Server) -> Result<(), McpServerError> {
    let metrics_socket_addr: SocketAddr =
        server_settings.metrics_bind_address.parse().map_err(|e| {
            McpServerError::Internal(format!(
                "Endereço de bind inválido para métricas '{}': {e}",
                server_settings.metrics_bind_address
            ))
        })?;

    PrometheusBuilder::new().with_http_listener(metrics_socket_addr).install().map_err(|e| {
        McpServerError::Internal(format!(
            "Não foi possível iniciar o exportador Prometheus em {metrics_socket_addr}: {e}"
        ))
    })?;
    tracing::info!("Exportador Prometheus escutando em {}", metrics_socket_addr);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if dotenvy::dotenv().is_err() {
        eprintln!("[INFO] Arquivo .env não encontrado. Usando variáveis de ambiente do sistema.");
    }

    let cli = Cli::parse();

    let settings_result = match cli.config.as_deref() {
        Some(path) => Settings::from_path(path),
        None => Settings::new(),
    };
    let settings = match settings_result {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("[ERROR] Erro fatal ao carregar a configuração: {e}. Encerrando.");
            return Err(Box::new(McpServerError::Configuration(e)));
        }
    };

    setup_logging(&settings, cli.debug);

    tracing::info!("Iniciando Tableau-MCP-Server versão {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(config = ?settings, "Configurações carregadas.");

    let worker_threads = settings.server.worker_threads.unwrap_or_else(|| {
        let cores = num_cpus::get();
        tracing::info!("server.worker_threads não configurado, usando default: {}", cores);
        cores
    });

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(worker_threads)
        .thread_name("tableau-mcp-worker")
        .build()
        .map_err(McpServerError::from)?;

    rt.block_on(async_main(settings, cli.test))
}

#[tracing::instrument(name = "server_main_async_logic", skip_all)]
async fn async_main(
    settings: Arc<Settings>,
    self_test: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if settings.server.metrics_enabled {
        if let Err(e) = setup_metrics_exporter(&settings.server) {
            tracing::error!(error.message = %e, "Métricas não estarão disponíveis.");
        }
    }
    metrics::register_metrics_descriptions();

    let session = Arc::new(TableauSession::new(&settings)?);
    let client = TableauApiClient::new(session.clone());

    if self_test {
        let outcome = run_self_test(&client).await;
        session.close().await;
        return outcome.map_err(Into::into);
    }

    let global_shutdown_token = CancellationToken::new();
    setup_signal_handler(global_shutdown_token.clone());

    tracing::info!(server.url = %settings.tableau.display_url(), "Servindo MCP sobre stdio.");
    let handler = McpServiceHandler::new(client);
    let running = handler
        .serve_with_ct(stdio(), global_shutdown_token.clone())
        .await
        .inspect_err(|e| tracing::error!(error.message = %e, "Falha ao iniciar o serviço MCP."))?;

    let quit_reason = running.waiting().await?;
    tracing::info!(reason = ?quit_reason, "Serviço MCP encerrado.");

    session.close().await;
    tracing::info!("Tableau-MCP-Server desligado graciosamente.");
    Ok(())
}

/// Autentica e lista os workbooks uma vez, imprimindo o resultado em stdout.
async fn run_self_test(client: &TableauApiClient) -> Result<(), McpServerError> {
    println!("Testing Tableau connection...");
    match client.session().ensure_authenticated().await {
        Ok(_) => println!("✅ Connection test successful"),
        Err(e) => {
            println!("❌ Connection test failed");
            tracing::error!(error.message = %e, "Teste de conexão falhou.");
            return Err(e.into());
        }
    }

    let workbooks = catalog::fetch_workbooks(client).await?;
    println!("✅ Found {} workbooks", workbooks.len());
    Ok(())
}

fn setup_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("[ERROR] Falha crítica ao instalar handler SIGINT: {e}. Encerrando.");
                    std::process::exit(1);
                }
            };
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("[ERROR] Falha crítica ao instalar handler SIGTERM: {e}. Encerrando.");
                    std::process::exit(1);
                }
            };

            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!("Handler de sinal: Token de cancelamento global já ativo.");
                },
                _ = sigint.recv() => {
                    tracing::info!("Recebido SIGINT (Ctrl+C), iniciando desligamento...");
                    token.cancel();
                },
                _ = sigterm.recv() => {
                    tracing::info!("Recebido SIGTERM, iniciando desligamento...");
                    token.cancel();
                },
            }
        }
        #[cfg(windows)]
        {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!("Handler de sinal: Token de cancelamento global já ativo.");
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Recebido Ctrl-C, iniciando desligamento...");
                    token.cancel();
                }
            }
        }
        tracing::debug!("Handler de sinal encerrado.");
    });
}
