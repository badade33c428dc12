use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{Semaphore, broadcast};
use tracing::{error, info};

use driftkv_common::MAX_CONNECTIONS;
use driftkv_server::config::Config;
use driftkv_server::dispatch::replay_aof;
use driftkv_server::{Connection, handle_connection};
use driftkv_storage::{Aof, Store};

#[derive(Parser, Debug)]
#[command(name = "driftkv-server", about = "DriftKV — in-memory key-value store")]
struct Args {
    /// Endereço de escuta (host:porta).
    #[arg(long)]
    address: Option<String>,
    /// Arquivo AOF; ausente ou vazio desabilita persistência.
    #[arg(long, value_name = "FILE")]
    aof_path: Option<String>,
    /// Arquivo JSON de configuração; flags têm precedência sobre ele.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driftkv_server=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::resolve(args.config.as_deref(), args.address, args.aof_path)?;

    let store = Store::new();

    let aof = if config.aof_path.is_empty() {
        info!("AOF desabilitado");
        None
    } else {
        let path = Path::new(&config.aof_path);
        let count = replay_aof(path, &store).await?;
        if count > 0 {
            info!("{count} comandos restaurados do AOF");
        }
        info!("AOF habilitado: {}", config.aof_path);
        Some(Arc::new(Aof::open(path).await?))
    };

    let listener = TcpListener::bind(&config.address).await?;
    info!("DriftKV escutando em {}", config.address);

    let semaphore = Arc::new(Semaphore::new(MAX_CONNECTIONS));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    loop {
        let permit = tokio::select! {
            permit = semaphore.clone().acquire_owned() => permit?,
            _ = signal::ctrl_c() => break,
        };

        let (socket, addr) = tokio::select! {
            result = listener.accept() => match result {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("erro ao aceitar conexão: {e}");
                    continue;
                }
            },
            _ = signal::ctrl_c() => break,
        };

        info!("nova conexão: {addr}");
        let store = store.clone();
        let aof = aof.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn(async move {
            let conn = Connection::new(socket);
            if let Err(e) = handle_connection(conn, store, &mut shutdown_rx, aof).await {
                error!("erro na conexão {addr}: {e}");
            }
            info!("conexão encerrada: {addr}");
            drop(permit);
        });
    }

    info!("shutdown signal recebido");
    drop(shutdown_tx);

    // Fsync final do AOF antes de sair.
    if let Some(aof) = &aof {
        aof.sync().await?;
    }

    Ok(())
}
