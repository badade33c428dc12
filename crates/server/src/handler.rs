use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use driftkv_common::{ConnectionError, ProtocolError};
use driftkv_protocol::response;
use driftkv_storage::{Aof, Store};

use crate::Connection;
use crate::dispatch::{DispatchMode, dispatch};

/// Loop principal de uma conexão: lê um comando, despacha em modo Public,
/// escreve a resposta e repete. Encerra no EOF do peer, em erro de protocolo
/// (o framing do stream se perdeu) ou no sinal de shutdown.
pub async fn handle_connection(
    mut conn: Connection,
    store: Store,
    shutdown: &mut broadcast::Receiver<()>,
    aof: Option<Arc<Aof>>,
) -> Result<(), ConnectionError> {
    loop {
        let result = tokio::select! {
            result = conn.read_command() => result,
            _ = shutdown.recv() => return Ok(()),
        };

        let args = match result {
            Ok(Some(args)) => args,
            Ok(None) => return Ok(()), // EOF
            Err(ConnectionError::Protocol(ProtocolError::EmptyCommand)) => {
                // Linha inline vazia: erro por comando, conexão continua.
                conn.write_response(&response::err_empty_command()).await?;
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!("comando recebido: {} argumentos", args.len());

        let resp = dispatch(DispatchMode::Public, &args, &store, aof.as_deref()).await;
        conn.write_response(&resp).await?;
    }
}
