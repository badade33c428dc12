//! Ponto único de despacho: valida, executa e (condicionalmente) persiste um
//! comando. Também abriga o replay do AOF, que reaplica o log pelo mesmo
//! caminho em modo Private.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use tracing::{info, warn};

use driftkv_common::DriftError;
use driftkv_protocol::{encode_command, read_command, response};
use driftkv_storage::{Aof, Store};

use crate::registry;

/// Modo de despacho: `Public` para conexões de clientes, `Private` para o
/// replay do AOF (aceita comandos privados e nunca persiste).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Public,
    Private,
}

/// Executa um único comando e retorna os bytes da resposta.
///
/// Ordem dos checks: sequência vazia, nome desconhecido, privacidade,
/// arity, handler. Um comando mutante bem-sucedido em modo Public com sink
/// presente é anexado ao log — na forma reescrita pelo transform, se houver.
pub async fn dispatch(
    mode: DispatchMode,
    args: &[Bytes],
    store: &Store,
    aof: Option<&Aof>,
) -> Bytes {
    if args.is_empty() {
        return response::err_empty_command();
    }

    let name = args[0].to_ascii_uppercase();
    let Some(command) = registry::lookup(&name) else {
        return response::err_unknown_command();
    };
    // Comandos privados não existem para clientes.
    if command.private && mode == DispatchMode::Public {
        return response::err_unknown_command();
    }
    if !check_arity(args.len(), command.arity) {
        return response::err_wrong_arity();
    }

    let (resp, ok) = (command.handler)(args, store);

    if ok && mode == DispatchMode::Public && command.mutates {
        if let Some(aof) = aof {
            let log_args = match command.aof_transform {
                Some(transform) => transform(args),
                None => args.to_vec(),
            };
            let frame = encode_command(&log_args);
            // A mutação já foi aplicada em memória; uma falha de append não
            // altera a resposta do cliente.
            if let Err(e) = aof.append(&frame).await {
                warn!("falha ao anexar comando ao AOF: {e}");
            }
        }
    }

    resp
}

fn check_arity(len: usize, arity: i32) -> bool {
    if arity >= 0 {
        len == arity as usize
    } else {
        len >= arity.unsigned_abs() as usize
    }
}

/// Reconstrói o estado reaplicando o log em modo Private, sem sink de
/// persistência. Fim de stream limpo entre frames encerra o replay; um frame
/// parcial ou corrompido no fim do arquivo aborta o startup com erro.
pub async fn replay_aof(path: &Path, store: &Store) -> Result<usize, DriftError> {
    if !path.exists() {
        info!("arquivo AOF não encontrado, iniciando sem dados");
        return Ok(0);
    }

    let data = tokio::fs::read(path).await?;
    let mut cursor = Cursor::new(&data[..]);
    let mut count = 0;

    while (cursor.position() as usize) < data.len() {
        let args = read_command(&mut cursor)?;
        dispatch(DispatchMode::Private, &args, store, None).await;
        count += 1;
    }

    info!("replay do AOF completo: {count} comandos restaurados");
    Ok(count)
}
