//! Tabela estática de comandos: nome → {arity, mutates, private, handler,
//! transform de AOF}. Os handlers assumem arity já validada pelo dispatcher
//! e indexam os argumentos diretamente.

use std::collections::HashMap;
use std::sync::LazyLock;

use bytes::Bytes;

use driftkv_common::StorageError;
use driftkv_protocol::response;
use driftkv_storage::{Store, unix_now};

/// Handler: (args, store) → (resposta, ok). `ok == false` marca resposta de
/// erro e suprime a persistência no AOF.
pub type Handler = fn(&[Bytes], &Store) -> (Bytes, bool);

/// Reescrita de argumentos aplicada antes do append no AOF. Converte
/// comandos de tempo relativo na forma absoluta equivalente.
pub type AofTransform = fn(&[Bytes]) -> Vec<Bytes>;

/// Registro estático de um comando.
pub struct CommandSpec {
    /// `>= 0`: contagem exata de argumentos (incluindo o nome do comando).
    /// `< 0`: pelo menos `-arity` argumentos.
    pub arity: i32,
    pub mutates: bool,
    /// Comandos privados existem apenas como entradas de log; no modo
    /// público respondem como desconhecidos.
    pub private: bool,
    pub handler: Handler,
    pub aof_transform: Option<AofTransform>,
}

impl CommandSpec {
    const fn public(arity: i32, mutates: bool, handler: Handler) -> CommandSpec {
        CommandSpec {
            arity,
            mutates,
            private: false,
            handler,
            aof_transform: None,
        }
    }

    const fn private(arity: i32, handler: Handler) -> CommandSpec {
        CommandSpec {
            arity,
            mutates: true,
            private: true,
            handler,
            aof_transform: None,
        }
    }

    const fn with_transform(self, transform: AofTransform) -> CommandSpec {
        CommandSpec {
            arity: self.arity,
            mutates: self.mutates,
            private: self.private,
            handler: self.handler,
            aof_transform: Some(transform),
        }
    }
}

static REGISTRY: LazyLock<HashMap<&'static str, CommandSpec>> = LazyLock::new(|| {
    HashMap::from([
        ("PING", CommandSpec::public(1, false, ping)),
        ("SET", CommandSpec::public(3, true, set)),
        ("GET", CommandSpec::public(2, false, get)),
        ("DEL", CommandSpec::public(2, true, del)),
        ("EXISTS", CommandSpec::public(2, false, exists)),
        ("LPUSH", CommandSpec::public(3, true, lpush)),
        ("RPUSH", CommandSpec::public(3, true, rpush)),
        ("LRANGE", CommandSpec::public(4, false, lrange)),
        (
            "EXPIRE",
            CommandSpec::public(3, true, expire).with_transform(expire_transform),
        ),
        ("TTL", CommandSpec::public(2, false, ttl)),
        (
            "SETEX",
            CommandSpec::public(4, true, set_ex).with_transform(set_ex_transform),
        ),
        ("EXPIREAT", CommandSpec::private(3, expire_at)),
        ("SETEXAT", CommandSpec::private(4, set_ex_at)),
    ])
});

/// Busca um comando pelo nome já em caixa alta. Nomes fora de ASCII/UTF-8
/// nunca casam com a tabela.
pub fn lookup(name: &[u8]) -> Option<&'static CommandSpec> {
    std::str::from_utf8(name).ok().and_then(|n| REGISTRY.get(n))
}

fn parse_int(arg: &[u8]) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

fn ping(_args: &[Bytes], _store: &Store) -> (Bytes, bool) {
    (response::simple("PONG"), true)
}

fn set(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    store.set(&args[1], &args[2]);
    (response::simple("OK"), true)
}

fn get(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    match store.get(&args[1]) {
        Ok(Some(value)) => (response::bulk(&value), true),
        Ok(None) => (response::null_bulk(), true),
        Err(StorageError::WrongType) => (response::err_wrong_type(), false),
    }
}

fn del(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let removed = store.del(&args[1]);
    (response::integer(removed.into()), true)
}

fn exists(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let present = store.exists(&args[1]);
    (response::integer(present.into()), true)
}

fn lpush(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    match store.lpush(&args[1], &args[2]) {
        Ok(len) => (response::integer(len as i64), true),
        Err(StorageError::WrongType) => (response::err_wrong_type(), false),
    }
}

fn rpush(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    match store.rpush(&args[1], &args[2]) {
        Ok(len) => (response::integer(len as i64), true),
        Err(StorageError::WrongType) => (response::err_wrong_type(), false),
    }
}

fn lrange(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let (Some(start), Some(end)) = (parse_int(&args[2]), parse_int(&args[3])) else {
        return (response::err_invalid_integer(), false);
    };
    match store.lrange(&args[1], start, end) {
        Ok(values) => {
            let items: Vec<Option<Bytes>> = values.into_iter().map(Some).collect();
            (response::array(&items), true)
        }
        Err(StorageError::WrongType) => (response::err_wrong_type(), false),
    }
}

fn expire(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let Some(seconds) = parse_int(&args[2]) else {
        return (response::err_invalid_integer(), false);
    };
    let applied = store.expire(&args[1], seconds);
    (response::integer(applied.into()), true)
}

fn ttl(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    (response::integer(store.ttl(&args[1])), true)
}

fn set_ex(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let Some(seconds) = parse_int(&args[2]) else {
        return (response::err_invalid_integer(), false);
    };
    store.set_ex(&args[1], seconds, &args[3]);
    (response::simple("OK"), true)
}

fn expire_at(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let Some(timestamp) = parse_int(&args[2]) else {
        return (response::err_invalid_integer(), false);
    };
    let applied = store.expire_at(&args[1], timestamp);
    (response::integer(applied.into()), true)
}

fn set_ex_at(args: &[Bytes], store: &Store) -> (Bytes, bool) {
    let Some(timestamp) = parse_int(&args[2]) else {
        return (response::err_invalid_integer(), false);
    };
    store.set_ex_at(&args[1], timestamp, &args[3]);
    (response::simple("OK"), true)
}

/// EXPIRE vira EXPIREAT com instante absoluto, para replay determinístico.
/// O handler já validou o inteiro; um argumento inválido nunca chega aqui.
fn expire_transform(args: &[Bytes]) -> Vec<Bytes> {
    let seconds = parse_int(&args[2]).unwrap_or_default();
    let expires_at = unix_now() + seconds;
    vec![
        Bytes::from_static(b"EXPIREAT"),
        args[1].clone(),
        Bytes::from(expires_at.to_string()),
    ]
}

/// SETEX vira SETEXAT; simétrico a `expire_transform`.
fn set_ex_transform(args: &[Bytes]) -> Vec<Bytes> {
    let seconds = parse_int(&args[2]).unwrap_or_default();
    let expires_at = unix_now() + seconds;
    vec![
        Bytes::from_static(b"SETEXAT"),
        args[1].clone(),
        Bytes::from(expires_at.to_string()),
        args[3].clone(),
    ]
}
