use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use driftkv_common::StorageError;

use crate::entry::{Entry, Value};

/// Segundos desde a época Unix, saturando em zero para relógios pré-época.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn unix_to_system_time(timestamp: i64) -> SystemTime {
    if timestamp >= 0 {
        UNIX_EPOCH + Duration::from_secs(timestamp as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(timestamp.unsigned_abs())
    }
}

type Keyspace = HashMap<Bytes, Entry>;

/// Handle para o keyspace em memória. Chaves são bytes opacos; valores são
/// strings ou listas. Todas as operações serializam sob um único mutex e a
/// expiração é lazy: qualquer acesso que observa uma chave expirada a remove
/// antes de responder.
///
/// Fronteira de ownership: entradas são copiadas dos argumentos do caller;
/// saídas são `Bytes` imutáveis, então nenhum caller muta bytes armazenados.
#[derive(Clone)]
pub struct Store {
    shared: Arc<Mutex<Keyspace>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Armazena uma string, descartando qualquer expiração anterior.
    pub fn set(&self, key: &[u8], value: &[u8]) {
        let mut data = self.lock();
        let entry = Entry::new(Value::String(Bytes::copy_from_slice(value)), None);
        data.insert(Bytes::copy_from_slice(key), entry);
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StorageError> {
        let mut data = self.lock();
        match live_entry(&mut data, key) {
            None => Ok(None),
            Some(entry) => match &entry.value {
                Value::String(bytes) => Ok(Some(bytes.clone())),
                Value::List(_) => Err(StorageError::WrongType),
            },
        }
    }

    /// Remove a chave; retorna se havia algo vivo para remover.
    pub fn del(&self, key: &[u8]) -> bool {
        let mut data = self.lock();
        evict_if_expired(&mut data, key);
        data.remove(key).is_some()
    }

    pub fn exists(&self, key: &[u8]) -> bool {
        let mut data = self.lock();
        evict_if_expired(&mut data, key);
        data.contains_key(key)
    }

    /// Insere no início da lista; cria a lista se a chave não existir.
    /// Uma lista existente mantém sua expiração.
    pub fn lpush(&self, key: &[u8], value: &[u8]) -> Result<usize, StorageError> {
        self.push(key, value, true)
    }

    /// Insere no fim da lista; simétrico a `lpush`.
    pub fn rpush(&self, key: &[u8], value: &[u8]) -> Result<usize, StorageError> {
        self.push(key, value, false)
    }

    fn push(&self, key: &[u8], value: &[u8], front: bool) -> Result<usize, StorageError> {
        let mut data = self.lock();
        evict_if_expired(&mut data, key);

        let copy = Bytes::copy_from_slice(value);
        let entry = data
            .entry(Bytes::copy_from_slice(key))
            .or_insert_with(|| Entry::new(Value::List(VecDeque::new()), None));

        match &mut entry.value {
            Value::List(list) => {
                if front {
                    list.push_front(copy);
                } else {
                    list.push_back(copy);
                }
                Ok(list.len())
            }
            Value::String(_) => Err(StorageError::WrongType),
        }
    }

    /// Sub-faixa inclusiva `[start, end]` com normalização de índices
    /// (negativos contam a partir do fim). Chave ausente produz faixa vazia.
    pub fn lrange(&self, key: &[u8], start: i64, end: i64) -> Result<Vec<Bytes>, StorageError> {
        let mut data = self.lock();
        let Some(entry) = live_entry(&mut data, key) else {
            return Ok(Vec::new());
        };
        let list = match &entry.value {
            Value::List(list) => list,
            Value::String(_) => return Err(StorageError::WrongType),
        };

        let len = list.len() as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let end = if end < 0 { len + end } else { end };
        let end = end.min(len - 1);
        if start > end || start >= len || end < 0 {
            return Ok(Vec::new());
        }

        Ok(list
            .range(start as usize..=end as usize)
            .cloned()
            .collect())
    }

    /// Armazena uma string com expiração relativa. Segundos não-positivos
    /// equivalem a deleção imediata: o valor nunca é observável.
    pub fn set_ex(&self, key: &[u8], seconds: i64, value: &[u8]) {
        let mut data = self.lock();
        if seconds <= 0 {
            data.remove(key);
            return;
        }
        let expires_at = SystemTime::now() + Duration::from_secs(seconds as u64);
        let entry = Entry::new(
            Value::String(Bytes::copy_from_slice(value)),
            Some(expires_at),
        );
        data.insert(Bytes::copy_from_slice(key), entry);
    }

    /// Variante de replay: grava incondicionalmente com expiração absoluta,
    /// mesmo que o instante já esteja no passado.
    pub fn set_ex_at(&self, key: &[u8], timestamp: i64, value: &[u8]) {
        let mut data = self.lock();
        let entry = Entry::new(
            Value::String(Bytes::copy_from_slice(value)),
            Some(unix_to_system_time(timestamp)),
        );
        data.insert(Bytes::copy_from_slice(key), entry);
    }

    /// Define expiração relativa numa chave existente. Chave ausente não é
    /// criada; segundos não-positivos deletam e retornam `false`.
    pub fn expire(&self, key: &[u8], seconds: i64) -> bool {
        let mut data = self.lock();
        evict_if_expired(&mut data, key);
        if seconds <= 0 {
            data.remove(key);
            return false;
        }
        let expires_at = SystemTime::now() + Duration::from_secs(seconds as u64);
        match data.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Some(expires_at);
                true
            }
            None => false,
        }
    }

    /// Variante de replay: expiração absoluta. Pode tornar a chave
    /// já-expirada; a coleta fica para o próximo acesso.
    pub fn expire_at(&self, key: &[u8], timestamp: i64) -> bool {
        let mut data = self.lock();
        evict_if_expired(&mut data, key);
        match data.get_mut(key) {
            Some(entry) => {
                entry.expires_at = Some(unix_to_system_time(timestamp));
                true
            }
            None => false,
        }
    }

    /// -2 se ausente/expirada; -1 se presente sem expiração; senão segundos
    /// restantes arredondados para cima.
    pub fn ttl(&self, key: &[u8]) -> i64 {
        let mut data = self.lock();
        let expires_at = match live_entry(&mut data, key) {
            None => return -2,
            Some(entry) => match entry.expires_at {
                None => return -1,
                Some(at) => at,
            },
        };

        // A chave pode cruzar o prazo entre a observação acima e o cálculo
        // do tempo restante; nesse caso ela é removida aqui mesmo.
        match expires_at.duration_since(SystemTime::now()) {
            Ok(remaining) if !remaining.is_zero() => {
                let mut seconds = remaining.as_secs() as i64;
                if remaining.subsec_nanos() > 0 {
                    seconds += 1;
                }
                seconds
            }
            _ => {
                data.remove(key);
                -2
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Keyspace> {
        // Toda operação completa integralmente sob o lock; poison não indica
        // estado parcial do keyspace.
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove a chave se o valor estiver expirado. Chamar com o lock em posse.
fn evict_if_expired(data: &mut Keyspace, key: &[u8]) {
    if data.get(key).is_some_and(Entry::is_expired) {
        data.remove(key);
    }
}

fn live_entry<'a>(data: &'a mut Keyspace, key: &[u8]) -> Option<&'a mut Entry> {
    evict_if_expired(data, key);
    data.get_mut(key)
}
