use bytes::Bytes;
use std::collections::VecDeque;
use std::time::SystemTime;

/// Tipo do valor armazenado.
#[derive(Debug, Clone)]
pub enum Value {
    String(Bytes),
    List(VecDeque<Bytes>),
}

/// Entrada no store: valor + expiração absoluta opcional.
/// `None` significa "nunca expira" e difere de "expirou há muito tempo".
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<SystemTime>,
}

impl Entry {
    pub fn new(value: Value, expires_at: Option<SystemTime>) -> Self {
        Self { value, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|t| SystemTime::now() >= t)
            .unwrap_or(false)
    }
}
