/// Erros de parsing do protocolo wire.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Faltam bytes para completar o frame. Na conexão significa "espere
    /// mais dados"; no replay do AOF significa cauda truncada.
    #[error("frame incompleto")]
    Incomplete,
    #[error("comando vazio")]
    EmptyCommand,
    #[error("prefixo de frame inválido: {0:#x}")]
    InvalidPrefix(u8),
    #[error("inteiro inválido: {0}")]
    InvalidInteger(String),
    #[error("CRLF ausente após payload")]
    MissingCrlf,
    #[error("frame excede tamanho máximo ({0} bytes)")]
    FrameTooLarge(usize),
}

/// Erros do store tipado.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("operação contra chave com tipo errado")]
    WrongType,
}

/// Erros de conexão TCP.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("conexão resetada pelo peer")]
    ConnectionReset,
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Erro top-level do DriftKV.
#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Result type alias.
pub type DriftResult<T> = Result<T, DriftError>;

// Conversão implícita de io::Error → DriftError (via ConnectionError)
impl From<std::io::Error> for DriftError {
    fn from(e: std::io::Error) -> Self {
        DriftError::Connection(ConnectionError::Io(e))
    }
}
