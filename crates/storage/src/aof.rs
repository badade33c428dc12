use std::io;
use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Log append-only de comandos mutantes. Cada entrada é um frame array
/// completo; não há header, checksum nem separador de registro. Appends são
/// serializados por mutex e não há fsync por escrita — um fsync único
/// acontece no shutdown limpo via `sync`.
pub struct Aof {
    file: Mutex<File>,
}

impl Aof {
    /// Abre (ou cria) o arquivo de log em modo append.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Aof> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .await?;
        Ok(Aof {
            file: Mutex::new(file),
        })
    }

    /// Anexa um frame já encodado. A escrita é atômica em relação a outros
    /// appends; o encode acontece fora do lock, no caller.
    pub async fn append(&self, frame: &[u8]) -> io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(frame).await?;
        file.flush().await
    }

    /// Fsync final do shutdown limpo.
    pub async fn sync(&self) -> io::Result<()> {
        let file = self.file.lock().await;
        file.sync_all().await
    }
}
