use bytes::{Buf, Bytes, BytesMut};
use std::io::Cursor;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use driftkv_common::{ConnectionError, INITIAL_BUFFER_CAPACITY, ProtocolError};
use driftkv_protocol::read_command;

/// Wrapper sobre TcpStream com buffer para leitura incremental de comandos.
/// O parser é pull: tenta decodificar o que há no buffer e, faltando bytes,
/// lê mais do socket e tenta de novo.
pub struct Connection {
    stream: BufWriter<TcpStream>,
    buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Lê um comando completo do stream. Retorna None no EOF limpo; EOF no
    /// meio de um frame é reset de conexão.
    pub async fn read_command(&mut self) -> Result<Option<Vec<Bytes>>, ConnectionError> {
        loop {
            if let Some(args) = self.parse_buffered()? {
                return Ok(Some(args));
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(ConnectionError::ConnectionReset);
            }
        }
    }

    /// Escreve uma resposta já formatada e faz flush.
    pub async fn write_response(&mut self, resp: &[u8]) -> Result<(), ConnectionError> {
        self.stream.write_all(resp).await?;
        self.stream.flush().await?;
        Ok(())
    }

    fn parse_buffered(&mut self) -> Result<Option<Vec<Bytes>>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(&self.buffer[..]);
        match read_command(&mut cursor) {
            Ok(args) => {
                let consumed = cursor.position() as usize;
                self.buffer.advance(consumed);
                Ok(Some(args))
            }
            Err(ProtocolError::Incomplete) => Ok(None),
            Err(ProtocolError::EmptyCommand) => {
                // A linha vazia já foi consumida; o framing segue íntegro e
                // o caller pode responder sem derrubar a conexão.
                let consumed = cursor.position() as usize;
                self.buffer.advance(consumed);
                Err(ProtocolError::EmptyCommand.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
