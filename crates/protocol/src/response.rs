//! Formatação de respostas do protocolo wire. Toda resposta termina em CRLF;
//! os payloads de erro canônicos estão fixados aqui e os testes dependem do
//! texto exato.

use bytes::{BufMut, Bytes, BytesMut};

/// Simple string: `+texto\r\n`.
pub fn simple(text: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(text.len() + 3);
    buf.put_u8(b'+');
    buf.put(text.as_bytes());
    buf.put(&b"\r\n"[..]);
    buf.freeze()
}

/// Erro: `-ERR texto\r\n`. O prefixo `ERR ` faz parte do payload literal.
pub fn error(text: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(text.len() + 8);
    buf.put(&b"-ERR "[..]);
    buf.put(text.as_bytes());
    buf.put(&b"\r\n"[..]);
    buf.freeze()
}

/// Inteiro: `:N\r\n` (decimal com sinal).
pub fn integer(n: i64) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(b':');
    buf.put(n.to_string().as_bytes());
    buf.put(&b"\r\n"[..]);
    buf.freeze()
}

/// Bulk string: `$L\r\n<bytes>\r\n`.
pub fn bulk(data: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(data.len() + 16);
    put_bulk(&mut buf, data);
    buf.freeze()
}

/// Bulk nulo: `$-1\r\n` (sem payload).
pub fn null_bulk() -> Bytes {
    Bytes::from_static(b"$-1\r\n")
}

/// Array de bulk strings; elementos `None` viram bulks nulos.
pub fn array(items: &[Option<Bytes>]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(b'*');
    buf.put(items.len().to_string().as_bytes());
    buf.put(&b"\r\n"[..]);
    for item in items {
        match item {
            Some(data) => put_bulk(&mut buf, data),
            None => buf.put(&b"$-1\r\n"[..]),
        }
    }
    buf.freeze()
}

fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
    buf.put_u8(b'$');
    buf.put(data.len().to_string().as_bytes());
    buf.put(&b"\r\n"[..]);
    buf.put(data);
    buf.put(&b"\r\n"[..]);
}

pub fn err_wrong_type() -> Bytes {
    error("Wrong type")
}

pub fn err_internal() -> Bytes {
    error("Internal error")
}

pub fn err_empty_command() -> Bytes {
    error("Empty command")
}

pub fn err_invalid_integer() -> Bytes {
    error("Invalid integer")
}

pub fn err_wrong_arity() -> Bytes {
    error("Wrong number of arguments")
}

pub fn err_unknown_command() -> Bytes {
    error("Unknown command")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_string() {
        assert_eq!(simple("OK").as_ref(), b"+OK\r\n");
        assert_eq!(simple("PONG").as_ref(), b"+PONG\r\n");
    }

    #[test]
    fn error_carries_err_prefix() {
        assert_eq!(error("boom").as_ref(), b"-ERR boom\r\n");
    }

    #[test]
    fn integers() {
        assert_eq!(integer(0).as_ref(), b":0\r\n");
        assert_eq!(integer(42).as_ref(), b":42\r\n");
        assert_eq!(integer(-2).as_ref(), b":-2\r\n");
    }

    #[test]
    fn bulk_string() {
        assert_eq!(bulk(b"bar").as_ref(), b"$3\r\nbar\r\n");
        assert_eq!(bulk(b"").as_ref(), b"$0\r\n\r\n");
        // Binary-safe: CR/LF/NUL no payload não quebram o framing.
        assert_eq!(bulk(b"a\r\nb\x00").as_ref(), b"$5\r\na\r\nb\x00\r\n");
    }

    #[test]
    fn null_bulk_has_no_payload() {
        assert_eq!(null_bulk().as_ref(), b"$-1\r\n");
    }

    #[test]
    fn array_of_bulks() {
        let items = vec![
            Some(Bytes::from_static(b"b")),
            None,
            Some(Bytes::from_static(b"c")),
        ];
        assert_eq!(
            array(&items).as_ref(),
            b"*3\r\n$1\r\nb\r\n$-1\r\n$1\r\nc\r\n"
        );
        assert_eq!(array(&[]).as_ref(), b"*0\r\n");
    }

    #[test]
    fn canonical_error_payloads() {
        assert_eq!(err_wrong_type().as_ref(), b"-ERR Wrong type\r\n");
        assert_eq!(err_internal().as_ref(), b"-ERR Internal error\r\n");
        assert_eq!(err_empty_command().as_ref(), b"-ERR Empty command\r\n");
        assert_eq!(err_invalid_integer().as_ref(), b"-ERR Invalid integer\r\n");
        assert_eq!(
            err_wrong_arity().as_ref(),
            b"-ERR Wrong number of arguments\r\n"
        );
        assert_eq!(
            err_unknown_command().as_ref(),
            b"-ERR Unknown command\r\n"
        );
    }
}
