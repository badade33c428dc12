use bytes::{BufMut, Bytes, BytesMut};

/// Encoda uma sequência de argumentos na forma array do protocolo:
/// `*N\r\n` seguido de `$L\r\n<bytes>\r\n` por argumento. É a única forma
/// emitida pelo sistema — o AOF é uma concatenação desses frames.
pub fn encode_command(args: &[Bytes]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(b'*');
    buf.put(args.len().to_string().as_bytes());
    buf.put(&b"\r\n"[..]);
    for arg in args {
        buf.put_u8(b'$');
        buf.put(arg.len().to_string().as_bytes());
        buf.put(&b"\r\n"[..]);
        buf.put(arg.as_ref());
        buf.put(&b"\r\n"[..]);
    }
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_command;
    use std::io::Cursor;

    fn roundtrip(parts: &[&[u8]]) {
        let args: Vec<Bytes> = parts.iter().map(|p| Bytes::copy_from_slice(p)).collect();
        let encoded = encode_command(&args);
        let mut cursor = Cursor::new(encoded.as_ref());
        let parsed = read_command(&mut cursor).unwrap();
        assert_eq!(parsed, args);
        assert_eq!(cursor.position() as usize, encoded.len());
    }

    #[test]
    fn encode_get() {
        let args = vec![Bytes::from_static(b"GET"), Bytes::from_static(b"foo")];
        assert_eq!(
            encode_command(&args).as_ref(),
            b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"
        );
    }

    #[test]
    fn encode_empty_sequence() {
        assert_eq!(encode_command(&[]).as_ref(), b"*0\r\n");
    }

    #[test]
    fn encode_empty_argument() {
        let args = vec![Bytes::from_static(b"SET"), Bytes::new()];
        assert_eq!(
            encode_command(&args).as_ref(),
            b"*2\r\n$3\r\nSET\r\n$0\r\n\r\n"
        );
    }

    #[test]
    fn roundtrip_simple() {
        roundtrip(&[&b"SET"[..], b"key", b"value"]);
    }

    #[test]
    fn roundtrip_binary_payloads() {
        roundtrip(&[&b"SET"[..], b"k", b"\r\n\x00\xff binary \n"]);
        roundtrip(&[&b"LPUSH"[..], b"\x00chave", b"\r"]);
    }

    #[test]
    fn roundtrip_large_value() {
        let big = vec![b'x'; 16 * 1024];
        roundtrip(&[&b"SET"[..], b"big", &big]);
    }
}
