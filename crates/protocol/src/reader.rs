use bytes::{Buf, Bytes};
use std::io::Cursor;

use driftkv_common::{MAX_FRAME_SIZE, ProtocolError};

/// Lê um comando completo a partir do cursor e retorna a sequência de
/// argumentos. O primeiro byte decide a forma: `*` abre um frame array;
/// qualquer outro byte cai na forma inline (linha única terminada por LF).
///
/// O cursor só fica em posição válida após `Ok` ou `EmptyCommand` (a linha
/// vazia é consumida); nos demais erros o caller deve descartar a posição.
pub fn read_command(src: &mut Cursor<&[u8]>) -> Result<Vec<Bytes>, ProtocolError> {
    match peek_u8(src)? {
        b'*' => read_array(src),
        _ => read_inline(src),
    }
}

/// Frame array: `*N\r\n` seguido de N bulk strings. Contagem negativa
/// produz uma sequência vazia de argumentos.
fn read_array(src: &mut Cursor<&[u8]>) -> Result<Vec<Bytes>, ProtocolError> {
    src.advance(1); // '*'
    let count = read_decimal_line(src)?;
    if count < 0 {
        return Ok(Vec::new());
    }
    let mut args = Vec::new();
    for _ in 0..count {
        args.push(read_bulk(src)?);
    }
    Ok(args)
}

/// Bulk string: `$L\r\n` + L bytes + CRLF. Comprimento negativo produz um
/// argumento vazio (não nulo).
fn read_bulk(src: &mut Cursor<&[u8]>) -> Result<Bytes, ProtocolError> {
    match get_u8(src)? {
        b'$' => {}
        byte => return Err(ProtocolError::InvalidPrefix(byte)),
    }

    let len = read_decimal_line(src)?;
    if len < 0 {
        return Ok(Bytes::new());
    }
    let len = len as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    if src.remaining() < len + 2 {
        return Err(ProtocolError::Incomplete);
    }

    let start = src.position() as usize;
    let data = Bytes::copy_from_slice(&src.get_ref()[start..start + len]);
    src.advance(len);

    let cr = src.get_u8();
    let lf = src.get_u8();
    if cr != b'\r' || lf != b'\n' {
        return Err(ProtocolError::MissingCrlf);
    }
    Ok(data)
}

/// Forma inline: uma linha terminada por LF, separada em argumentos por
/// runs de whitespace. Pensada para uso manual via clientes orientados a
/// linha; o servidor nunca emite essa forma.
fn read_inline(src: &mut Cursor<&[u8]>) -> Result<Vec<Bytes>, ProtocolError> {
    let line = get_lf_line(src)?;
    let line = line.trim_ascii();
    if line.is_empty() {
        return Err(ProtocolError::EmptyCommand);
    }
    Ok(line
        .split(|b: &u8| b.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .map(Bytes::copy_from_slice)
        .collect())
}

fn peek_u8(src: &Cursor<&[u8]>) -> Result<u8, ProtocolError> {
    src.get_ref()
        .get(src.position() as usize)
        .copied()
        .ok_or(ProtocolError::Incomplete)
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, ProtocolError> {
    if !src.has_remaining() {
        return Err(ProtocolError::Incomplete);
    }
    Ok(src.get_u8())
}

/// Linha terminada por CRLF (linhas de contagem/comprimento).
fn get_crlf_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], ProtocolError> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    for i in start..end.saturating_sub(1) {
        if src.get_ref()[i] == b'\r' && src.get_ref()[i + 1] == b'\n' {
            src.set_position((i + 2) as u64);
            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(ProtocolError::Incomplete)
}

/// Linha terminada por LF (forma inline).
fn get_lf_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], ProtocolError> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    for i in start..end {
        if src.get_ref()[i] == b'\n' {
            src.set_position((i + 1) as u64);
            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(ProtocolError::Incomplete)
}

fn read_decimal_line(src: &mut Cursor<&[u8]>) -> Result<i64, ProtocolError> {
    let line = get_crlf_line(src)?;
    let line = line.trim_ascii();
    let s = std::str::from_utf8(line)
        .map_err(|_| ProtocolError::InvalidInteger(String::from_utf8_lossy(line).into_owned()))?;
    s.parse::<i64>()
        .map_err(|_| ProtocolError::InvalidInteger(s.to_string()))
}
