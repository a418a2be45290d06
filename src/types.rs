//! Built-in leaf codecs: fixed-width integers, raw bytes, UTF-8 text.
//!
//! All are registered by [crate::registry::Registry::with_builtins]. Sizes
//! and other parameters arrive as resolved [Params], so any of them may be a
//! back-reference to an earlier field.

use crate::errors::FieldError;
use crate::field::{FieldType, Params};
use crate::stream::Stream;
use crate::value::Value;

/// Byte order for multi-byte integers, selected by the optional `endian`
/// parameter (`"big"` is the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Big,
    Little,
}

fn endian(params: &Params) -> Result<Endian, FieldError> {
    match params.get("endian") {
        None => Ok(Endian::Big),
        Some(Value::Str(s)) if s == "big" => Ok(Endian::Big),
        Some(Value::Str(s)) if s == "little" => Ok(Endian::Little),
        Some(other) => Err(FieldError::BadParameter {
            name: "endian",
            reason: format!("expected \"big\" or \"little\", got {:?}", other),
        }),
    }
}

/// Sign-extends the low `bits` of `raw` to a full `i64`.
fn sign_extend(raw: u64, bits: usize) -> i64 {
    let shift = 64 - bits;
    ((raw << shift) as i64) >> shift
}

/// Fixed-width integer of 1 to 8 bytes, unsigned or two's-complement signed.
#[derive(Debug, Clone)]
pub struct IntCodec {
    /// Width in bytes.
    pub width: usize,
    pub signed: bool,
}

impl FieldType for IntCodec {
    fn read(&self, stream: &mut dyn Stream, params: &Params) -> Result<Value, FieldError> {
        let bytes = stream.read_bytes(self.width)?;

        let mut raw = 0u64;
        match endian(params)? {
            Endian::Big => {
                for b in &bytes {
                    raw = (raw << 8) | *b as u64;
                }
            }
            Endian::Little => {
                for b in bytes.iter().rev() {
                    raw = (raw << 8) | *b as u64;
                }
            }
        }

        if self.signed {
            Ok(Value::Int(sign_extend(raw, self.width * 8)))
        } else {
            Ok(Value::UInt(raw))
        }
    }

    fn write(
        &self,
        stream: &mut dyn Stream,
        value: &Value,
        params: &Params,
    ) -> Result<(), FieldError> {
        let raw = match (self.signed, value) {
            (false, Value::UInt(v)) => {
                if self.width < 8 && *v >> (self.width * 8) != 0 {
                    return Err(FieldError::InvalidValue(format!(
                        "{} does not fit in {} bytes",
                        v, self.width
                    )));
                }
                *v
            }
            (true, Value::Int(v)) => {
                if self.width < 8 {
                    let bits = self.width as u32 * 8;
                    let min = -(1i64 << (bits - 1));
                    let max = (1i64 << (bits - 1)) - 1;
                    if *v < min || *v > max {
                        return Err(FieldError::InvalidValue(format!(
                            "{} does not fit in {} bytes",
                            v, self.width
                        )));
                    }
                }
                *v as u64
            }
            (signed, other) => {
                return Err(FieldError::InvalidValue(format!(
                    "expected {} integer, got {:?}",
                    if signed { "a signed" } else { "an unsigned" },
                    other
                )));
            }
        };

        let mut bytes = vec![0u8; self.width];
        match endian(params)? {
            Endian::Big => {
                for (i, b) in bytes.iter_mut().enumerate() {
                    *b = (raw >> ((self.width - 1 - i) * 8)) as u8;
                }
            }
            Endian::Little => {
                for (i, b) in bytes.iter_mut().enumerate() {
                    *b = (raw >> (i * 8)) as u8;
                }
            }
        }

        stream.write_bytes(&bytes)?;
        Ok(())
    }
}

/// Raw byte run whose length comes from the required `size` parameter. The
/// usual carrier for length-prefixed payloads.
#[derive(Debug, Clone)]
pub struct BytesCodec;

impl FieldType for BytesCodec {
    fn required_params(&self) -> &'static [&'static str] {
        &["size"]
    }

    fn read(&self, stream: &mut dyn Stream, params: &Params) -> Result<Value, FieldError> {
        let size = params.require_usize("size")?;
        Ok(Value::Bytes(stream.read_bytes(size)?))
    }

    fn write(
        &self,
        stream: &mut dyn Stream,
        value: &Value,
        params: &Params,
    ) -> Result<(), FieldError> {
        let size = params.require_usize("size")?;
        let bytes = value
            .as_bytes()
            .ok_or_else(|| FieldError::InvalidValue(format!("expected bytes, got {:?}", value)))?;

        if bytes.len() != size {
            return Err(FieldError::InvalidValue(format!(
                "expected {} bytes, got {}",
                size,
                bytes.len()
            )));
        }

        stream.write_bytes(bytes)?;
        Ok(())
    }
}

/// UTF-8 text of exactly `size` bytes.
#[derive(Debug, Clone)]
pub struct TextCodec;

impl FieldType for TextCodec {
    fn required_params(&self) -> &'static [&'static str] {
        &["size"]
    }

    fn read(&self, stream: &mut dyn Stream, params: &Params) -> Result<Value, FieldError> {
        let size = params.require_usize("size")?;
        let bytes = stream.read_bytes(size)?;

        let text = String::from_utf8(bytes)
            .map_err(|err| FieldError::InvalidData(format!("invalid UTF-8: {}", err)))?;

        Ok(Value::Str(text))
    }

    fn write(
        &self,
        stream: &mut dyn Stream,
        value: &Value,
        params: &Params,
    ) -> Result<(), FieldError> {
        let size = params.require_usize("size")?;
        let text = value.as_str().ok_or_else(|| {
            FieldError::InvalidValue(format!("expected a string, got {:?}", value))
        })?;

        if text.len() != size {
            return Err(FieldError::InvalidValue(format!(
                "string encodes to {} bytes, field size is {}",
                text.len(),
                size
            )));
        }

        stream.write_bytes(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::BufStream;

    fn size_params(size: u64) -> Params {
        Params::from_iter([("size".to_string(), Value::UInt(size))])
    }

    #[test]
    fn test_uint16_read_big_endian_default() {
        let codec = IntCodec { width: 2, signed: false };
        let mut stream = BufStream::from_bytes(vec![0x01, 0x02]);
        assert_eq!(
            codec.read(&mut stream, &Params::default()),
            Ok(Value::UInt(0x0102))
        );
    }

    #[test]
    fn test_uint16_read_little_endian() {
        let codec = IntCodec { width: 2, signed: false };
        let params = Params::from_iter([("endian".to_string(), Value::Str("little".to_string()))]);
        let mut stream = BufStream::from_bytes(vec![0x01, 0x02]);
        assert_eq!(codec.read(&mut stream, &params), Ok(Value::UInt(0x0201)));
    }

    #[test]
    fn test_int8_read_sign_extends() {
        let codec = IntCodec { width: 1, signed: true };
        let mut stream = BufStream::from_bytes(vec![0xff]);
        assert_eq!(
            codec.read(&mut stream, &Params::default()),
            Ok(Value::Int(-1))
        );
    }

    #[test]
    fn test_uint_write_round_trip() {
        let codec = IntCodec { width: 4, signed: false };
        let mut stream = BufStream::new();
        codec
            .write(&mut stream, &Value::UInt(0xdead_beef), &Params::default())
            .unwrap();

        assert_eq!(
            codec.read(&mut stream, &Params::default()),
            Ok(Value::UInt(0xdead_beef))
        );
    }

    #[test]
    fn test_int_write_little_endian() {
        let codec = IntCodec { width: 2, signed: true };
        let params = Params::from_iter([("endian".to_string(), Value::Str("little".to_string()))]);
        let mut stream = BufStream::new();
        codec.write(&mut stream, &Value::Int(-2), &params).unwrap();
        assert_eq!(stream.into_bytes(), vec![0xfe, 0xff]);
    }

    #[test]
    fn test_uint_write_out_of_range() {
        let codec = IntCodec { width: 1, signed: false };
        let mut stream = BufStream::new();
        assert!(matches!(
            codec.write(&mut stream, &Value::UInt(256), &Params::default()),
            Err(FieldError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_int_write_out_of_range() {
        let codec = IntCodec { width: 1, signed: true };
        let mut stream = BufStream::new();
        assert!(matches!(
            codec.write(&mut stream, &Value::Int(128), &Params::default()),
            Err(FieldError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_uint_write_rejects_wrong_type() {
        let codec = IntCodec { width: 1, signed: false };
        let mut stream = BufStream::new();
        assert!(matches!(
            codec.write(&mut stream, &Value::Int(1), &Params::default()),
            Err(FieldError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_bad_endian_parameter() {
        let codec = IntCodec { width: 2, signed: false };
        let params = Params::from_iter([("endian".to_string(), Value::Str("middle".to_string()))]);
        let mut stream = BufStream::from_bytes(vec![0x01, 0x02]);
        assert!(matches!(
            codec.read(&mut stream, &params),
            Err(FieldError::BadParameter { name: "endian", .. })
        ));
    }

    #[test]
    fn test_bytes_read() {
        let codec = BytesCodec;
        let mut stream = BufStream::from_bytes(vec![0x41, 0x42, 0x43]);
        assert_eq!(
            codec.read(&mut stream, &size_params(3)),
            Ok(Value::Bytes(vec![0x41, 0x42, 0x43]))
        );
    }

    #[test]
    fn test_bytes_read_missing_size() {
        let codec = BytesCodec;
        let mut stream = BufStream::from_bytes(vec![0x41]);
        assert_eq!(
            codec.read(&mut stream, &Params::default()),
            Err(FieldError::MissingParameter("size"))
        );
    }

    #[test]
    fn test_bytes_write_size_mismatch() {
        let codec = BytesCodec;
        let mut stream = BufStream::new();
        assert!(matches!(
            codec.write(&mut stream, &Value::Bytes(vec![0x41]), &size_params(2)),
            Err(FieldError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_text_read() {
        let codec = TextCodec;
        let mut stream = BufStream::from_bytes(b"hey".to_vec());
        assert_eq!(
            codec.read(&mut stream, &size_params(3)),
            Ok(Value::Str("hey".to_string()))
        );
    }

    #[test]
    fn test_text_read_invalid_utf8() {
        let codec = TextCodec;
        let mut stream = BufStream::from_bytes(vec![0xff, 0xfe]);
        assert!(matches!(
            codec.read(&mut stream, &size_params(2)),
            Err(FieldError::InvalidData(_))
        ));
    }

    #[test]
    fn test_text_write_round_trip() {
        let codec = TextCodec;
        let mut stream = BufStream::new();
        codec
            .write(&mut stream, &Value::Str("ok".to_string()), &size_params(2))
            .unwrap();
        assert_eq!(
            codec.read(&mut stream, &size_params(2)),
            Ok(Value::Str("ok".to_string()))
        );
    }
}
