use std::io::{
    BufRead,
    ErrorKind,
    Read,
    Write
};

use serde::{
    Deserialize,
    Serialize
};
use tracing::debug;

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::tabulated::tabulatedfunction::{
    StorageKind,
    TabulatedFunction
};
use crate::function::tabulated::tabulatedfunctionfactory::TabulatedFunctionFactory;

const PREALLOCATION_LIMIT: usize = 1 << 16;

// ─────────────────────────────────────────────
// Text
// ─────────────────────────────────────────────
//
// Line 1 is the point count, every following line is "<x> <y>". Numbers use
// '.' as decimal separator whatever the platform locale; `f64` Display and
// FromStr are locale independent and round-trip exactly.

pub fn write_text<W, F>(writer: &mut W, function: &F) -> FunctionResult<()>
where
    W: Write,
    F: TabulatedFunction + ?Sized,
{
    writeln!(writer, "{}", function.count())?;
    for point in function.iter() {
        writeln!(writer, "{} {}", point.x(), point.y())?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_number(field: &str, line_number: usize) -> FunctionResult<f64> {
    field.parse::<f64>().map_err(|error| {
        FunctionError::format(format!("line {line_number}: cannot parse '{field}': {error}"))
    })
}

pub fn read_text<R: BufRead>(
    reader: R,
    factory: &dyn TabulatedFunctionFactory,
) -> FunctionResult<Box<dyn TabulatedFunction>> {
    let mut lines = reader.lines();
    let count_line = lines
        .next()
        .transpose()?
        .ok_or_else(|| FunctionError::format("missing point count line"))?;
    let count: usize = count_line.trim().parse().map_err(|_| {
        FunctionError::format(format!("line 1: invalid point count '{}'", count_line.trim()))
    })?;
    if count < 2 {
        return Err(FunctionError::format(format!("point count must be at least 2, got {count}")));
    }

    let mut x_values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    let mut y_values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    for i in 0..count {
        let line_number = i + 2;
        let line = lines.next().transpose()?.ok_or_else(|| {
            FunctionError::format(format!("expected {count} points, found {i}"))
        })?;
        let fields: Vec<&str> = line.trim().split(' ').collect();
        let [x, y] = fields.as_slice() else {
            return Err(FunctionError::format(format!(
                "line {line_number}: expected 2 fields, found {}",
                fields.len()
            )));
        };
        x_values.push(parse_number(x, line_number)?);
        y_values.push(parse_number(y, line_number)?);
    }
    debug!(count, storage = ?factory.storage_kind(), "read text function");
    factory.create(&x_values, &y_values)
}

// ─────────────────────────────────────────────
// Binary
// ─────────────────────────────────────────────
//
// 4-byte count, then `count` pairs of 8-byte floats (x, y). Big-endian, no
// header or version field.

pub fn write_binary<W, F>(writer: &mut W, function: &F) -> FunctionResult<()>
where
    W: Write,
    F: TabulatedFunction + ?Sized,
{
    let count = i32::try_from(function.count())
        .map_err(|_| FunctionError::format("too many points for a 4-byte count"))?;
    writer.write_all(&count.to_be_bytes())?;
    for point in function.iter() {
        writer.write_all(&point.x().to_be_bytes())?;
        writer.write_all(&point.y().to_be_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn read_bytes<R: Read, const N: usize>(reader: &mut R) -> FunctionResult<[u8; N]> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer).map_err(|error| match error.kind() {
        ErrorKind::UnexpectedEof => FunctionError::format("truncated binary stream"),
        _ => FunctionError::Io(error),
    })?;
    Ok(buffer)
}

pub fn read_binary<R: Read>(
    reader: &mut R,
    factory: &dyn TabulatedFunctionFactory,
) -> FunctionResult<Box<dyn TabulatedFunction>> {
    let count = i32::from_be_bytes(read_bytes(reader)?);
    if count < 2 {
        return Err(FunctionError::format(format!("point count must be at least 2, got {count}")));
    }
    let count = count as usize;
    // The count is untrusted until the stream proves it holds that many pairs.
    let mut x_values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    let mut y_values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    for _ in 0..count {
        x_values.push(f64::from_be_bytes(read_bytes(reader)?));
        y_values.push(f64::from_be_bytes(read_bytes(reader)?));
    }
    debug!(count, storage = ?factory.storage_kind(), "read binary function");
    factory.create(&x_values, &y_values)
}

// ─────────────────────────────────────────────
// Whole-object (JSON)
// ─────────────────────────────────────────────
//
// Keeps the storage kind, so a function comes back as the same concrete
// storage it was written from. JSON has no literal for NaN or the
// infinities, so those samples are written as the strings "NaN", "inf" and
// "-inf".

#[derive(Serialize, Deserialize)]
struct EncodedFunction {
    storage: StorageKind,
    #[serde(with = "lossless_values")]
    x_values: Vec<f64>,
    #[serde(with = "lossless_values")]
    y_values: Vec<f64>,
}

mod lossless_values {
    use serde::de::Error;
    use serde::{
        Deserialize,
        Deserializer,
        Serialize,
        Serializer
    };

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum EncodedValue {
        Finite(f64),
        NonFinite(String),
    }

    impl EncodedValue {
        fn encode(value: f64) -> EncodedValue {
            if value.is_finite() {
                EncodedValue::Finite(value)
            } else {
                EncodedValue::NonFinite(value.to_string())
            }
        }

        fn decode(self) -> Result<f64, String> {
            match self {
                EncodedValue::Finite(value) => Ok(value),
                EncodedValue::NonFinite(text) => match text.as_str() {
                    "NaN" => Ok(f64::NAN),
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    _ => Err(format!("'{text}' is not a number")),
                },
            }
        }
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|&value| EncodedValue::encode(value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<EncodedValue>::deserialize(deserializer)?
            .into_iter()
            .map(|value| value.decode().map_err(D::Error::custom))
            .collect()
    }
}

impl EncodedFunction {
    fn encode<F: TabulatedFunction + ?Sized>(function: &F) -> EncodedFunction {
        EncodedFunction {
            storage: function.storage_kind(),
            x_values: function.x_values(),
            y_values: function.y_values(),
        }
    }

    fn decode(self) -> FunctionResult<Box<dyn TabulatedFunction>> {
        self.storage.factory().create(&self.x_values, &self.y_values)
    }
}

pub fn serialize<W, F>(writer: W, function: &F) -> FunctionResult<()>
where
    W: Write,
    F: TabulatedFunction + ?Sized,
{
    serde_json::to_writer(writer, &EncodedFunction::encode(function))?;
    Ok(())
}

pub fn deserialize<R: Read>(reader: R) -> FunctionResult<Box<dyn TabulatedFunction>> {
    let encoded: EncodedFunction = serde_json::from_reader(reader)?;
    encoded.decode()
}

/// Writes a sequence of functions, e.g. a function followed by its successive derivatives.
pub fn serialize_chain<W: Write>(
    writer: W,
    functions: &[Box<dyn TabulatedFunction>],
) -> FunctionResult<()> {
    let encoded: Vec<EncodedFunction> = functions
        .iter()
        .map(|function| EncodedFunction::encode(function.as_ref()))
        .collect();
    serde_json::to_writer(writer, &encoded)?;
    Ok(())
}

pub fn deserialize_chain<R: Read>(reader: R) -> FunctionResult<Vec<Box<dyn TabulatedFunction>>> {
    let encoded: Vec<EncodedFunction> = serde_json::from_reader(reader)?;
    encoded.into_iter().map(EncodedFunction::decode).collect()
}
