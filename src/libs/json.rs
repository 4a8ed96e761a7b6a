use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;

/// Serialize `value` as pretty JSON indented by `indent` spaces.
/// An `indent` of 0 gives compact output.
///
/// ```
/// use phylofam::libs::json::to_json_string;
/// let v = vec![1, 2];
/// assert_eq!(to_json_string(&v, 0).unwrap(), "[1,2]");
/// assert_eq!(to_json_string(&v, 2).unwrap(), "[\n  1,\n  2\n]");
/// ```
pub fn to_json_string<T: Serialize>(value: &T, indent: usize) -> anyhow::Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let spaces = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(spaces.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Parse a JSON document without serde_json's nesting limit; trees built
/// from large matrices can be much deeper than 128 levels.
///
/// The stack grows onto the heap as nesting deepens, so the depth is bounded
/// by memory rather than by the calling thread's stack.
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

pub fn read_json<T: DeserializeOwned>(infile: &str) -> anyhow::Result<T> {
    let text = crate::libs::io::read_to_string(infile)?;
    from_json_str(&text).with_context(|| format!("invalid JSON in {}", infile))
}

pub fn write_json<T: Serialize>(value: &T, outfile: &str, indent: usize) -> anyhow::Result<()> {
    let mut writer = crate::libs::io::writer(outfile)?;
    writer.write_all(to_json_string(value, indent)?.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
