//! XML documents built from nested values.
//!
//! [`create`] converts a decoded JSON-style value tree into an XML document
//! wrapped in a `<root>` element: object keys become element names, array
//! items become repeated `<item>` elements, and scalars become escaped text
//! content.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use crate::error::Result;
use crate::file::{self, WriteOptions};

/// Read the XML file at `path` as raw UTF-8 text.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    file::read_to_string(path)
}

/// Build an XML document from `data` and write it to `path`.
pub fn create<P: AsRef<Path>>(path: P, data: &Value) -> Result<()> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("root")))?;
    write_value(&mut writer, data)?;
    writer.write_event(Event::End(BytesEnd::new("root")))?;

    let buf = writer.into_inner();
    file::write(path, &buf, &WriteOptions::default())?;
    Ok(())
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                writer.write_event(Event::Start(BytesStart::new(key.as_str())))?;
                write_value(writer, child)?;
                writer.write_event(Event::End(BytesEnd::new(key.as_str())))?;
            }
        }
        Value::Array(items) => {
            for item in items {
                writer.write_event(Event::Start(BytesStart::new("item")))?;
                write_value(writer, item)?;
                writer.write_event(Event::End(BytesEnd::new("item")))?;
            }
        }
        Value::String(s) => {
            writer.write_event(Event::Text(BytesText::new(s)))?;
        }
        scalar => {
            let text = scalar.to_string();
            writer.write_event(Event::Text(BytesText::new(&text)))?;
        }
    }
    Ok(())
}
