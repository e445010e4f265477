//! Decodes a file of back-to-back values and prints them.
//!
//! Usage: `inspect <file> [default|utc|legacy]`
//!
//! Set `RUST_LOG=bolt_values=debug` to see dispatch failures.

use std::fs;

use bolt_values::codec::{Reader, ValueReader};
use bolt_values::{StructRegistry, Value, WriterVariant};

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.len() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Value::Bytes(b) => format!("BYTES[{}]", b.len()),
        Value::List(items) => format!("LIST[{}]", items.len()),
        Value::Map(map) => format!("MAP{{{}}}", map.keys().cloned().collect::<Vec<_>>().join(", ")),
        Value::Point(p) => format!("POINT({}, {:?})", p.crs(), p.coordinates()),
        Value::Node(n) => format!("NODE({} {:?} {})", n.id, n.labels, n.element_id),
        Value::Relationship(r) => format!("REL({} -[{}:{}]-> {})", r.start_id, r.id, r.rel_type, r.end_id),
        Value::Path(p) => format!("PATH(nodes={}, steps={})", p.nodes.len(), p.len()),
        other => format!("{:?}", other),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: inspect <file> [default|utc|legacy]");
    let variant = match args.next().as_deref() {
        None | Some("default") => WriterVariant::Default,
        Some("utc") => WriterVariant::Utc,
        Some("legacy") => WriterVariant::Legacy,
        Some(other) => panic!("unknown variant {:?}", other),
    };

    let data = fs::read(&path).expect("Failed to read file");
    println!("Reading: {} ({} bytes, {:?})", path, data.len(), variant);

    let values = ValueReader::new(StructRegistry::for_records(variant));
    let mut reader = Reader::new(&data);
    let mut count = 0usize;
    while !reader.is_empty() {
        let offset = reader.position();
        match values.read_value(&mut reader) {
            Ok(value) => {
                println!("[{:>6}] {:<20} {}", offset, value.type_name(), format_value(&value));
                count += 1;
            }
            Err(e) => {
                println!("[{:>6}] error: {} ({:?})", offset, e, e.kind());
                break;
            }
        }
    }
    println!("\n{} values decoded", count);
}
