use std::sync::{Arc, Mutex};

use smart_json_path::{CodingKey, CodingPath};
use smart_json_sentinel::{clear_log_handler, set_log_handler, DebugLevel, LogItem, Sentinel};

fn path(keys: &[CodingKey]) -> CodingPath {
    CodingPath::from(keys.to_vec())
}

fn body(report: &str) -> Vec<&str> {
    let lines: Vec<&str> = report.lines().collect();
    lines[1..lines.len() - 1].to_vec()
}

#[test]
fn one_entry_per_array_element() {
    let mut s = Sentinel::with_level(DebugLevel::Verbose);
    for i in 0..100usize {
        let p = path(&["list".into(), i.into()]);
        s.record(LogItem::key_not_found("name", p));
    }
    let containers = s.containers();
    assert_eq!(containers.len(), 100);
    assert!(containers.iter().all(|c| c.items.len() == 1));
    assert_eq!(containers[2].path.to_string(), "list[2]");
    assert_eq!(containers[10].path.to_string(), "list[10]");
}

#[test]
fn report_layout_with_prefix_diff_and_alignment() {
    let mut s = Sentinel::with_level(DebugLevel::Verbose);
    let root = CodingPath::new();
    let first = path(&["items".into(), 0usize.into()]);
    let second = path(&["items".into(), 1usize.into()]);
    s.note_container(&root, "Order");
    s.note_container(&path(&["items".into()]), "Vec<Item>");
    s.note_container(&first, "Item");
    s.note_container(&second, "Item");

    s.record(LogItem::type_mismatch("price", "f64", "String", second.clone()));
    s.record(LogItem::key_not_found("id", root.clone()));
    s.record(LogItem::key_not_found("sku", first.clone()));
    s.record(LogItem::value_not_found("quantity", "i64", first.clone()));

    let report = s.format_logs().unwrap();
    let first_line = report.lines().next().unwrap();
    assert!(first_line.contains(s.session()));
    assert_eq!(
        body(&report),
        vec![
            "Order",
            "    id : No value associated with key.",
            "    items: Vec<Item>",
            "        [0]: Item",
            "            sku      : No value associated with key.",
            "            quantity : Expected to decode 'i64' but found null instead.",
            "        [1]: Item",
            "            price : Expected to decode 'f64' but found 'String' instead.",
        ]
    );
}

#[test]
fn root_without_type_name_uses_placeholder() {
    let mut s = Sentinel::with_level(DebugLevel::Verbose);
    s.record(LogItem::key_not_found("a", CodingPath::new()));
    let report = s.format_logs().unwrap();
    assert_eq!(body(&report)[0], "<root>");
}

#[test]
fn handler_receives_formatted_report() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    set_log_handler(move |report| sink.lock().unwrap().push(report.to_string()));

    let mut s = Sentinel::with_level(DebugLevel::Verbose);
    s.record(LogItem::data_corrupted("avatar", "Invalid URL string.", CodingPath::new()));
    s.emit();
    s.emit();
    clear_log_handler();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("avatar : Invalid URL string."));
}

#[test]
fn sessions_have_distinct_tokens() {
    let a = Sentinel::with_level(DebugLevel::Verbose);
    let b = Sentinel::with_level(DebugLevel::Verbose);
    assert_eq!(a.session().len(), 8);
    // 1 in 2^32 collision chance.
    assert_ne!(a.session(), b.session());
}
