use std::fs;
use std::path::PathBuf;

use recon_ingest::read_export_table;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("recon_ingest_table_{stamp}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_file(path);
    if let Some(parent) = path.parent() {
        let _ = fs::remove_dir_all(parent);
    }
}

#[test]
fn reads_export_rows_under_the_header() {
    let path = temp_file("export.csv", "Store,Item,Qty\n101,GLD-1,5\n102,GLD-1,\n");
    let table = read_export_table(&path).expect("read export");
    assert_eq!(table.headers, vec!["Store", "Item", "Qty"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.value(0, "Qty"), "5");
    assert_eq!(table.value(1, "Qty"), "");

    cleanup(&path);
}

#[test]
fn skips_title_preamble_and_blank_lines() {
    let contents = "Allocation Export,,\n\nStore,Item,Qty\n101,GLD-1,5\n\n102,GLD-2,3\n";
    let path = temp_file("preamble.csv", contents);
    let table = read_export_table(&path).expect("read export");
    assert_eq!(table.headers, vec!["Store", "Item", "Qty"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0], vec!["101", "GLD-1", "5"]);
    assert_eq!(table.rows[1], vec!["102", "GLD-2", "3"]);

    cleanup(&path);
}

#[test]
fn prefers_identifier_header_over_label_row() {
    let contents = "Store Name,Item Number,Quantity Shipped\nSTORE,ITEM,QTY\n101,GLD-1,5\n";
    let path = temp_file("labels.csv", contents);
    let table = read_export_table(&path).expect("read export");
    assert_eq!(table.headers, vec!["STORE", "ITEM", "QTY"]);
    assert_eq!(table.rows.len(), 1);

    cleanup(&path);
}

#[test]
fn pads_short_rows_to_header_width() {
    let path = temp_file("ragged.csv", "Store,Item,Qty\n101,GLD-1\n");
    let table = read_export_table(&path).expect("read export");
    assert_eq!(table.rows[0], vec!["101", "GLD-1", ""]);

    cleanup(&path);
}

#[test]
fn empty_file_yields_empty_table() {
    let path = temp_file("empty.csv", "");
    let table = read_export_table(&path).expect("read export");
    assert!(table.headers.is_empty());
    assert!(table.is_empty());

    cleanup(&path);
}

#[test]
fn strips_quotes_and_whitespace_from_cells() {
    let path = temp_file(
        "quoted.csv",
        "Store,Item,Qty\n\"101\",\" Glide Widget, XL \",\"1,200\"\n",
    );
    let table = read_export_table(&path).expect("read export");
    assert_eq!(table.rows[0][0], "101");
    assert_eq!(table.rows[0][1], "Glide Widget, XL");
    assert_eq!(table.rows[0][2], "1,200");

    cleanup(&path);
}
