#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database};
use std::path::{Path, PathBuf};

const SCHEMA: &str = r#"
CREATE TABLE genres (GenreId INTEGER PRIMARY KEY, Name TEXT);
CREATE TABLE albums (AlbumId INTEGER PRIMARY KEY, Title TEXT NOT NULL);
CREATE TABLE tracks (
    TrackId INTEGER PRIMARY KEY,
    Name TEXT NOT NULL,
    AlbumId INTEGER,
    GenreId INTEGER
);
CREATE TABLE invoices (
    InvoiceId INTEGER PRIMARY KEY,
    BillingCountry TEXT,
    InvoiceDate DATETIME NOT NULL
);
CREATE TABLE invoice_items (
    InvoiceLineId INTEGER PRIMARY KEY AUTOINCREMENT,
    InvoiceId INTEGER NOT NULL,
    TrackId INTEGER NOT NULL
);
INSERT INTO genres VALUES (1, 'Rock'), (2, 'Jazz');
INSERT INTO albums VALUES (1, 'Big Ones'), (2, 'Let There Be Rock'), (3, 'Jazz Standards');
INSERT INTO tracks VALUES
    (1, 'Track X', 1, 1),
    (2, 'Track Y', 2, 1),
    (3, 'Blue Train', 3, 2),
    (4, 'Track A', 2, 1);
"#;

pub const TRACK_X: i64 = 1;
pub const TRACK_Y: i64 = 2;
pub const BLUE_TRAIN: i64 = 3;
pub const TRACK_A: i64 = 4;

/// 测试用源销售库
///
/// Brazil: 15 invoices (1-3 in 2008, 4-9 in 2010, 10-15 in 2011) and 37 items:
/// Track A x5 in 2008, Track X x4 in 2010, Track Y x3 in 2011, 25 jazz items.
/// Canada: 2 invoices in 2012. Portugal: 1 invoice in 2007, jazz only.
/// Chile: 1 invoice in 2010 with one Track Y and one Track X (a tie).
pub async fn build_source_db(dir: &Path) -> PathBuf {
    let path = dir.join("chinook.db");
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    db.execute_unprepared(SCHEMA).await.unwrap();

    let mut invoices: Vec<(i64, &str, String)> = Vec::new();
    for id in 1..=15i64 {
        let date = match id {
            1..=3 => format!("2008-0{}-01 00:00:00", id),
            4..=9 => format!("2010-0{}-15 00:00:00", id - 3),
            _ => format!("2011-0{}-10 00:00:00", id - 9),
        };
        invoices.push((id, "Brazil", date));
    }
    invoices.push((16, "Canada", "2012-02-01 00:00:00".to_string()));
    invoices.push((17, "Canada", "2012-03-01 00:00:00".to_string()));
    invoices.push((18, "Portugal", "2007-05-05 00:00:00".to_string()));
    invoices.push((19, "Chile", "2010-07-07 00:00:00".to_string()));

    let mut items: Vec<(i64, i64)> = vec![
        (1, TRACK_A),
        (1, TRACK_A),
        (2, TRACK_A),
        (2, TRACK_A),
        (3, TRACK_A),
        (4, TRACK_X),
        (5, TRACK_X),
        (6, TRACK_X),
        (7, TRACK_X),
        (10, TRACK_Y),
        (11, TRACK_Y),
        (12, TRACK_Y),
    ];
    for invoice in 4..=15 {
        items.push((invoice, BLUE_TRAIN));
        items.push((invoice, BLUE_TRAIN));
    }
    items.push((13, BLUE_TRAIN));
    items.extend([
        (16, TRACK_X),
        (17, BLUE_TRAIN),
        (18, BLUE_TRAIN),
        (19, TRACK_Y),
        (19, TRACK_X),
    ]);

    let mut sql = String::new();
    for (id, country, date) in &invoices {
        sql.push_str(&format!(
            "INSERT INTO invoices (InvoiceId, BillingCountry, InvoiceDate) VALUES ({}, '{}', '{}');\n",
            id, country, date
        ));
    }
    for (invoice, track) in &items {
        sql.push_str(&format!(
            "INSERT INTO invoice_items (InvoiceId, TrackId) VALUES ({}, {});\n",
            invoice, track
        ));
    }
    db.execute_unprepared(&sql).await.unwrap();
    db.close().await.unwrap();

    path
}

pub fn summary_url(dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", dir.join("summary.db").display())
}
