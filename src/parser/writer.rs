use std::fmt::Write;

use crate::domain::{MovieRecord, StorageProvider};
use crate::parser::{
    DOUBAN_LABEL, INACCESSIBLE_HEADER, LIST_MARKER, NO_LINKS_MARKER, TITLE_LABEL, TOTAL_LABEL,
};

/// Serialize one record in the crawler's block layout.
pub fn write_block(record: &MovieRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", TITLE_LABEL, record.title);

    if record.storage_links.is_empty() {
        let _ = writeln!(out, "  {}", NO_LINKS_MARKER);
    }
    for provider in StorageProvider::ALL {
        if let Some(link) = record.link(provider) {
            let _ = writeln!(out, "  {} {}", provider.log_label(), link);
        }
    }

    let _ = writeln!(out, "  {} {}", DOUBAN_LABEL, record.douban_url);
    out
}

/// Serialize a whole log: inaccessible list, total, then every block.
pub fn write_log(total_count: u64, inaccessible_urls: &[String], records: &[MovieRecord]) -> String {
    let mut out = String::new();

    if !inaccessible_urls.is_empty() {
        let _ = writeln!(out, "{}", INACCESSIBLE_HEADER);
        for url in inaccessible_urls {
            let _ = writeln!(out, "{}{}", LIST_MARKER, url);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{} {}\n", TOTAL_LABEL, total_count);

    for record in records {
        out.push_str(&write_block(record));
        out.push('\n');
    }

    out
}
