//! Crawler log parsing.
//!
//! The crawler writes a plain-text report with three parts this module cares
//! about:
//!
//! ```text
//! 无法访问的影片页面列表（404或其他错误）:
//! - https://example.com/movie/1
//!
//! 总影片数量: 2
//!
//! 影片名称: 霸王别姬 (1993)
//!   夸克网盘链接: https://pan.quark.cn/s/abc
//!   百度网盘链接: https://pan.baidu.com/s/xyz?pwd=1234
//!   uc网盘链接: https://drive.uc.cn/s/def
//!   豆瓣链接: https://movie.douban.com/subject/1291546/
//! ```
//!
//! Movie blocks are read with a line state machine:
//!
//! - a title line opens a block (and discards any unfinished one)
//! - zero or one line per storage provider follows, in quark, baidu, uc order
//! - `无网盘链接` may stand in for the link lines
//! - the Douban line closes the block and emits a record
//!
//! Anything else inside a block (blank line, `无豆瓣链接`, out-of-order link)
//! drops that block silently. Missing sections are empty, never errors.

mod backup;
mod writer;

pub use backup::{backup_path, read_log, write_backup};
pub use writer::{write_block, write_log};

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{MovieRecord, StorageProvider};

pub const INACCESSIBLE_HEADER: &str = "无法访问的影片页面列表（404或其他错误）:";
pub const LIST_MARKER: &str = "- ";
pub const TOTAL_LABEL: &str = "总影片数量:";
pub const TITLE_LABEL: &str = "影片名称:";
pub const DOUBAN_LABEL: &str = "豆瓣链接:";
pub const NO_LINKS_MARKER: &str = "无网盘链接";

/// Result of parsing one crawler log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub records: Vec<MovieRecord>,
    pub total_count: u64,
    pub inaccessible_urls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct LogParser;

impl LogParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> ParsedLog {
        ParsedLog {
            records: parse_records(content),
            total_count: parse_total(content),
            inaccessible_urls: parse_inaccessible(content),
        }
    }
}

/// First integer after the total label, `0` when absent.
fn parse_total(content: &str) -> u64 {
    content
        .lines()
        .find_map(|line| {
            let (_, rest) = line.split_once(TOTAL_LABEL)?;
            let digits: String = rest
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

fn parse_inaccessible(content: &str) -> Vec<String> {
    let mut lines = content.lines();
    if !lines.by_ref().any(|line| line.trim() == INACCESSIBLE_HEADER) {
        return Vec::new();
    }

    lines
        .map_while(|line| line.strip_prefix(LIST_MARKER))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}

/// One classified log line.
enum Line<'a> {
    Title(&'a str),
    Link(StorageProvider, &'a str),
    NoLinks,
    Douban(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    if let Some(title) = line.strip_prefix(TITLE_LABEL) {
        return Line::Title(title.trim());
    }
    if let Some(url) = line.strip_prefix(DOUBAN_LABEL) {
        return Line::Douban(url.trim());
    }
    if line == NO_LINKS_MARKER {
        return Line::NoLinks;
    }
    StorageProvider::ALL
        .into_iter()
        .find_map(|provider| {
            line.strip_prefix(provider.log_label())
                .map(|url| Line::Link(provider, url.trim()))
        })
        .unwrap_or(Line::Other)
}

/// A movie block whose Douban line has not been seen yet.
struct OpenBlock<'a> {
    title: &'a str,
    links: BTreeMap<StorageProvider, String>,
    // Index into `StorageProvider::ALL` of the earliest provider still allowed.
    next_slot: usize,
    no_links: bool,
}

impl<'a> OpenBlock<'a> {
    fn new(title: &'a str) -> Self {
        Self {
            title,
            links: BTreeMap::new(),
            next_slot: 0,
            no_links: false,
        }
    }

    fn with_link(mut self, provider: StorageProvider, url: &str) -> Option<Self> {
        let slot = StorageProvider::ALL.iter().position(|p| *p == provider)?;
        if self.no_links || slot < self.next_slot {
            debug!(title = self.title, ?provider, "out-of-order link line, dropping block");
            return None;
        }
        if !url.is_empty() {
            self.links.insert(provider, url.to_string());
        }
        self.next_slot = slot + 1;
        Some(self)
    }

    fn with_no_links(mut self) -> Option<Self> {
        if self.next_slot > 0 {
            debug!(title = self.title, "no-link marker after link lines, dropping block");
            return None;
        }
        self.no_links = true;
        Some(self)
    }

    fn finish(self, douban_url: &str) -> MovieRecord {
        MovieRecord::new(self.title, self.links, douban_url)
    }
}

fn parse_records(content: &str) -> Vec<MovieRecord> {
    let mut records = Vec::new();
    let mut open: Option<OpenBlock<'_>> = None;

    for line in content.lines() {
        open = match (open.take(), classify(line)) {
            (previous, Line::Title(title)) => {
                if let Some(block) = previous {
                    debug!(title = block.title, "block has no Douban line, skipping");
                }
                Some(OpenBlock::new(title))
            }
            (Some(block), Line::Link(provider, url)) => block.with_link(provider, url),
            (Some(block), Line::NoLinks) => block.with_no_links(),
            (Some(block), Line::Douban(url)) => {
                records.push(block.finish(url));
                None
            }
            (Some(block), Line::Other) => {
                debug!(title = block.title, "block has no Douban line, skipping");
                None
            }
            (None, _) => None,
        };
    }

    if let Some(block) = open {
        debug!(title = block.title, "log ended inside a block, skipping");
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "无法访问的影片页面列表（404或其他错误）:
- https://ddys.pro/movie-a/
- https://ddys.pro/movie-b/

总影片数量: 3
没有包含网盘信息的影片数量: 1

没有包含网盘信息的影片列表:
- 无链接电影

影片名称及其对应的网盘链接和豆瓣链接:
影片名称: 霸王别姬 (1993)
  夸克网盘链接: https://pan.quark.cn/s/abc123
  百度网盘链接: https://pan.baidu.com/s/1xyz?pwd=abcd
  uc网盘链接: https://drive.uc.cn/s/def456
  豆瓣链接: https://movie.douban.com/subject/1291546/

影片名称: 无链接电影
  无网盘链接
  豆瓣链接: https://movie.douban.com/subject/1292052/

影片名称: 没有豆瓣
  夸克网盘链接: https://pan.quark.cn/s/zzz
  无豆瓣链接

影片名称: 只有UC
  uc网盘链接: https://drive.uc.cn/s/uuu
  豆瓣链接: https://movie.douban.com/subject/3011091/
";

    #[test]
    fn test_parse_total_and_inaccessible() {
        let parsed = LogParser::new().parse(SAMPLE_LOG);
        assert_eq!(parsed.total_count, 3);
        assert_eq!(
            parsed.inaccessible_urls,
            vec!["https://ddys.pro/movie-a/", "https://ddys.pro/movie-b/"]
        );
    }

    #[test]
    fn test_parse_records_skips_block_without_douban() {
        let parsed = LogParser::new().parse(SAMPLE_LOG);
        let titles: Vec<_> = parsed.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["霸王别姬 (1993)", "无链接电影", "只有UC"]);
    }

    #[test]
    fn test_parse_record_fields() {
        let parsed = LogParser::new().parse(SAMPLE_LOG);

        let full = &parsed.records[0];
        assert_eq!(full.base_title, "霸王别姬");
        assert_eq!(full.link(StorageProvider::Quark), Some("https://pan.quark.cn/s/abc123"));
        assert_eq!(
            full.link(StorageProvider::Baidu),
            Some("https://pan.baidu.com/s/1xyz?pwd=abcd")
        );
        assert_eq!(full.link(StorageProvider::Uc), Some("https://drive.uc.cn/s/def456"));
        assert_eq!(full.douban_id, "1291546");
        assert_eq!(full.cache_key, "douban_1291546");

        let bare = &parsed.records[1];
        assert!(bare.storage_links.is_empty());
        assert_eq!(bare.douban_id, "1292052");

        let uc_only = &parsed.records[2];
        assert_eq!(uc_only.storage_links.len(), 1);
        assert_eq!(uc_only.link(StorageProvider::Uc), Some("https://drive.uc.cn/s/uuu"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let parsed = LogParser::new().parse("影片名称: A\n  豆瓣链接: \n");
        assert_eq!(parsed.total_count, 0);
        assert!(parsed.inaccessible_urls.is_empty());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].douban_url, "");
        assert_eq!(parsed.records[0].douban_id, "");
        assert!(parsed.records[0].cache_key.starts_with("name_"));
    }

    #[test]
    fn test_out_of_order_links_drop_block() {
        let log = "影片名称: 乱序
  百度网盘链接: https://pan.baidu.com/s/1
  夸克网盘链接: https://pan.quark.cn/s/2
  豆瓣链接: https://movie.douban.com/subject/1/
影片名称: 正常
  豆瓣链接: https://movie.douban.com/subject/2/
";
        let parsed = LogParser::new().parse(log);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].title, "正常");
    }

    #[test]
    fn test_duplicate_link_line_drops_block() {
        let log = "影片名称: 重复
  夸克网盘链接: https://pan.quark.cn/s/1
  夸克网盘链接: https://pan.quark.cn/s/2
  豆瓣链接: https://movie.douban.com/subject/1/
";
        assert!(LogParser::new().parse(log).records.is_empty());
    }

    #[test]
    fn test_unterminated_block_at_eof_is_skipped() {
        let log = "影片名称: 截断\n  夸克网盘链接: https://pan.quark.cn/s/1";
        assert!(LogParser::new().parse(log).records.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = LogParser::new().parse(SAMPLE_LOG);
        let b = LogParser::new().parse(SAMPLE_LOG);
        let keys_a: Vec<_> = a.records.iter().map(|r| r.cache_key.clone()).collect();
        let keys_b: Vec<_> = b.records.iter().map(|r| r.cache_key.clone()).collect();
        assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn test_block_round_trip() {
        let parsed = LogParser::new().parse(SAMPLE_LOG);
        let original = &parsed.records[0];

        let reparsed = LogParser::new().parse(&write_block(original));
        assert_eq!(reparsed.records.len(), 1);
        let again = &reparsed.records[0];
        assert_eq!(again.title, original.title);
        assert_eq!(again.storage_links, original.storage_links);
        assert_eq!(again.douban_url, original.douban_url);
        assert_eq!(again.cache_key, original.cache_key);
    }
}
