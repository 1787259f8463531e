//! Static HTML report.
//!
//! The whole record list is embedded as a JSON data block and paginated in
//! the browser, so the output is one self-contained file with no external
//! scripts, styles or network calls at render time.

use std::fmt::Write;

use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::app::Result;
use crate::domain::{MovieRecord, Placeholder, Report, StorageProvider};

pub const DEFAULT_PAGE_SIZE: usize = 25;

const STYLES: &str = include_str!("report.css");
const SCRIPT: &str = include_str!("report.js");

#[derive(Serialize)]
struct LinkButton<'a> {
    provider: StorageProvider,
    label: &'static str,
    url: &'a str,
}

/// Per-card payload consumed by the pagination script.
#[derive(Serialize)]
struct CardData<'a> {
    name: &'a str,
    image_url: &'a str,
    douban_link: &'a str,
    douban_id: &'a str,
    links: Vec<LinkButton<'a>>,
    status: &'static str,
    status_label: &'static str,
    is_new: bool,
}

impl<'a> From<&'a MovieRecord> for CardData<'a> {
    fn from(record: &'a MovieRecord) -> Self {
        let links = StorageProvider::ALL
            .into_iter()
            .filter_map(|provider| {
                record.link(provider).map(|url| LinkButton {
                    provider,
                    label: provider.display_name(),
                    url,
                })
            })
            .collect();

        Self {
            name: &record.title,
            image_url: &record.poster_url,
            douban_link: &record.douban_url,
            douban_id: &record.douban_id,
            links,
            status: record.status.as_str(),
            status_label: record.status.label(),
            is_new: record.is_new,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRenderer {
    page_size: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ReportRenderer {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn render(&self, report: &Report, generated_at: NaiveDateTime) -> Result<String> {
        let cards: Vec<CardData<'_>> = report.records.iter().map(CardData::from).collect();
        let data = script_safe_json(&serde_json::to_string(&cards)?);

        let mut html = String::with_capacity(STYLES.len() + SCRIPT.len() + data.len() + 4096);

        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>影片报告</title>
<style>
{styles}</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>影片报告</h1>
<div class="generation-time">生成时间：{generated_at}</div>
<div class="stats">
{total}{inaccessible}{violations}</div>
</div>
"#,
            styles = STYLES,
            generated_at = generated_at.format("%Y-%m-%d %H:%M"),
            total = stat_circle("stat-total", "总影片数量", report.total_count),
            inaccessible = stat_circle(
                "stat-inaccessible",
                "海外禁看数量",
                report.inaccessible_count() as u64
            ),
            violations = stat_circle(
                "stat-violations",
                "资源失效数量",
                report.violation_count() as u64
            ),
        );

        html.push_str(&violation_section(&report.violation_titles));
        html.push_str(&inaccessible_section(&report.inaccessible_urls));

        let _ = write!(
            html,
            r#"{top}<div id="movieGrid" class="movies-grid" data-page-size="{page_size}" data-loading="{loading}"></div>
{bottom}</div>
<script type="application/json" id="movies-data">{data}</script>
<script>
{script}</script>
</body>
</html>
"#,
            top = pagination(),
            page_size = self.page_size,
            loading = Placeholder::Loading.data_uri(),
            bottom = pagination(),
            data = data,
            script = SCRIPT,
        );

        Ok(html)
    }
}

fn stat_circle(id: &str, label: &str, value: u64) -> String {
    format!(
        "<div class=\"stat-circle\">\n<h3>{}</h3>\n<div class=\"number\" id=\"{}\">{}</div>\n</div>\n",
        label, id, value
    )
}

fn violation_section(titles: &[String]) -> String {
    if titles.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "<div class=\"section violation-section\">\n<h2>资源失效的影片</h2>\n<div class=\"section-list\">\n",
    );
    for title in titles {
        let _ = writeln!(out, "<div class=\"section-item\">{}</div>", encode_text(title));
    }
    out.push_str("</div>\n</div>\n");
    out
}

fn inaccessible_section(urls: &[String]) -> String {
    if urls.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "<div class=\"section inaccessible-section\">\n<h2>海外禁看的影片页面</h2>\n<div class=\"section-list\">\n",
    );
    for url in urls {
        let _ = writeln!(
            out,
            "<div class=\"section-item\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></div>",
            encode_double_quoted_attribute(url),
            encode_text(url)
        );
    }
    out.push_str("</div>\n</div>\n");
    out
}

fn pagination() -> &'static str {
    "<div class=\"pagination\">\n\
     <button class=\"page-btn\" data-action=\"prev\">上一页</button>\n\
     <span class=\"page-info\"></span>\n\
     <button class=\"page-btn\" data-action=\"next\">下一页</button>\n\
     </div>\n"
}

/// JSON that cannot terminate the surrounding `<script>` element.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}
