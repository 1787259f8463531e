use ::scraper::{Html, Selector};

const MAIN_POSTER: &str = "div#mainpic img";
const SHARE_BUTTON: &str = "a.bn-sharing";

/// Pulls the poster image URL out of a Douban subject page
pub struct PosterExtractor {
    main_poster: Selector,
    share_button: Selector,
}

impl Default for PosterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PosterExtractor {
    pub fn new() -> Self {
        Self {
            main_poster: Selector::parse(MAIN_POSTER).expect("valid main poster selector"),
            share_button: Selector::parse(SHARE_BUTTON).expect("valid share button selector"),
        }
    }

    /// The main poster `<img src>`, falling back to the share button's `data-pic`.
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        let main = document
            .select(&self.main_poster)
            .next()
            .and_then(|img| img.value().attr("src"));

        let poster = main.or_else(|| {
            document
                .select(&self.share_button)
                .find_map(|a| a.value().attr("data-pic"))
        })?;

        let poster = poster.trim();
        (!poster.is_empty()).then(|| poster.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_main_poster() {
        let html = r#"<html><body>
            <div id="mainpic" class="">
              <a class="nbgnbg" href="/subject/1291546/photos">
                <img src="https://img2.doubanio.com/view/photo/s_ratio_poster/public/p2561716440.jpg" title="点击看更多海报" alt="霸王别姬">
              </a>
            </div>
            <a class="bn-sharing" data-pic="https://img2.doubanio.com/other.jpg">分享</a>
        </body></html>"#;

        assert_eq!(
            PosterExtractor::new().extract(html).as_deref(),
            Some("https://img2.doubanio.com/view/photo/s_ratio_poster/public/p2561716440.jpg")
        );
    }

    #[test]
    fn test_falls_back_to_share_button() {
        let html = r#"<html><body>
            <div id="content"></div>
            <a href="javascript:void(0)" class="bn-sharing" data-pic="https://img9.doubanio.com/share.jpg">分享到</a>
        </body></html>"#;

        assert_eq!(
            PosterExtractor::new().extract(html).as_deref(),
            Some("https://img9.doubanio.com/share.jpg")
        );
    }

    #[test]
    fn test_main_poster_without_src_uses_fallback() {
        let html = r#"<div id="mainpic"><img alt="x"></div>
            <a class="bn-sharing" data-pic="https://img9.doubanio.com/share.jpg"></a>"#;
        assert_eq!(
            PosterExtractor::new().extract(html).as_deref(),
            Some("https://img9.doubanio.com/share.jpg")
        );
    }

    #[test]
    fn test_no_poster() {
        let html = "<html><body><p>登录跳转</p></body></html>";
        assert_eq!(PosterExtractor::new().extract(html), None);
    }
}
