//! Build stages
//!
//! Content stages rewrite document bodies and run before anything is
//! rendered. Each is a pure `Collection -> Collection` transform applied in
//! the order the config lists them. The analytics stage works on rendered
//! pages instead and is resolved once per build.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::{AnalyticsConfig, IframesConfig, ImagesConfig, StageConfig};
use crate::content::{Collection, Document};

lazy_static! {
    static ref IMG_TAG: Regex = Regex::new(r"(?i)<img\b([^>]*?)\s*(/?)>").unwrap();
    static ref IFRAME_TAG: Regex = Regex::new(r"(?is)<iframe\b.*?</iframe>").unwrap();
}

/// Run every content stage over the collection, in configured order
pub fn apply_content_stages(stages: &[StageConfig], collection: Collection) -> Collection {
    stages.iter().fold(collection, |collection, stage| match stage {
        StageConfig::Images(images) => {
            tracing::debug!("Capping image width at {}px", images.max_width);
            collection.map(|doc| cap_images(images, doc))
        }
        StageConfig::Iframes(iframes) => {
            tracing::debug!("Wrapping embedded iframes");
            collection.map(|doc| wrap_iframes(iframes, doc))
        }
        StageConfig::Analytics(_) | StageConfig::Sitemap(_) => collection,
    })
}

/// Add a max-width style to every image without a style of its own
fn cap_images(config: &ImagesConfig, mut doc: Document) -> Document {
    let style = format!("max-width: {}px; width: 100%", config.max_width);
    doc.body = IMG_TAG
        .replace_all(&doc.body, |caps: &Captures| {
            let attrs = &caps[1];
            if attrs.contains("style=") {
                caps[0].to_string()
            } else {
                format!(r#"<img{} style="{}"{}>"#, attrs, style, &caps[2])
            }
        })
        .into_owned();
    doc
}

/// Wrap every iframe in a styled container
fn wrap_iframes(config: &IframesConfig, mut doc: Document) -> Document {
    doc.body = IFRAME_TAG
        .replace_all(&doc.body, |caps: &Captures| {
            format!(
                r#"<div class="responsive-iframe" style="{}">{}</div>"#,
                config.wrapper_style, &caps[0]
            )
        })
        .into_owned();
    doc
}

/// Analytics snippet injected into every rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    tracking_id: String,
}

impl Analytics {
    pub fn new(tracking_id: impl Into<String>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
        }
    }

    /// Read the tracking ID from the configured environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        match std::env::var(&config.tracking_id_env) {
            Ok(id) if !id.trim().is_empty() => Some(Self::new(id.trim())),
            _ => {
                tracing::debug!(
                    "{} is not set, skipping analytics",
                    config.tracking_id_env
                );
                None
            }
        }
    }

    fn snippet(&self) -> String {
        format!(
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
<script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}gtag('js',new Date());gtag('config','{id}');</script>
"#,
            id = self.tracking_id
        )
    }

    /// Insert the snippet before `</head>`; pages without a head are untouched
    pub fn inject(&self, html: &str) -> String {
        match html.find("</head>") {
            Some(pos) => {
                let mut out = String::with_capacity(html.len() + 300);
                out.push_str(&html[..pos]);
                out.push_str(&self.snippet());
                out.push_str(&html[pos..]);
                out
            }
            None => html.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;

    fn collection_with_body(body: &str) -> Collection {
        let mut doc = Document::new("/post/");
        doc.body = body.to_string();
        Collection::new(vec![doc]).unwrap()
    }

    fn body(collection: &Collection) -> &str {
        &collection.documents()[0].body
    }

    #[test]
    fn test_images_are_capped() {
        let stages = vec![StageConfig::Images(ImagesConfig { max_width: 630 })];
        let out = apply_content_stages(
            &stages,
            collection_with_body(r#"<p><img src="a.png" alt="a" /> <IMG src="b.png"></p>"#),
        );
        assert_eq!(
            body(&out),
            r#"<p><img src="a.png" alt="a" style="max-width: 630px; width: 100%"/> <img src="b.png" style="max-width: 630px; width: 100%"></p>"#
        );
    }

    #[test]
    fn test_styled_images_untouched() {
        let stages = vec![StageConfig::Images(ImagesConfig { max_width: 630 })];
        let html = r#"<img src="a.png" style="width: 10px">"#;
        let out = apply_content_stages(&stages, collection_with_body(html));
        assert_eq!(body(&out), html);
    }

    #[test]
    fn test_iframes_are_wrapped() {
        let stages = vec![StageConfig::Iframes(IframesConfig::default())];
        let out = apply_content_stages(
            &stages,
            collection_with_body(r#"<iframe src="https://youtube.com/embed/x"></iframe>"#),
        );
        assert_eq!(
            body(&out),
            r#"<div class="responsive-iframe" style="margin-bottom: 1.0725rem"><iframe src="https://youtube.com/embed/x"></iframe></div>"#
        );
    }

    #[test]
    fn test_output_stages_leave_content_alone() {
        let stages = vec![
            StageConfig::Analytics(AnalyticsConfig::default()),
            StageConfig::Sitemap(Default::default()),
        ];
        let out = apply_content_stages(&stages, collection_with_body("<img src=\"a\">"));
        assert_eq!(body(&out), "<img src=\"a\">");
    }

    #[test]
    fn test_analytics_inject() {
        let analytics = Analytics::new("UA-123");
        let html = analytics.inject("<html><head><title>x</title></head><body></body></html>");
        assert!(html.contains("gtag/js?id=UA-123"));
        assert!(html.contains("gtag('config','UA-123')"));
        assert!(html.find("gtag").unwrap() < html.find("</head>").unwrap());

        assert_eq!(analytics.inject("<p>fragment</p>"), "<p>fragment</p>");
    }

    #[test]
    fn test_analytics_from_env() {
        let config = AnalyticsConfig {
            tracking_id_env: "FOLIO_TEST_ANALYTICS_ID".to_string(),
        };
        std::env::remove_var(&config.tracking_id_env);
        assert_eq!(Analytics::from_config(&config), None);

        std::env::set_var(&config.tracking_id_env, " G-XYZ ");
        assert_eq!(Analytics::from_config(&config), Some(Analytics::new("G-XYZ")));
        std::env::remove_var(&config.tracking_id_env);
    }
}
