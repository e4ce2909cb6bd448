//! Document head payload and sinks.
//!
//! `HeadPayload` mirrors the shape a head manager expects: a title, a list
//! of `<meta>` descriptors and a list of `<link>` descriptors. It serializes
//! to JSON for framework sinks and renders to HTML for server-side output.

use serde::Serialize;

/// `<meta>` attribute that carries the tag's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKey {
    /// `<meta name=..>`: description, robots, twitter:*.
    Name(String),
    /// `<meta property=..>`: og:*.
    Property(String),
}

impl MetaKey {
    pub fn as_str(&self) -> &str {
        match self {
            MetaKey::Name(k) | MetaKey::Property(k) => k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    #[serde(flatten)]
    pub key: MetaKey,
    pub content: String,
}

impl MetaTag {
    pub fn name(name: &str, content: &str) -> Self {
        Self {
            key: MetaKey::Name(name.to_string()),
            content: content.to_string(),
        }
    }

    pub fn property(property: &str, content: &str) -> Self {
        Self {
            key: MetaKey::Property(property.to_string()),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTag {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

impl LinkTag {
    pub fn new(rel: &str, href: &str) -> Self {
        Self {
            rel: rel.to_string(),
            href: href.to_string(),
            link_type: None,
        }
    }

    pub fn typed(rel: &str, href: &str, link_type: &str) -> Self {
        Self {
            link_type: Some(link_type.to_string()),
            ..Self::new(rel, href)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadPayload {
    pub title: String,
    pub meta: Vec<MetaTag>,
    pub link: Vec<LinkTag>,
}

impl HeadPayload {
    /// Render as HTML head elements, one per line.
    pub fn to_html(&self) -> String {
        let mut out = format!("<title>{}</title>\n", escape(&self.title));
        for tag in &self.meta {
            let attr = match tag.key {
                MetaKey::Name(_) => "name",
                MetaKey::Property(_) => "property",
            };
            out.push_str(&format!(
                "<meta {attr}=\"{}\" content=\"{}\">\n",
                escape(tag.key.as_str()),
                escape(&tag.content)
            ));
        }
        for link in &self.link {
            out.push_str(&format!("<link rel=\"{}\"", escape(&link.rel)));
            if let Some(t) = &link.link_type {
                out.push_str(&format!(" type=\"{}\"", escape(t)));
            }
            out.push_str(&format!(" href=\"{}\">\n", escape(&link.href)));
        }
        out
    }
}

/// Receives the head for the current render. Each call replaces the
/// previous payload; nothing is merged.
pub trait HeadSink {
    fn set_head(&mut self, head: HeadPayload);
}

impl HeadSink for Option<HeadPayload> {
    fn set_head(&mut self, head: HeadPayload) {
        *self = Some(head);
    }
}

/// Keeps the most recent head rendered as HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlHeadSink {
    html: String,
}

impl HtmlHeadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl HeadSink for HtmlHeadSink {
    fn set_head(&mut self, head: HeadPayload) {
        self.html = head.to_html();
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> HeadPayload {
        HeadPayload {
            title: "Villa <Bali> & \"Sea\"".to_string(),
            meta: vec![
                MetaTag::name("description", "It's big"),
                MetaTag::property("og:title", "Villa"),
            ],
            link: vec![
                LinkTag::typed("icon", "/favicon.png", "image/png"),
                LinkTag::new("canonical", "https://example.com/a?b=1&c=2"),
            ],
        }
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let html = payload().to_html();
        assert!(html.contains("<title>Villa &lt;Bali&gt; &amp; &quot;Sea&quot;</title>"));
        assert!(html.contains(r#"<meta name="description" content="It&#39;s big">"#));
        assert!(html.contains(r#"<meta property="og:title" content="Villa">"#));
        assert!(html.contains(r#"<link rel="icon" type="image/png" href="/favicon.png">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/a?b=1&amp;c=2">"#));
    }

    #[test]
    fn json_uses_name_or_property_keys() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["meta"][0]["name"], "description");
        assert_eq!(json["meta"][1]["property"], "og:title");
        assert!(json["meta"][1].get("name").is_none());
        assert_eq!(json["link"][0]["type"], "image/png");
        assert!(json["link"][1].get("type").is_none());
    }

    #[test]
    fn html_sink_keeps_last_head() {
        let mut sink = HtmlHeadSink::new();
        sink.set_head(payload());
        let mut second = payload();
        second.title = "Other".to_string();
        sink.set_head(second);
        assert!(sink.html().starts_with("<title>Other</title>"));
    }
}
