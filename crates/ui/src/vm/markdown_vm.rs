use std::collections::{HashMap, HashSet};

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

/// Course descriptions are Markdown; blank ones render nothing.
#[must_use]
pub fn description_html(description: &str) -> Option<String> {
    if description.trim().is_empty() {
        return None;
    }
    Some(markdown_to_html(description))
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "del", "code", "pre", "blockquote", "ul", "ol", "li", "a",
        "h3", "h4", "table", "thead", "tbody", "tr", "th", "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{description_html, markdown_to_html};

    #[test]
    fn markdown_to_html_sanitizes_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn scripts_are_stripped() {
        let html = markdown_to_html("Hi <script>alert(1)</script> there");
        assert!(!html.contains("<script"));
        assert!(html.contains("Hi"));
    }

    #[test]
    fn description_renders_emphasis() {
        let html = description_html("Learn **Python** step by step.").unwrap();
        assert!(html.contains("<strong>Python</strong>"));
        assert_eq!(description_html("   "), None);
    }
}
