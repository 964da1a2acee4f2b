use maplit::hashset;

/// Очистка HTML сообщений поддержки: простая разметка, ссылки без скриптов
pub fn sanitize_message(html: &str) -> String {
    ammonia::Builder::new()
        .tags(hashset![
            "p", "br", "b", "strong", "i", "em", "u", "ul", "ol", "li", "a", "code", "pre",
            "blockquote"
        ])
        .link_rel(Some("noopener noreferrer"))
        .url_schemes(hashset!["http", "https", "mailto"])
        .clean(html)
        .to_string()
        .trim()
        .to_string()
}

/// ammonia сериализует текстовые узлы с экранированием; превью нужен сырой текст
fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Текст без разметки, для превью в уведомлениях
pub fn plain_preview(html: &str, max_chars: usize) -> String {
    let text = unescape_text(&ammonia::Builder::empty().clean(html).to_string());
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_removed() {
        let cleaned = sanitize_message("<p>Hello<script>alert(1)</script></p><img src=x onerror=y>");
        assert_eq!(cleaned, "<p>Hello</p>");
    }

    #[test]
    fn test_links_kept_safe() {
        let cleaned = sanitize_message(r#"<a href="javascript:alert(1)">x</a> <a href="https://example.com" onclick="y">docs</a>"#);
        assert!(!cleaned.contains("javascript"));
        assert!(!cleaned.contains("onclick"));
        assert!(cleaned.contains(r#"href="https://example.com""#));
        assert!(cleaned.contains("noopener"));
    }

    #[test]
    fn test_plain_preview() {
        assert_eq!(plain_preview("<p>Policy <b>issued</b></p>", 50), "Policy issued");
        assert_eq!(plain_preview("<p>abcdefghij</p>", 4), "abcd...");
    }

    #[test]
    fn test_plain_preview_keeps_special_characters() {
        assert_eq!(plain_preview("<p>A &amp; B</p>", 50), "A & B");
        assert_eq!(plain_preview("<p>x &lt; 5 &gt; y</p>", 50), "x < 5 > y");
        assert_eq!(plain_preview("Tom & Jerry", 50), "Tom & Jerry");
        assert_eq!(plain_preview("<p>&amp;lt;</p>", 50), "&lt;");
    }
}
