// src/utils/html.rs

/// Cleans HTML content with ammonia's whitelist: safe formatting tags stay,
/// scripts, iframes and event-handler attributes are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_keeps_formatting() {
        let cleaned = clean_html("<p onclick=\"x()\">Mitose</p><script>alert(1)</script>");
        assert_eq!(cleaned, "<p>Mitose</p>");
    }
}
