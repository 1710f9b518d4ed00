use once_cell::sync::Lazy;
use regex::Regex;

const LINK_BODY: &str = r"[A-Za-z0-9+/=_?&%.\-@:#\[\]~!*;,]+";

static SCHEME_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "vmess://",
            Regex::new(r"^vmess://[A-Za-z0-9+/=_?&%.\-]+").unwrap(),
        ),
        ("vless://", Regex::new(&format!("^vless://{}", LINK_BODY)).unwrap()),
        ("ssr://", Regex::new(r"^ssr://[A-Za-z0-9+/=_\-]+").unwrap()),
        ("ss://", Regex::new(&format!("^ss://{}", LINK_BODY)).unwrap()),
        (
            "trojan://",
            Regex::new(&format!("^trojan://{}", LINK_BODY)).unwrap(),
        ),
    ]
});

/// Find every share link embedded in arbitrary text, in order of appearance
///
/// Every scheme token starts a new link, even when glued to the previous one,
/// except the `ss://` tail of `vless://` and `vmess://`. Each link ends at the
/// first character outside its scheme's alphabet or where the next link
/// starts.
pub fn grep_links_from_string(text: &str) -> Vec<String> {
    let mut starts: Vec<(usize, &Regex)> = Vec::new();
    for (token, pattern) in SCHEME_PATTERNS.iter() {
        for (pos, _) in text.match_indices(token) {
            let head = &text[..pos];
            let inner = *token == "ss://" && (head.ends_with("vle") || head.ends_with("vme"));
            if !inner {
                starts.push((pos, pattern));
            }
        }
    }
    starts.sort_by_key(|(pos, _)| *pos);

    let mut links = Vec::new();
    for (i, (pos, pattern)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map_or(text.len(), |(next, _)| *next);
        if let Some(m) = pattern.find(&text[*pos..end]) {
            links.push(m.as_str().to_string());
        }
    }
    links
}
