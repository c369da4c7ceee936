//! A minimal cascade over the page's inline stylesheet.
//!
//! The live backend needs just enough CSS resolution to answer the checks a
//! real rendering engine would: computed colors on the body, display and
//! visibility per element, and the effect of the narrow-viewport media rule.
//! Supported surface: `:root` custom properties, `var()` references, tag /
//! `#id` / `.class` compound selectors with descendant combinators, and
//! `@media (max-width: Npx)` blocks. Later declarations win; there is no
//! specificity ordering beyond source order, which is all the embedded
//! stylesheet relies on.

use std::collections::HashMap;

use crate::Viewport;

/// The element identity the matcher needs; the live backend builds one per
/// node on the ancestor chain.
#[derive(Debug, Clone, Default)]
pub struct Elem {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Elem {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    selector: String,
    decls: Vec<(String, String)>,
    /// Applies only when the viewport is at most this wide
    max_width: Option<u32>,
}

/// A parsed inline stylesheet
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    vars: HashMap<String, String>,
    rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        let mut sheet = Stylesheet::default();
        parse_blocks(css, None, &mut sheet);
        sheet
    }

    /// Look up a `--name` custom property declared on `:root`
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.vars.is_empty()
    }

    /// Resolve a property for the element at the end of `chain`
    /// (root-to-element order). Returns `None` when no rule sets it.
    pub fn computed(&self, chain: &[Elem], property: &str, viewport: Viewport) -> Option<String> {
        let mut value: Option<&str> = None;
        for rule in &self.rules {
            if let Some(max) = rule.max_width {
                if viewport.width > max {
                    continue;
                }
            }
            if !selector_matches(&rule.selector, chain) {
                continue;
            }
            for (name, v) in &rule.decls {
                if name == property {
                    value = Some(v);
                }
            }
        }
        value.map(|v| self.resolve_vars(v))
    }

    fn resolve_vars(&self, value: &str) -> String {
        let trimmed = value.trim();
        if let Some(inner) = trimmed.strip_prefix("var(").and_then(|s| s.strip_suffix(')')) {
            let name = inner.split(',').next().unwrap_or("").trim();
            if let Some(resolved) = self.vars.get(name) {
                return resolved.clone();
            }
        }
        trimmed.to_string()
    }
}

// Split css text into top-level blocks, recursing into @media bodies.
fn parse_blocks(css: &str, max_width: Option<u32>, sheet: &mut Stylesheet) {
    let bytes = css.as_bytes();
    let mut pos = 0;
    while let Some(open_rel) = css[pos..].find('{') {
        let open = pos + open_rel;
        let selector = css[pos..open].trim().to_string();

        // find the matching close brace
        let mut depth = 1;
        let mut close = open + 1;
        while close < bytes.len() && depth > 0 {
            match bytes[close] {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
            close += 1;
        }
        let body = &css[open + 1..close.saturating_sub(1)];

        if let Some(condition) = selector.strip_prefix("@media") {
            parse_blocks(body, parse_max_width(condition).or(max_width), sheet);
        } else if selector == ":root" {
            for (name, value) in parse_decls(body) {
                if name.starts_with("--") {
                    sheet.vars.insert(name, value);
                }
            }
        } else {
            let decls = parse_decls(body);
            for sel in selector.split(',') {
                let sel = sel.trim();
                if sel.is_empty() {
                    continue;
                }
                sheet.rules.push(Rule {
                    selector: sel.to_string(),
                    decls: decls.clone(),
                    max_width,
                });
            }
        }
        pos = close;
    }
}

fn parse_decls(body: &str) -> Vec<(String, String)> {
    body.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

// "(max-width: 600px)" -> Some(600)
fn parse_max_width(condition: &str) -> Option<u32> {
    let idx = condition.find("max-width")?;
    let rest = &condition[idx + "max-width".len()..];
    let rest = rest.trim_start().strip_prefix(':')?.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn selector_matches(selector: &str, chain: &[Elem]) -> bool {
    let parts: Vec<&str> = selector.split_whitespace().collect();
    let Some((last, ancestors)) = parts.split_last() else {
        return false;
    };
    let Some((target, chain_ancestors)) = chain.split_last() else {
        return false;
    };
    if !simple_matches(last, target) {
        return false;
    }
    // Descendant combinator: each remaining part must match some ancestor, in order
    let mut level = 0;
    for part in ancestors {
        let mut matched = false;
        while level < chain_ancestors.len() {
            if simple_matches(part, &chain_ancestors[level]) {
                matched = true;
                level += 1;
                break;
            }
            level += 1;
        }
        if !matched {
            return false;
        }
    }
    true
}

// One compound selector like `img`, `.cover`, `#map`, or `header` / `img.cover`
fn simple_matches(part: &str, elem: &Elem) -> bool {
    let mut tag = String::new();
    let mut id = None;
    let mut classes = Vec::new();

    let mut rest = part;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('#') {
            let end = stripped
                .find(['.', '#'])
                .unwrap_or(stripped.len());
            id = Some(&stripped[..end]);
            rest = &stripped[end..];
        } else if let Some(stripped) = rest.strip_prefix('.') {
            let end = stripped
                .find(['.', '#'])
                .unwrap_or(stripped.len());
            classes.push(&stripped[..end]);
            rest = &stripped[end..];
        } else {
            let end = rest.find(['.', '#']).unwrap_or(rest.len());
            tag = rest[..end].to_string();
            rest = &rest[end..];
        }
    }

    if !tag.is_empty() && tag != "*" && tag != elem.tag {
        return false;
    }
    if let Some(id) = id {
        if elem.id.as_deref() != Some(id) {
            return false;
        }
    }
    classes
        .iter()
        .all(|c| elem.classes.iter().any(|have| have == c))
}
