use super::types::Element;

/// Split a CSS declaration list (`a:b;c:d`) into trimmed name/value pairs
pub fn parse_style(style: &str) -> Vec<(&str, &str)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name, value.trim()))
        })
        .collect()
}

/// Value of a single property; the last declaration wins
pub fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    parse_style(style)
        .into_iter()
        .rev()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Return `style` with `name` set to `value`, other declarations untouched
pub fn set_style_property(style: &str, name: &str, value: &str) -> String {
    let mut decls: Vec<(&str, &str)> = parse_style(style)
        .into_iter()
        .filter(|(n, _)| *n != name)
        .collect();
    decls.push((name, value));

    decls
        .iter()
        .map(|(n, v)| format!("{}:{}", n, v))
        .collect::<Vec<_>>()
        .join(";")
}

/// Whether an element is displayed, looking at `style` first, then the
/// `display` presentation attribute
pub fn is_displayed(el: &Element) -> bool {
    let display = el
        .attribute("style")
        .and_then(|s| style_property(s, "display"))
        .or_else(|| el.attribute("display"));
    display != Some("none")
}

/// Force `display:inline` on an element
pub fn set_displayed(el: &mut Element) {
    let style = set_style_property(el.attribute("style").unwrap_or(""), "display", "inline");
    el.set_attribute("style", style);
}
