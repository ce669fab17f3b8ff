//! Integration tests for layer classification and filtering
//!
//! The fixtures mimic what Inkscape writes: namespaced layer groups, hidden
//! layers with `display:none` and non-layer content around them.

use layer_export::layers::find_layers;
use layer_export::svg::{is_displayed, parse_document, write_document};
use layer_export::{Document, ExportError, classify, filter_for_layer, filter_layers};

fn drawing(layers: &[(&str, &str)]) -> Document {
    let mut body = String::new();
    for (i, (label, style)) in layers.iter().enumerate() {
        body.push_str(&format!(
            r#"
  <g inkscape:groupmode="layer" id="layer{}" inkscape:label="{}" style="{}">
    <rect x="{}" y="0" width="10" height="10"/>
  </g>"#,
            i + 1,
            label,
            style,
            i * 10
        ));
    }

    parse_document(&format!(
        r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg"
   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
   xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
   width="100" height="10">
  <sodipodi:namedview id="base" pagecolor="#ffffff"/>
  <defs id="defs2"/>{}
</svg>
"##,
        body
    ))
    .unwrap()
}

fn labels(doc: &Document) -> Vec<String> {
    find_layers(doc).into_iter().map(|l| l.label).collect()
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classify_base_outline_color() {
    let doc = drawing(&[
        ("Base", "display:inline"),
        ("Outline", "display:inline"),
        ("Color", "display:none"),
    ]);
    let c = classify(&doc).unwrap();

    assert_eq!(c.base.label, "Base");
    assert!(c.base.is_base);
    assert_eq!(c.labels(), ["Outline", "Color"]);
    assert!(c.others[0].visible);
    assert!(!c.others[1].visible);
}

#[test]
fn test_classify_keeps_document_order_for_n_layers() {
    let names = ["Sky", "Trees", "BASE sketch", "Birds", "Clouds", "Sun"];
    let layers: Vec<(&str, &str)> = names.iter().map(|n| (*n, "")).collect();
    let c = classify(&drawing(&layers)).unwrap();

    assert_eq!(c.base.label, "BASE sketch");
    assert_eq!(c.others.len(), names.len() - 1);
    assert_eq!(c.labels(), ["Sky", "Trees", "Birds", "Clouds", "Sun"]);
}

#[test]
fn test_classify_without_base_fails() {
    let doc = drawing(&[("Outline", ""), ("Color", "")]);
    assert!(matches!(classify(&doc), Err(ExportError::MissingBaseLayer)));
}

#[test]
fn test_namedview_id_is_not_a_layer() {
    // sodipodi:namedview carries id="base" but is no layer group
    let doc = drawing(&[("Ink", "")]);
    assert!(matches!(classify(&doc), Err(ExportError::MissingBaseLayer)));
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_filter_outline_scenario() {
    let doc = drawing(&[
        ("Base", "display:none"),
        ("Outline", "display:none"),
        ("Color", "display:inline"),
    ]);
    let filtered = filter_for_layer(&doc, "Base", "Outline");

    assert_eq!(labels(&filtered), ["Base", "Outline"]);
    assert!(find_layers(&filtered).iter().all(|l| l.visible));
    assert!(!write_document(&filtered).contains("Color"));
}

#[test]
fn test_filter_every_layer_yields_two_visible_groups() {
    let doc = drawing(&[
        ("Outline", ""),
        ("Base", ""),
        ("Color", "display:none"),
        ("Shadow", "opacity:0.5;display:none"),
    ]);
    let c = classify(&doc).unwrap();

    for target in &c.others {
        let filtered = filter_for_layer(&doc, &c.base.label, &target.label);
        let layers = find_layers(&filtered);
        assert_eq!(layers.len(), 2, "layers left for {}", target.label);
        assert!(layers.iter().all(|l| l.visible));

        let mut kept: Vec<&str> = layers.iter().map(|l| l.label.as_str()).collect();
        kept.sort();
        let mut expected = vec!["Base", target.label.as_str()];
        expected.sort();
        assert_eq!(kept, expected);
    }
}

#[test]
fn test_filter_is_idempotent() {
    let doc = drawing(&[("Base", ""), ("Outline", "display:none"), ("Color", "")]);
    let once = filter_for_layer(&doc, "Base", "Outline");
    let twice = filter_for_layer(&doc, "Base", "Outline");
    assert_eq!(once, twice);

    let again = filter_for_layer(&once, "Base", "Outline");
    assert_eq!(again, once);
}

#[test]
fn test_filter_does_not_touch_source() {
    let doc = drawing(&[("Base", ""), ("Outline", ""), ("Color", "")]);
    let before = doc.clone();

    let outline = filter_for_layer(&doc, "Base", "Outline");
    let color = filter_for_layer(&doc, "Base", "Color");

    assert_eq!(doc, before);
    assert_eq!(labels(&outline), ["Base", "Outline"]);
    assert_eq!(labels(&color), ["Base", "Color"]);
}

#[test]
fn test_filter_preserves_other_style_declarations() {
    let doc = drawing(&[("Base", ""), ("Shadow", "opacity:0.5;display:none")]);
    let filtered = filter_for_layer(&doc, "Base", "Shadow");
    let shadow = filtered
        .descendants()
        .into_iter()
        .find(|el| el.attribute("inkscape:label") == Some("Shadow"))
        .unwrap();

    assert_eq!(shadow.attribute("style"), Some("opacity:0.5;display:inline"));
    assert!(is_displayed(shadow));
}

#[test]
fn test_filter_keeps_defs_and_namedview() {
    let doc = drawing(&[("Base", ""), ("Outline", ""), ("Color", "")]);
    let out = write_document(&filter_for_layer(&doc, "Base", "Outline"));

    assert!(out.starts_with("<?xml version=\"1.0\""));
    assert!(out.contains(r#"<defs id="defs2"/>"#));
    assert!(out.contains("sodipodi:namedview"));
}

#[test]
fn test_filter_layers_with_single_label() {
    let doc = drawing(&[("Base", ""), ("Outline", "")]);
    let only_base = filter_layers(&doc, &["Base"]);
    assert_eq!(labels(&only_base), ["Base"]);
}

#[test]
fn test_filtered_document_reparses() {
    let doc = drawing(&[("Base", ""), ("Outline", ""), ("Color", "")]);
    let filtered = filter_for_layer(&doc, "Base", "Color");
    let reparsed = parse_document(&write_document(&filtered)).unwrap();
    assert_eq!(reparsed, filtered);
}
