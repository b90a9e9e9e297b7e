//! The Turtle bundle agrees with the compiled port layout and metadata.

use std::path::PathBuf;

use reverie_core::{AudioPort, ParamId};
use reverie_lv2::PLUGIN_URI;
use reverie_lv2::lv2ui::UI_URI;

fn bundle_file(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("bundle")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// The `[ ... ]` port block declaring `index`.
fn port_block(ttl: &str, index: u32) -> &str {
    let marker = format!("lv2:index {index} ;");
    let at = ttl.find(&marker).unwrap_or_else(|| panic!("no port {index}"));
    let start = ttl[..at].rfind('[').unwrap();
    let end = at + ttl[at..].find(']').unwrap();
    &ttl[start..end]
}

fn property<'a>(block: &'a str, key: &str) -> &'a str {
    let line = block
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with(key))
        .unwrap_or_else(|| panic!("{key} missing in {block}"));
    line[key.len()..].trim_end_matches(';').trim()
}

#[test]
fn uri_matches_both_files() {
    assert!(bundle_file("manifest.ttl").contains(&format!("<{PLUGIN_URI}>")));
    assert!(bundle_file("reverie.ttl").contains(&format!("<{PLUGIN_URI}>")));
}

#[test]
fn audio_ports_declared_in_order() {
    let ttl = bundle_file("reverie.ttl");
    for (port, symbol, direction) in [
        (AudioPort::In1, "in_l", "lv2:InputPort"),
        (AudioPort::In2, "in_r", "lv2:InputPort"),
        (AudioPort::Out1, "out_l", "lv2:OutputPort"),
        (AudioPort::Out2, "out_r", "lv2:OutputPort"),
    ] {
        let block = port_block(&ttl, port.index());
        assert!(block.contains("lv2:AudioPort"));
        assert!(block.contains(direction));
        assert_eq!(property(block, "lv2:symbol"), format!("\"{symbol}\""));
    }
}

#[test]
fn control_ports_match_descriptors() {
    let ttl = bundle_file("reverie.ttl");
    for id in ParamId::ALL {
        let desc = id.descriptor();
        let block = port_block(&ttl, id.raw());

        assert!(block.contains("lv2:ControlPort"));
        assert_eq!(property(block, "lv2:symbol"), format!("\"{}\"", desc.key));
        assert_eq!(property(block, "lv2:name"), format!("\"{}\"", desc.name));

        let default: f32 = property(block, "lv2:default").parse().unwrap();
        assert_eq!(default, desc.default);
        assert_eq!(property(block, "lv2:minimum"), "0.0");
        assert_eq!(property(block, "lv2:maximum"), "1.0");
    }
}

#[test]
fn ui_declared_for_plugin() {
    let manifest = bundle_file("manifest.ttl");
    let ui_subject = format!("<{UI_URI}>");
    let at = manifest.find(&ui_subject).expect("UI missing from manifest");
    assert!(manifest[at..].contains("a ui:X11UI"));
    assert!(manifest[at..].contains("ui:binary <libreverie_lv2.so>"));

    let ttl = bundle_file("reverie.ttl");
    assert!(ttl.contains(&format!("ui:ui {ui_subject}")));
    let at = ttl.rfind(&ui_subject).unwrap();
    assert!(ttl[at..].contains("ui:parent"));
    assert!(ttl[at..].contains("lv2:extensionData ui:idleInterface"));
}
