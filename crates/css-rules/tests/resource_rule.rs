//! End-to-end checks of the `resource` rule on stylesheet text.

use css_rules::{Diagnostic, Linter, RuleContext, RuleLevel, RuleSet, Severity};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

const URI_EXTERNAL: &str = "http://www.external.com/resource/resource.ext";
const URI_LOCAL: &str = "../resource/resource.ext";
const URI_DATA: &str = "data:font/opentype;base64,[base-encoded font here]";

const DEFAULT_TEMPLATE: &str = ".{key} { {key}: url('{uri}');}";

/// Each resource-bearing construct, as `(key, template)`.
const CASES: &[(&str, &str)] = &[
    ("@import", "{key} url('{uri}');"),
    (
        "@font-face",
        "{key} {font-family: 'MyFontFamily'; src: url('{uri}') format('embedded-opentype'), url('{uri}') format('woff'), url('{uri}')  format('truetype'), url('{uri}') format('svg');}",
    ),
    ("background", DEFAULT_TEMPLATE),
    ("background-image", DEFAULT_TEMPLATE),
    ("border-image", DEFAULT_TEMPLATE),
    ("border-image-source", DEFAULT_TEMPLATE),
    ("content", DEFAULT_TEMPLATE),
];

fn render(template: &str, key: &str, uri: &str) -> String {
    template.replace("{key}", key).replace("{uri}", uri)
}

fn lint(source: &str, ctx: &RuleContext) -> Vec<Diagnostic> {
    let ruleset = RuleSet::new().with("resource", RuleLevel::Warn);
    Linter::new().verify(source, &ruleset, ctx).messages
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}

fn probe_with(existing: &'static [&'static str]) -> RuleContext {
    RuleContext::with_file_probe(Arc::new(move |path: &str| {
        existing.iter().any(|candidate| *candidate == path)
    }))
}

#[test]
fn external_reference_warns_once_per_url() {
    for (key, template) in CASES {
        let source = render(template, key, URI_EXTERNAL);
        let expected = source.matches("url(").count();
        let diagnostics = lint(&source, &RuleContext::new());

        assert_eq!(diagnostics.len(), expected, "{key}");
        for diag in &diagnostics {
            assert_eq!(diag.severity, Severity::Warning, "{key}");
            assert_eq!(diag.rule, "resource");
            assert_eq!(
                diag.message,
                format!("Consider using a localised resource instead for '{URI_EXTERNAL}'"),
                "{key}"
            );
        }
    }
}

#[test]
fn local_reference_without_probe_is_silent() {
    for (key, template) in CASES {
        let diagnostics = lint(&render(template, key, URI_LOCAL), &RuleContext::new());
        assert!(diagnostics.is_empty(), "{key}: {diagnostics:?}");
    }
}

#[test]
fn data_uri_is_silent() {
    let ctx = probe_with(&[]);
    for (key, template) in CASES {
        let source = render(template, key, URI_DATA);
        assert!(lint(&source, &RuleContext::new()).is_empty(), "{key}");
        assert!(lint(&source, &ctx).is_empty(), "{key} with probe");
    }
}

#[test]
fn missing_local_file_with_probe() {
    let ctx = probe_with(&[]);
    for (key, template) in CASES {
        let source = render(template, key, URI_LOCAL);
        let expected = source.matches("url(").count();
        let diagnostics = lint(&source, &ctx);

        assert_eq!(diagnostics.len(), expected, "{key}");
        for diag in &diagnostics {
            assert_eq!(
                diag.message,
                format!("'{URI_LOCAL}' does not exist in the file system")
            );
        }
    }
}

#[test]
fn existing_local_file_with_probe() {
    let ctx = probe_with(&[URI_LOCAL]);
    for (key, template) in CASES {
        assert!(lint(&render(template, key, URI_LOCAL), &ctx).is_empty(), "{key}");
    }
}

#[test]
fn import_of_external_stylesheet() {
    let diagnostics = lint(
        r#"@import url("http://cdn.example.com/a.css");"#,
        &RuleContext::new(),
    );
    assert_eq!(
        messages(&diagnostics),
        vec!["Consider using a localised resource instead for 'http://cdn.example.com/a.css'"]
    );
    assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (1, 1));
}

#[test]
fn local_background_depends_on_probe() {
    let source = r#".x { background: url("assets/img.png"); }"#;
    assert!(lint(source, &RuleContext::new()).is_empty());

    let diagnostics = lint(source, &probe_with(&[]));
    assert_eq!(
        messages(&diagnostics),
        vec!["'assets/img.png' does not exist in the file system"]
    );
    assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (1, 18));
}

#[test]
fn probe_receives_path_without_query() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let ctx = RuleContext::with_file_probe(Arc::new(move |path: &str| {
        if let Ok(mut seen) = recorder.lock() {
            seen.push(path.to_string());
        }
        false
    }));

    let diagnostics = lint(
        "@font-face { src: url('fonts/a.woff?v=3') format('woff'); }",
        &ctx,
    );

    assert_eq!(*seen.lock().unwrap(), vec!["fonts/a.woff".to_string()]);
    assert_eq!(
        messages(&diagnostics),
        vec!["'fonts/a.woff?v=3' does not exist in the file system"]
    );
}

#[test]
fn external_reference_is_never_probed() {
    let ctx = RuleContext::with_file_probe(Arc::new(|path: &str| -> bool {
        panic!("probed {path}")
    }));
    let diagnostics = lint(
        ".x { background: url(https://user@cdn.example.com:8080/a.png?v=1) }",
        &ctx,
    );
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn page_margin_discards_page_references() {
    let source = "@page { background: url(http://x.com/page.png); @top-left { content: url(http://x.com/margin.png); } }";
    let diagnostics = lint(source, &RuleContext::new());
    assert_eq!(
        messages(&diagnostics),
        vec!["Consider using a localised resource instead for 'http://x.com/margin.png'"]
    );
}

#[test]
fn references_in_media_rules_are_checked() {
    let source = "@media print {\n  .x { background-image: url(https://x.com/print.png) }\n}";
    let diagnostics = lint(source, &RuleContext::new());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (2, 26));
}

#[test]
fn same_path_in_two_blocks_reports_twice() {
    let source = "a { background: url(http://x.com/a.png) }\nb { background: url(http://x.com/a.png) }";
    let diagnostics = lint(source, &RuleContext::new());
    let lines: Vec<u32> = diagnostics.iter().map(Diagnostic::line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn non_resource_properties_are_ignored() {
    let source = ".x { cursor: url(http://x.com/c.cur), auto; list-style: url(http://x.com/b.png) }";
    assert!(lint(source, &RuleContext::new()).is_empty());
}

#[test]
fn uppercase_scheme_is_external() {
    let diagnostics = lint(
        ".x { background: url(HTTPS://X.COM/A.PNG) }",
        &RuleContext::new(),
    );
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn hacked_property_names_are_checked() {
    for source in [
        ".x { *background: url(http://x.com/a.png); }",
        ".x { _background: url(http://x.com/a.png); }",
    ] {
        let diagnostics = lint(source, &RuleContext::new());
        assert_eq!(
            messages(&diagnostics),
            vec!["Consider using a localised resource instead for 'http://x.com/a.png'"],
            "{source}"
        );
        assert_eq!(diagnostics[0].column(), 19, "{source}");
    }
}

#[test]
fn references_in_document_rules_are_checked() {
    let source = "@-moz-document url-prefix() {\n  .x { background: url(http://x.com/a.png) }\n}";
    let diagnostics = lint(source, &RuleContext::new());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule, "resource");
}
