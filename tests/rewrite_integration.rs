//! End-to-end tests for the rewrite engine
//!
//! Exercises the public API the way the CLI does: whole obfuscated
//! sources in, rewritten sources out.

use unmangle::config::Loader;
use unmangle::loader::SourceLoader;
use unmangle::transforms::standard::{rewrite_pipeline, DEOBFUSCATE};
use unmangle::{ExtractError, SourceProcessor};

fn deobfuscate(source: &str) -> String {
    DEOBFUSCATE.run(source.to_string()).unwrap()
}

#[test]
fn test_declaration_removed_and_references_resolved() {
    let out = deobfuscate("var a = [\"w\",\"x\",\"y\",\"z\",\"q\"];\nfoo(a[0], a[4]);\n");
    assert_eq!(out, "foo(\"w\", \"q\");\n");
}

#[test]
fn test_every_index_resolves_to_its_element() {
    let source = "var t = [\"e0\", \"e1\", \"e2\", \"e3\", \"e4\", \"e5\"];\n\
                  f(t[0]);\nf(t[1]);\nf(t[2]);\nf(t[3]);\nf(t[4]);\nf(t[5]);\n";
    let out = deobfuscate(source);
    for i in 0..6 {
        assert!(out.contains(&format!("f(\"e{}\");", i)), "missing element {}", i);
    }
    assert!(!out.contains("var t"));
}

#[test]
fn test_short_declaration_is_ignored_entirely() {
    let out = deobfuscate("var a = [\"w\", \"x\"];\nfoo(a[0]);\nfoo(a[1]);\n");
    assert_eq!(out, "foo(a[0]);\nfoo(a[1]);\n");
}

#[test]
fn test_multi_line_declaration_consumed() {
    let source = "var q = [\"a\", \"b\", \n\"c\", \"d\", \n\"e\"];\nuse(q[4]);\n";
    let out = deobfuscate(source);
    assert_eq!(out, "use(\"e\");\n");
}

#[test]
fn test_nested_scopes_shadow_and_fall_back() {
    let source = "\
function outer() {
var x = [\"o0\", \"o1\", \"o2\", \"o3\", \"o4\"];
function inner() {
var x = [\"i0\", \"i1\", \"i2\", \"i3\", \"i4\", \"i5\"];
use(x[1], x[5]);
}
use(x[1]);
}
";
    let out = deobfuscate(source);
    assert!(out.contains("use(\"i1\", \"i5\");"));
    assert!(out.contains("use(\"o1\");"));
}

#[test]
fn test_comments_hide_declarations_from_the_engine() {
    let source = "\
/* decoy
var a = [\"1\", \"2\", \"3\", \"4\", \"5\"];
*/
use(a[0]);
";
    let out = deobfuscate(source);
    assert_eq!(out, "use(a[0]);\n");
}

#[test]
fn test_substituted_concatenations_fold() {
    let source = "var p = [\"do\", \"wn\", \"lo\", \"ad\", \"er\"];\n\
                  name = p[0] + p[1] + p[2] + p[3] + p[4];\n";
    let out = deobfuscate(source);
    assert_eq!(out, "name = \"downloader\";\n");
}

#[test]
fn test_unresolvable_index_left_untouched() {
    let source = "var a = [\"1\", \"2\", \"3\", \"4\", \"5\"];\nuse(a[2], a[99]);\n";
    let out = deobfuscate(source);
    assert_eq!(out, "use(\"3\", a[99]);\n");
}

#[test]
fn test_threshold_override_changes_eligibility() {
    let config = Loader::new()
        .set_override("rewrite.threshold", 1_i64)
        .unwrap()
        .build()
        .unwrap();
    let out = rewrite_pipeline(config)
        .run("var a = [\"p\", \"q\"];\nf(a[0]);\n".to_string())
        .unwrap();
    assert_eq!(out, "f(\"p\");\n");
}

#[test]
fn test_report_counts_arrays_and_clamps() {
    let source = "}\nvar a = [\"1\", \"2\", \"3\", \"4\", \"5\"];\nf(a[0]);\n";
    let rewrite = SourceProcessor::default().process(source).unwrap();
    assert_eq!(rewrite.report.arrays.len(), 1);
    assert_eq!(rewrite.report.arrays[0].name, "a");
    assert_eq!(rewrite.report.clamped_closings, 1);
}

#[test]
fn test_unterminated_declaration_reports_line() {
    let source = "ok();\nvar a = [\"1\",\n\"2\",\n";
    let err = SourceProcessor::default().process(source).unwrap_err();
    assert_eq!(
        err,
        ExtractError::UnterminatedDeclaration { line: 1, depth: 0 }
    );
}

#[test]
fn test_loader_round_trip() {
    let loader = SourceLoader::from_string(
        "var k = [\"alpha\", \"beta\", \"gamma\", \"delta\", \"epsilon\"];\npick(k[2]);\n",
    );
    assert_eq!(loader.deobfuscate().unwrap(), "pick(\"gamma\");\n");
}

#[test]
fn test_rule_filter_composes_after_rewrite() {
    let source = "var s = [\"ev\", \"al\", \"x\", \"y\", \"z\"];\nvar f = s[0] + s[1];\nwin[\"call\"](f);\n";
    let rewritten = deobfuscate(source);
    assert_eq!(rewritten, "var f = \"eval\";\nwin[\"call\"](f);\n");
    let filtered = unmangle::rules::apply_rules(&rewritten);
    assert!(filtered.contains("win.call(\"eval\")"));
}
