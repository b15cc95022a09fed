//! End-to-end scenarios for the unix-utc analyzer.

use pretty_assertions::assert_eq;

use chronolint::{Diagnostic, GoParser, UnixUtcAnalyzer};

fn analyze(source: &str) -> Vec<Diagnostic> {
    let unit = GoParser::new()
        .unwrap()
        .parse("scenario.go", source)
        .unwrap();
    UnixUtcAnalyzer::new().run(&unit)
}

#[test]
fn no_raw_construction_means_empty_set() {
    let diagnostics = analyze(
        r#"
package api

func render(t time.Time) ([]byte, error) {
    return json.Marshal(Order{CreatedAt: t})
}
"#,
    );
    assert_eq!(diagnostics, vec![]);
}

#[test]
fn scenario_a_unnormalized_literal_field() {
    let source = r#"
package api

func bad(unixTimestamp int64) {
    b, _ := json.MarshalIndent(Order{
        CreatedAt: time.Unix(unixTimestamp, 0),
    }, "", "  ")
    fmt.Printf("bad: %v\n", string(b))
}
"#;
    let diagnostics = analyze(source);
    assert_eq!(diagnostics.len(), 1);

    let diag = &diagnostics[0];
    let fix = diag.fix.as_ref().expect("fix suggestion");
    assert_eq!(fix.text, ".UTC()");

    // Insertion lands immediately after the constructor call.
    let construction = "time.Unix(unixTimestamp, 0)";
    let end = source.find(construction).unwrap() + construction.len();
    assert_eq!(fix.insert_at, end);
}

#[test]
fn scenario_b_normalized_before_literal() {
    let diagnostics = analyze(
        r#"
package api

func good(unixTimestamp int64) {
    b, _ := json.MarshalIndent(Order{
        CreatedAt: time.Unix(unixTimestamp, 0).UTC(),
    }, "", "  ")
    fmt.Printf("good: %v\n", string(b))
}
"#,
    );
    assert_eq!(diagnostics, vec![]);
}

#[test]
fn scenario_c_rebinding_anchors_to_second_construction() {
    let source = r#"
package api

func rebind(a, b int64) {
    t := time.Unix(a, 0)
    t = unrelatedValue()
    t = time.Unix(b, 0)
    json.Marshal(Order{CreatedAt: t})
}
"#;
    let diagnostics = analyze(source);
    assert_eq!(diagnostics.len(), 1);
    // Anchored to `t = time.Unix(b, 0)` on line 7.
    assert_eq!(diagnostics[0].span.start_line, 7);
}

#[test]
fn normalized_flow_only_reaches_boundary() {
    let diagnostics = analyze(
        r#"
package api

func ok(ts int64) {
    raw := time.Unix(ts, 0)
    canonical := raw.UTC()
    json.Marshal(Order{CreatedAt: canonical})
}
"#,
    );
    assert_eq!(diagnostics, vec![]);
}

#[test]
fn idempotence_same_unit_same_set() {
    let unit = GoParser::new()
        .unwrap()
        .parse(
            "scenario.go",
            r#"
package api

func f(a, b int64) {
    json.Marshal(Order{CreatedAt: time.Unix(a, 0)})
    json.Marshal(Order{CreatedAt: time.UnixNano(b)})
}
"#,
        )
        .unwrap();
    let analyzer = UnixUtcAnalyzer::new();
    let first = analyzer.run(&unit);
    let second = analyzer.run(&unit);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn conservativeness_unmodeled_call_never_adds_findings() {
    let direct = analyze(
        r#"
package api

func f(ts int64) {
    t := time.Unix(ts, 0)
    json.Marshal(Order{CreatedAt: t})
}
"#,
    );
    let with_intermediate = analyze(
        r#"
package api

func f(ts int64) {
    t := time.Unix(ts, 0)
    touch(t)
    json.Marshal(Order{CreatedAt: t})
}
"#,
    );
    assert_eq!(direct.len(), 1);
    assert!(with_intermediate.len() <= direct.len());
}

#[test]
fn same_binding_at_two_boundaries_reports_once() {
    let diagnostics = analyze(
        r#"
package api

func f(ts int64) {
    t := time.Unix(ts, 0)
    json.Marshal(Order{CreatedAt: t})
    json.Marshal(Audit{SeenAt: t})
}
"#,
    );
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn milli_and_nano_constructors_are_flagged() {
    let diagnostics = analyze(
        r#"
package api

func f(ms, ns int64) {
    json.Marshal(Order{CreatedAt: time.UnixMilli(ms)})
    json.Marshal(Order{CreatedAt: time.UnixNano(ns)})
}
"#,
    );
    assert_eq!(diagnostics.len(), 2);
}
