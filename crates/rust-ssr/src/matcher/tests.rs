use rstest::rstest;

use super::*;
use crate::config::SearchConfig;
use crate::parser::Parser;

fn parse(source: &str) -> ParseResult {
    Parser::new()
        .and_then(|mut parser| parser.parse(source))
        .expect("parse")
}

fn compile(template: &str) -> Pattern {
    Pattern::compile(template).expect("template should compile")
}

fn matched_texts(template: &str, source: &str) -> Vec<String> {
    let pattern = compile(template);
    let parsed = parse(source);
    pattern
        .find_all(&parsed)
        .iter()
        .map(|found| found.text().to_owned())
        .collect()
}

fn capture_text(found: &MatchResult<'_>, name: &str) -> String {
    found
        .capture(name)
        .unwrap_or_else(|| panic!("missing capture {name}"))
        .text()
        .to_owned()
}

#[test]
fn literal_template_matches_only_identical_calls() {
    let texts = matched_texts("foo()", "fn main() { foo(); fooo(); bar(); }");
    assert_eq!(texts, ["foo();"]);
}

#[test]
fn anonymous_wildcards_bind_exactly_one_argument() {
    let source = r#"fn main() { bar(1); bar('a'); bar(x("y")); bar(); bar(1, 2); }"#;
    let texts = matched_texts("'_('_)", source);
    assert_eq!(texts, ["bar(1);", "bar('a');", r#"bar(x("y"));"#]);
}

#[rstest]
#[case("continue", &["continue;", "continue 'foo;", "continue 'bar;"])]
#[case(r"continue \'foo", &["continue 'foo;"])]
#[case(r"continue \''_:*[regex(foo)]", &["continue 'foo;"])]
#[case(r"continue \''_:*[!regex(foo)]", &["continue 'bar;"])]
fn continue_labels(#[case] template: &str, #[case] expected: &[&str]) {
    let source = "fn f() { loop { continue; } 'foo: loop { continue 'foo; } 'bar: loop { continue 'bar; } }";
    assert_eq!(matched_texts(template, source), expected);
}

#[rstest]
#[case("break", &["break;", "break 'outer;", "break 2;", "break 5;"])]
#[case(r"break \'outer", &["break 'outer;"])]
#[case("break 2", &["break 2;"])]
fn break_labels_and_values(#[case] template: &str, #[case] expected: &[&str]) {
    let source = "fn f() { loop { break; } 'outer: loop { break 'outer; } loop { break 2; } loop { break 5; } }";
    assert_eq!(matched_texts(template, source), expected);
}

#[test]
fn label_wildcard_binds_name_without_quote() {
    let pattern = compile(r"continue \''_label");
    let parsed = parse("fn f() { 'outer: loop { continue 'outer; } }");
    let found = pattern.find_first(&parsed).expect("match");
    assert_eq!(capture_text(&found, "label"), "outer");
}

#[test]
fn struct_template_does_not_match_union() {
    let source = "struct A { x: u8 }\nunion B { x: u8 }";
    assert_eq!(matched_texts("struct '_S { x: u8 }", source), ["struct A { x: u8 }"]);
    assert_eq!(matched_texts("union '_U { x: u8 }", source), ["union B { x: u8 }"]);
}

#[test]
fn type_parameter_wildcard_binds_any_generic_parameter() {
    let pattern = compile("struct Holder<'_T>;");
    let parsed = parse("struct Holder<'a>;\nstruct Holder<const N: usize>;\nstruct Holder<T>;");
    let bound: Vec<_> = pattern
        .find_all(&parsed)
        .iter()
        .map(|found| capture_text(found, "T"))
        .collect();
    assert_eq!(bound, ["'a", "const N: usize", "T"]);
}

#[test]
fn zero_or_more_wildcard_absorbs_whole_argument_list() {
    let pattern = compile("foo('_args:*)");
    let parsed = parse("fn main() { foo(); foo(1); foo(1, 2, 3); }");
    let lengths: Vec<_> = pattern
        .find_all(&parsed)
        .iter()
        .map(|found| {
            found
                .capture("args")
                .and_then(CapturedValue::as_multiple)
                .map(|nodes| nodes.nodes().len())
                .expect("multiple capture")
        })
        .collect();
    assert_eq!(lengths, [0, 1, 3]);
}

#[test]
fn greedy_runs_back_off_for_trailing_elements() {
    let pattern = compile("foo('_head:+, 1)");
    let parsed = parse("fn main() { foo(1); foo(2, 1); foo(2, 3, 1); foo(1, 2); }");
    let found = pattern.find_all(&parsed);
    let texts: Vec<_> = found.iter().map(MatchResult::text).collect();
    assert_eq!(texts, ["foo(2, 1);", "foo(2, 3, 1);"]);
    let heads: Vec<_> = found.iter().map(|m| capture_text(m, "head")).collect();
    assert_eq!(heads, ["2", "2, 3"]);
}

#[test]
fn bounded_quantifier_limits_run_length() {
    let texts = matched_texts("foo('_a:{1,2})", "fn main() { foo(); foo(1); foo(1, 2); foo(1, 2, 3); }");
    assert_eq!(texts, ["foo(1);", "foo(1, 2);"]);
}

#[test]
fn repeated_variable_requires_identical_text() {
    let texts = matched_texts("'_x + '_x", "fn main() { a + a; a + b; }");
    assert_eq!(texts, ["a + a;"]);
}

#[test]
fn literals_compare_by_value() {
    let texts = matched_texts("f(2)", "fn main() { f(0x2); f(2u8); f(2_0); f(3); }");
    assert_eq!(texts, ["f(0x2);", "f(2u8);"]);
}

#[test]
fn string_literals_compare_by_content() {
    let texts = matched_texts(r#"f("a\x62")"#, r##"fn main() { f("ab"); f(r"ab"); f("ba"); }"##);
    assert_eq!(texts, [r#"f("ab");"#, r#"f(r"ab");"#]);
}

#[test]
fn attribute_arguments_match_in_any_order() {
    let source = "#[derive(Debug, Clone)]\nstruct A;\n#[derive(Debug)]\nstruct B;\nstruct C;";
    let texts = matched_texts("#[derive(Clone, Debug)]\nstruct '_S;", source);
    assert_eq!(texts, ["struct A;"]);
}

#[test]
fn outer_attributes_match_in_any_order() {
    let source = "#[b]\n#[a]\nstruct X;\n#[a]\nstruct Y;\n#[a]\n#[b]\n#[c]\nstruct Z;";
    let texts = matched_texts("#[a]\n#[b]\nstruct '_S;", source);
    assert_eq!(texts, ["struct X;"]);
}

#[test]
fn quantified_attribute_argument_takes_the_rest() {
    let source = "#[derive(Debug, Clone, Copy)]\nstruct A;\n#[derive(Clone)]\nstruct B;";
    let pattern = compile("#[derive(Debug, '_rest:*)]\nstruct '_S;");
    let parsed = parse(source);
    let found = pattern.find_all(&parsed);
    assert_eq!(found.len(), 1);
    let rest = found
        .first()
        .and_then(|m| m.capture("rest"))
        .and_then(CapturedValue::as_multiple)
        .expect("rest capture");
    let names: Vec<_> = rest.nodes().iter().map(CapturedNode::text).collect();
    assert_eq!(names, ["Clone", "Copy"]);
}

#[test]
fn where_bounds_match_in_any_order() {
    let source = "struct A<T> where T: Debug + Clone { x: T }\nstruct B<T> where T: Debug { x: T }";
    let texts = matched_texts("struct '_S<T> where T: Clone + Debug { x: T }", source);
    assert_eq!(texts, ["struct A<T> where T: Debug + Clone { x: T }"]);
}

#[rstest]
#[case("foo(1)", &["a::foo(1);", "foo(1);", "b::foo(1);"])]
#[case("a::foo(1)", &["a::foo(1);"])]
fn path_qualifiers_are_optional_in_templates(#[case] template: &str, #[case] expected: &[&str]) {
    let source = "fn main() { a::foo(1); foo(1); b::foo(1); b::bar(1); }";
    assert_eq!(matched_texts(template, source), expected);
}

#[test]
fn visibility_ignores_inner_whitespace() {
    let source = "pub(crate) struct A;\npub struct B;\npub( crate ) struct C;\nstruct D;";
    let texts = matched_texts("pub(crate) struct '_S;", source);
    assert_eq!(texts, ["pub(crate) struct A;", "pub( crate ) struct C;"]);
}

#[rstest]
#[case("let '_x: &mut u8 = '_v;", &["let a: &mut u8 = p;"])]
#[case("let '_x: &u8 = '_v;", &["let b: &u8 = q;"])]
#[case("let '_x: *mut u8 = '_v;", &["let c: *mut u8 = r;"])]
#[case("let '_x: *const u8 = '_v;", &["let d: *const u8 = s;"])]
fn reference_and_pointer_markers(#[case] template: &str, #[case] expected: &[&str]) {
    let source = "fn f() { let a: &mut u8 = p; let b: &u8 = q; let c: *mut u8 = r; let d: *const u8 = s; }";
    assert_eq!(matched_texts(template, source), expected);
}

#[test]
fn const_template_does_not_match_static() {
    let source = "const A: u8 = 1;\nstatic B: u8 = 1;\nstatic mut C: u8 = 1;";
    assert_eq!(matched_texts("const '_N: u8 = 1;", source), ["const A: u8 = 1;"]);
    assert_eq!(matched_texts("static '_N: u8 = 1;", source), ["static B: u8 = 1;"]);
    assert_eq!(matched_texts("static mut '_N: u8 = 1;", source), ["static mut C: u8 = 1;"]);
}

#[test]
fn tuple_fields_match_in_order() {
    let source = "struct A(u8, String);\nstruct B(String, u8);\nstruct C(pub u8, String);";
    assert_eq!(
        matched_texts("struct '_S(u8, String);", source),
        ["struct A(u8, String);", "struct C(pub u8, String);"]
    );
    assert_eq!(
        matched_texts("struct '_S(pub u8, String);", source),
        ["struct C(pub u8, String);"]
    );
}

#[test]
fn multiple_statements_match_consecutive_siblings() {
    let source = "fn main() { let x = 1; x + 1; let y = 1; z + 1; }";
    let texts = matched_texts("let '_a = 1; '_a + 1", source);
    assert_eq!(texts, ["let x = 1; x + 1;"]);
}

#[test]
fn comments_do_not_take_part_in_matching() {
    let texts = matched_texts("foo(1, 2)", "fn main() { foo(1, /* two */ 2); }");
    assert_eq!(texts, ["foo(1, /* two */ 2);"]);
}

#[test]
fn match_reports_one_based_positions() {
    let pattern = compile("foo()");
    let parsed = parse("fn main() {\n    foo();\n}");
    let found = pattern.find_first(&parsed).expect("match");
    assert_eq!(found.start_position(), (2, 5));
    assert_eq!(found.end_position(), (2, 11));
    assert_eq!(found.byte_range(), 16..22);
}

#[test]
fn match_node_tries_a_single_anchor() {
    let pattern = compile("foo()");
    let parsed = parse("fn main() { foo(); }");
    let statement = pattern.find_first(&parsed).expect("match").node();
    assert!(pattern.match_node(&parsed, statement).is_some());
    assert!(pattern.match_node(&parsed, parsed.root_node()).is_none());
}

#[test]
fn search_stops_at_the_match_limit() {
    let config = SearchConfig::default().with_max_matches(2);
    let pattern = Pattern::compile_with_config("foo()", &config).expect("compile");
    let parsed = parse("fn main() { foo(); foo(); foo(); }");
    assert_eq!(pattern.find_all(&parsed).len(), 2);
}

#[test]
fn depth_limit_turns_deep_comparisons_into_mismatches() {
    let source = "fn main() { foo(1); }";
    let shallow = SearchConfig::default().with_max_depth(1);
    let pattern = Pattern::compile_with_config("foo(1)", &shallow).expect("compile");
    assert!(pattern.find_all(&parse(source)).is_empty());
    assert_eq!(matched_texts("foo(1)", source), ["foo(1);"]);
}

#[test]
fn repeated_searches_are_independent() {
    let pattern = compile("'_f('_x)");
    let parsed = parse("fn main() { a(1); b(2); }");
    let first: Vec<_> = pattern.find_all(&parsed).iter().map(|m| capture_text(m, "x")).collect();
    let second: Vec<_> = Matcher::new(&pattern)
        .find_all(&parsed)
        .iter()
        .map(|m| capture_text(m, "x"))
        .collect();
    assert_eq!(first, ["1", "2"]);
    assert_eq!(first, second);
}
