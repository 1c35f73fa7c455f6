use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn callmatch() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("callmatch"))
}

const CHECKED: &str = r#"import com.siyeh.ig.callMatcher.CallMatcher;

public class Checked {
   CallMatcher ok = CallMatcher.instanceCall("java.util.List", "add");
   CallMatcher bad = CallMatcher.instanceCall("java.util.List", "asdasd");
}
"#;

const MERGEABLE: &str = r#"import com.siyeh.ig.callMatcher.CallMatcher;

public class Mergeable {
    static final CallMatcher LIST_OF = CallMatcher.staticCall("java.util.List", "of");
    static final CallMatcher SET_OF = CallMatcher.staticCall("java.util.Set", "of");

    boolean check(Object expression) {
        return LIST_OF.matches(expression) || SET_OF.matches(expression);
    }
}
"#;

fn selection_of(text: &str, needle: &str) -> (usize, usize) {
    let start = text.find(needle).expect("needle present");
    (start, start + needle.len())
}

#[test]
fn help_mentions_every_command() {
    callmatch().arg("--help").assert().success().stdout(
        predicate::str::contains("check")
            .and(predicate::str::contains("generate"))
            .and(predicate::str::contains("merge")),
    );
}

#[test]
fn check_reports_missing_methods_as_json() {
    let temp = TempDir::new().unwrap();
    temp.child("src/Checked.java").write_str(CHECKED).unwrap();

    let output = callmatch()
        .current_dir(temp.path())
        .arg("check")
        .arg("src")
        .arg("--json")
        .output()
        .unwrap();

    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["summary"]["files"].as_u64().unwrap(), 1);
    assert_eq!(v["summary"]["errors"].as_u64().unwrap(), 1);
    let diag = &v["diagnostics"][0];
    assert_eq!(diag["line"].as_u64().unwrap(), 5);
    assert_eq!(diag["code"], "CALLMATCHER_NO_INSTANCE_METHOD");
    assert_eq!(
        diag["message"],
        "No instance method exists with this name in the referenced class or any of its super classes."
    );
}

#[test]
fn check_passes_clean_sources() {
    let temp = TempDir::new().unwrap();
    temp.child("Clean.java")
        .write_str(
            r#"class Clean {
   Object m = CallMatcher.staticCall("java.lang.Integer", "toUnsignedString");
}
"#,
        )
        .unwrap();

    callmatch()
        .current_dir(temp.path())
        .args(["check", "Clean.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary: 1 files, 0 errors, 0 warnings"));
}

#[test]
fn check_missing_path_fails() {
    let temp = TempDir::new().unwrap();
    callmatch()
        .current_dir(temp.path())
        .args(["check", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn invalid_config_is_reported_readably() {
    let temp = TempDir::new().unwrap();
    temp.child("callmatch.toml")
        .write_str("[merge]\nfield_name = \"1x\"\n")
        .unwrap();
    temp.child("Checked.java").write_str(CHECKED).unwrap();

    callmatch()
        .current_dir(temp.path())
        .args(["check", "Checked.java"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "invalid config: merge.field_name: `1x` is not a Java identifier",
        ));
}

#[test]
fn config_selects_the_matcher_class() {
    let temp = TempDir::new().unwrap();
    temp.child("callmatch.toml")
        .write_str("[matchers]\nmatcher_class = \"org.example.Matchers\"\n")
        .unwrap();
    // Not a `Matchers` factory, so nothing is checked.
    temp.child("Checked.java").write_str(CHECKED).unwrap();

    callmatch()
        .current_dir(temp.path())
        .args(["check", "Checked.java"])
        .assert()
        .success();
}

#[test]
fn generate_prints_the_declaration() {
    let temp = TempDir::new().unwrap();
    let text = r#"package demo;
public class Target {
    public void run(String name, int count) {
    }
    public static Target create() {
        return new Target();
    }
}
"#;
    temp.child("Target.java").write_str(text).unwrap();
    let offset = text.find("run").unwrap().to_string();

    callmatch()
        .current_dir(temp.path())
        .args(["generate", "Target.java", "--offset", &offset, "--kind", "exact"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "CallMatcher.exactInstanceCall(\"demo.Target\", \"run\").parameterTypes(\"java.lang.String\", \"int\");\n",
        ));

    callmatch()
        .current_dir(temp.path())
        .args(["generate", "Target.java", "--offset", &offset])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--kind"))
        .stdout(predicate::str::diff(
            "instance: CallMatcher.instanceCall(\"demo.Target\", \"run\").parameterTypes(\"java.lang.String\", \"int\");\n\
             exact: CallMatcher.exactInstanceCall(\"demo.Target\", \"run\").parameterTypes(\"java.lang.String\", \"int\");\n",
        ));

    let offset = text.find("create").unwrap().to_string();
    callmatch()
        .current_dir(temp.path())
        .args(["generate", "Target.java", "--offset", &offset])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "CallMatcher.staticCall(\"demo.Target\", \"create\");\n",
        ));

    callmatch()
        .current_dir(temp.path())
        .args(["generate", "Target.java", "--offset", "0"])
        .assert()
        .code(1);
}

#[test]
fn merge_prints_and_writes() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("Mergeable.java");
    file.write_str(MERGEABLE).unwrap();
    let (start, end) =
        selection_of(MERGEABLE, "LIST_OF.matches(expression) || SET_OF.matches(expression)");
    let (start, end) = (start.to_string(), end.to_string());

    let output = callmatch()
        .current_dir(temp.path())
        .args(["merge", "Mergeable.java", "--start", &start, "--end", &end, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["field_name"], "CALL_MATCHER");
    assert_eq!(v["scope"], "Mergeable");
    assert!(v["text"]
        .as_str()
        .unwrap()
        .contains("return CALL_MATCHER.matches(expression);"));
    // Printing leaves the file alone.
    file.assert(MERGEABLE);

    callmatch()
        .current_dir(temp.path())
        .args(["merge", "Mergeable.java", "--start", &start, "--end", &end, "--write"])
        .assert()
        .success();
    file.assert(predicate::str::contains(
        "private static final CallMatcher CALL_MATCHER = CallMatcher.anyOf(LIST_OF, SET_OF);",
    ));
    temp.child(".callmatch.lock").assert(predicate::path::missing());
}

#[test]
fn merge_uses_configured_field_name() {
    let temp = TempDir::new().unwrap();
    temp.child("callmatch.toml")
        .write_str("[merge]\nfield_name = \"COLLECTION_OF\"\n")
        .unwrap();
    temp.child("Mergeable.java").write_str(MERGEABLE).unwrap();
    let (start, end) =
        selection_of(MERGEABLE, "LIST_OF.matches(expression) || SET_OF.matches(expression)");

    callmatch()
        .current_dir(temp.path())
        .args([
            "merge",
            "Mergeable.java",
            "--start",
            &start.to_string(),
            "--end",
            &end.to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("return COLLECTION_OF.matches(expression);"));
}

#[test]
fn merge_unavailable_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    let text = MERGEABLE.replace(" || ", " && ");
    let file = temp.child("Mergeable.java");
    file.write_str(&text).unwrap();
    let (start, end) =
        selection_of(&text, "LIST_OF.matches(expression) && SET_OF.matches(expression)");

    callmatch()
        .current_dir(temp.path())
        .args([
            "merge",
            "Mergeable.java",
            "--start",
            &start.to_string(),
            "--end",
            &end.to_string(),
            "--write",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("merge unavailable"));
    file.assert(text.as_str());
    temp.child(".callmatch.lock").assert(predicate::path::missing());
}

#[test]
fn ambiguous_scope_needs_an_index() {
    let temp = TempDir::new().unwrap();
    let text = r#"class Outer {
    static final CallMatcher A = CallMatcher.staticCall("java.util.List", "of");
    static final CallMatcher B = CallMatcher.staticCall("java.util.Set", "of");
    static class Inner {
        boolean check(Object e) {
            return A.matches(e) || B.matches(e);
        }
    }
}
"#;
    temp.child("Outer.java").write_str(text).unwrap();
    let (start, end) = selection_of(text, "A.matches(e) || B.matches(e)");
    let (start, end) = (start.to_string(), end.to_string());

    callmatch()
        .current_dir(temp.path())
        .args(["merge", "Outer.java", "--start", &start, "--end", &end])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("0: Outer.Inner").and(predicate::str::contains("1: Outer")));

    callmatch()
        .current_dir(temp.path())
        .args(["merge", "Outer.java", "--start", &start, "--end", &end, "--scope", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scope\": \"Outer\""));

    callmatch()
        .current_dir(temp.path())
        .args(["merge", "Outer.java", "--start", &start, "--end", &end, "--scope", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}
