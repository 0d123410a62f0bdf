//! Runs the compiled binary against components on disk.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};

const COUNTER: &str = r#"<template>
  <button @click="inc">{{ count }}</button>
</template>

<script>
export default {
  data() {
    return { count: 0 };
  },
  methods: {
    inc() {
      this.count += 1;
    },
  },
};
</script>
"#;

fn vue2svelte(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vue2svelte"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

#[test]
fn test_converts_into_current_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join("src")).expect("src dir");
    std::fs::write(dir.path().join("src/Counter.vue"), COUNTER).expect("write input");

    let output = vue2svelte(dir.path(), &["src/Counter.vue"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "Successfully converted src/Counter.vue to Counter.svelte. Please note that some manual corrections are probably still required."
    );

    let svelte = std::fs::read_to_string(dir.path().join("Counter.svelte")).expect("output file");
    assert_eq!(
        svelte,
        "<script>\nlet count = 0;\n\nfunction inc() {\n  count += 1;\n}\n</script>\n\n\
         <button on:click=\"{inc}\">\n  {count}\n</button>\n"
    );
}

#[test]
fn test_explicit_output_and_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("Counter.vue"), COUNTER).expect("write input");

    let output = vue2svelte(dir.path(), &["Counter.vue", "out.svelte", "--unquoted"]);
    assert!(output.status.success());
    let svelte = std::fs::read_to_string(dir.path().join("out.svelte")).expect("output file");
    assert!(svelte.contains("<button on:click={inc}>"), "{}", svelte);

    let output = vue2svelte(dir.path(), &["Counter.vue", "--stdout"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), svelte.replace("={inc}", "=\"{inc}\""));
}

#[test]
fn test_warnings_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = COUNTER.replace("  methods: {", "  watch: {},\n  methods: {");
    std::fs::write(dir.path().join("Counter.vue"), &source).expect("write input");

    let output = vue2svelte(dir.path(), &["Counter.vue", "--diagnostics", "json"]);
    assert!(output.status.success());
    let reported: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("json diagnostics on stderr");
    assert_eq!(reported[0]["code"], "unknown-option");
    assert!(dir.path().join("Counter.svelte").exists());

    std::fs::remove_file(dir.path().join("Counter.svelte")).expect("remove output");
    let output = vue2svelte(dir.path(), &["Counter.vue", "--deny-warnings"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("Counter.svelte").exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = vue2svelte(dir.path(), &["Missing.vue"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing.vue"));

    let output = vue2svelte(dir.path(), &[]);
    assert!(!output.status.success());
}

#[test]
fn test_template_errors_abort() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("Broken.vue"),
        "<template>\n  <div><span></div>\n</template>\n",
    )
    .expect("write input");

    let output = vue2svelte(dir.path(), &["Broken.vue"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("Broken.svelte").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Broken.vue:2:"), "{}", stderr);
}
