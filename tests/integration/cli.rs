//! Driver and diagnostics across all layers

use cafelisp_runtime::{CliConfig, CliError, Outcome, render_cli, run};

use crate::classreader::Class;

#[test]
fn dump_then_compile() {
    let config = CliConfig::parse(["--dump".to_string()]).unwrap();
    let mut listing = Vec::new();
    let outcome = run(&config, "(print (+ 1 2))".as_bytes(), &mut listing).unwrap();
    assert_eq!(outcome, Outcome::Dumped);
    let listing = String::from_utf8(listing).unwrap();
    assert!(listing.contains("ladd"));
    assert!(listing.contains("invokevirtual"));
}

#[test]
fn written_class_runs() {
    let dir = std::env::temp_dir().join(format!("cafelisp-cli-{}", std::process::id()));
    let config = CliConfig::parse([
        "-o".to_string(),
        dir.display().to_string(),
        "--class-name".to_string(),
        "Hello".to_string(),
    ])
    .unwrap();
    let outcome = run(&config, "(print \"hello\")".as_bytes(), &mut Vec::new()).unwrap();
    let Outcome::Written(path) = outcome else {
        panic!("expected a written file");
    };
    assert_eq!(path.file_name().unwrap(), "Hello.class");
    let class = Class::parse(&std::fs::read(&path).unwrap());
    assert_eq!(class.this_class, "Hello");
    assert_eq!(class.run_main(), "hello\n");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn type_error_diagnostic() {
    let config = CliConfig::default();
    let source = "(print 1)\n(print (+ 1 \"two\"))\n";
    let err = run(&config, source.as_bytes(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CliError::Compile(_)));
    assert_eq!(
        render_cli(&err),
        "2:13: type mismatch: expected long, got string\n(print (+ 1 \"two\")\n            ^"
    );
}
