use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn command_list() -> anyhow::Result<()> {
    let mut cmd = cargo_bin_cmd!("conscore");
    let output = cmd.arg("list").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("basic.identity\n"));
    assert!(stdout.contains("caprasingh07.js_divergence\n"));
    assert!(stdout.contains("caprasingh07.shannon_entropy\n"));
    assert!(!stdout.contains("caprasingh07.base"));

    Ok(())
}

#[test]
fn command_list_params() -> anyhow::Result<()> {
    let mut cmd = cargo_bin_cmd!("conscore");
    cmd.arg("list")
        .arg("--params")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic.identity\twindow_size\t2\t"))
        .stdout(predicate::str::contains("basic.identity\tcount_gaps\ttrue\t"))
        .stdout(predicate::str::contains(
            "caprasingh07.js_divergence\twindow_size\t3\t",
        ))
        .stdout(predicate::str::contains(
            "caprasingh07.shannon_entropy\tgap_cutoff\t0.3\t",
        ));

    Ok(())
}
