use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "vr-survival"])
        .status()
        .expect("failed to invoke cargo check for vr-survival CLI binary");

    assert!(status.success(), "cargo check --bin vr-survival should succeed");
}

#[test]
fn headless_round_reports_hud() {
    let settings = std::env::temp_dir().join(format!(
        "vr-survival-cli-lighting-{}.toml",
        std::process::id()
    ));
    let output = Command::new(env!("CARGO_BIN_EXE_vr-survival"))
        .args(["--seconds", "3", "--tick-rate", "30", "--seed", "7"])
        .arg("--settings")
        .arg(&settings)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run vr-survival");

    assert!(output.status.success(), "vr-survival exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Health: 100\nTime: "), "{stdout}");
    assert!(stdout.contains("Ammo: "), "{stdout}");
}

#[test]
fn rejects_zero_tick_rate() {
    let output = Command::new(env!("CARGO_BIN_EXE_vr-survival"))
        .args(["--tick-rate", "0"])
        .output()
        .expect("failed to run vr-survival");
    assert!(!output.status.success());
}
