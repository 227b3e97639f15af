use assert_cmd::cargo::cargo_bin_cmd;

const LAUNCH_RESERVES: [&str; 4] = [
    "--virtual-token-reserves",
    "1000000000000000000000000000",
    "--virtual-eth-reserves",
    "30000000000000000000",
];

#[test]
fn quote_buy_prints_exact_tokens_out() {
    let output = cargo_bin_cmd!("curve-cli")
        .arg("quote-buy")
        .args(LAUNCH_RESERVES)
        .args(["--eth-in", "1000000000000000000"])
        .output()
        .expect("CLI execution failed");
    assert!(
        output.status.success(),
        "quote-buy exited with status {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("tokens_out=32258064516129032258064517"),
        "unexpected stdout: {stdout}"
    );
    assert!(stdout.contains("price_impact_bps="), "stdout: {stdout}");
}

#[test]
fn quote_sell_prints_default_floor() {
    let output = cargo_bin_cmd!("curve-cli")
        .arg("quote-sell")
        .args(LAUNCH_RESERVES)
        .args(["--token-in", "1000000000000000000000000"])
        .output()
        .expect("CLI execution failed");
    assert!(output.status.success(), "status {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("eth_out=29970029970029970"), "stdout: {stdout}");
    assert!(stdout.contains("min_eth_out=28471528471528471"), "stdout: {stdout}");
}

#[test]
fn zero_reserves_fail_cleanly() {
    let output = cargo_bin_cmd!("curve-cli")
        .args([
            "quote-buy",
            "--virtual-token-reserves",
            "0",
            "--virtual-eth-reserves",
            "30",
            "--eth-in",
            "1",
        ])
        .output()
        .expect("CLI execution failed");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no virtual reserves"), "stderr: {stderr}");
}
