use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tilering"))
        .args(args)
        .output()
        .expect("Failed to execute tilering")
}

#[test]
fn test_cli_prints_solution() {
    let output = run(&[
        "--rows", "3", "--cols", "3", "--peers", "2", "--seed", "1", "1,2,3,4,0,6,7,5,8",
    ]);
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Elapsed time:"));
    assert!(stdout.contains("-------------Solution-----------------"));
    assert!(stdout.contains("1. down"), "stdout: {}", stdout);
    assert!(stdout.contains("2. right"), "stdout: {}", stdout);
    assert!(!stdout.contains("3. "));
}

#[test]
fn test_cli_space_separated_grid() {
    let output = run(&["--rows", "2", "--cols", "2", "--peers", "1", "0", "1", "3", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1. right"), "stdout: {}", stdout);
    assert!(stdout.contains("2. down"), "stdout: {}", stdout);
}

#[test]
fn test_cli_unsolvable_exits_with_error() {
    let output = run(&["--rows", "3", "--cols", "3", "1,2,3,4,5,6,8,7,0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not solvable"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Solution"));
}

#[test]
fn test_cli_length_mismatch_exits_with_error() {
    let output = run(&["1,2,3,0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not match 4x4"));
}
