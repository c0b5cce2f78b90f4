use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;
use trainsum::Summary;

/// End-to-end tests that run the built `trainsum` binary

fn trainsum(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trainsum"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run trainsum")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_calc_unknown_code_exits_with_2() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(&temp_dir.path().join("config.toml"), &["calc", "XYZ", "1", "1", "1"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("SWM, RUN or WLK"));
}

#[test]
fn test_calc_overflowing_reading_exits_with_2() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(
        &temp_dir.path().join("config.toml"),
        &["calc", "RUN", "15000", "1e-308", "75"],
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_calc_prints_rendered_summary() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(
        &temp_dir.path().join("config.toml"),
        &["calc", "RUN", "15000", "1", "75"],
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "Activity: Running; Duration: 1.00 h.; Distance: 9.75 km; \
         Avg speed: 9.75 km/h; Calories burned: 797.80."
    );
}

#[test]
fn test_calc_json_output_parses() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(
        &temp_dir.path().join("config.toml"),
        &["-o", "json", "calc", "SWM", "720", "1", "80", "25", "40"],
    );

    assert!(output.status.success());
    let summaries: Vec<Summary> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].activity_name(), "Swimming");
    assert!((summaries[0].calories_kcal() - 336.0).abs() < 1e-6);
}

#[test]
fn test_sample_csv_has_one_row_per_package() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(&temp_dir.path().join("config.toml"), &["sample", "-o", "csv"]);

    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("index,code,activity_name,"));
    assert!(lines[1].starts_with("0,SWM,Swimming,"));
    assert!(lines[2].starts_with("1,RUN,Running,"));
    assert!(lines[3].starts_with("2,WLK,RaceWalking,"));
}

#[test]
fn test_missing_config_file_warns() {
    let temp_dir = tempdir().unwrap();
    let output = trainsum(&temp_dir.path().join("absent.toml"), &["sample"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("Config file not found"));
}

#[test]
fn test_batch_exit_codes_follow_error_policy() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.toml");
    let input = temp_dir.path().join("packages.csv");
    fs::write(&input, "RUN,15000,1,75\nBIK,1,1,1\nWLK,9000,1,75,180\n").unwrap();
    let input = input.to_str().unwrap();

    let skipped = trainsum(&config, &["batch", "--file", input, "-o", "csv"]);
    assert_eq!(skipped.status.code(), Some(2));
    assert_eq!(stdout(&skipped).lines().count(), 4);

    let aborted = trainsum(&config, &["batch", "--file", input, "--fail-fast"]);
    assert_eq!(aborted.status.code(), Some(1));
    assert!(stderr(&aborted).contains("package 1"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("config.toml");

    let first = trainsum(&config, &["config", "--init"]);
    assert!(first.status.success());
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("[batch]"));

    fs::write(
        &config,
        written.replace("error_policy = \"skip\"", "error_policy = \"abort\""),
    )
    .unwrap();
    let edited = fs::read_to_string(&config).unwrap();

    let second = trainsum(&config, &["config", "--init"]);
    assert_eq!(second.status.code(), Some(1));
    assert!(stderr(&second).contains("--force"));
    assert_eq!(fs::read_to_string(&config).unwrap(), edited);

    let forced = trainsum(&config, &["config", "--init", "--force"]);
    assert!(forced.status.success());
    assert!(fs::read_to_string(&config).unwrap().contains("error_policy = \"skip\""));
}
