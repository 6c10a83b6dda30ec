use clap::Parser;
use q47_verify::core::archive::{ARCHIVE_FILE, SUMMARY_FILE};
use q47_verify::domain::model::{PrimeClass, Task};
use q47_verify::domain::services::theoretical_root_count;
use q47_verify::utils::validation::Validate;
use q47_verify::{
    classify, count_effective_moduli, global_exponent, local_root_count, restricted_exponent,
    run_verification, sieve_primes, CliConfig, LocalStorage, TomlConfig,
};
use std::io::Read;
use tempfile::TempDir;

fn read_csv(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader.records().map(|r| r.unwrap()).collect()
}

fn is_effective_by_trial_division(mut n: u64) -> bool {
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            if p % 47 != 1 {
                return false;
            }
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    n == 1 || n % 47 == 1
}

#[test]
fn test_end_to_end_run_with_archive() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "q47-verify",
        "--checkpoints",
        "100,1000,10000",
        "--p-max",
        "300",
        "--archive",
        "--output-path",
        &output_path,
    ]);
    assert!(config.validate().is_ok());

    let storage = LocalStorage::new(output_path.clone());
    let outcome = run_verification(&config, &storage, false).unwrap();

    assert!(outcome.manifest.all_passed());
    assert_eq!(outcome.manifest.modulus, 47);
    let tasks: Vec<Task> = outcome.manifest.tasks.iter().map(|t| t.task).collect();
    assert_eq!(tasks, vec![Task::Moduli, Task::LocalRoots, Task::Exponents]);

    let moduli = read_csv(&temp_dir.path().join("effective_moduli_count.csv"));
    let counts: Vec<(&str, &str)> = moduli.iter().map(|r| (&r[0], &r[1])).collect();
    assert_eq!(counts, vec![("100", "1"), ("1000", "4"), ("10000", "29")]);

    let roots = read_csv(&temp_dir.path().join("local_root_structure.csv"));
    assert!(roots.iter().all(|r| &r[4] == "True"));
    assert!(roots.iter().any(|r| &r[0] == "283" && &r[1] == "splitting"));

    let exponents = read_csv(&temp_dir.path().join("cauchy_schwarz_comparison.csv"));
    assert!(exponents
        .iter()
        .any(|r| &r[0] == "45/46" && &r[2] == "FAILS" && &r[4] == "θ=1/2"));

    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(summary["modulus"], 47);
    assert_eq!(summary["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(summary["tasks"][1]["task"], "local-roots");
    assert_eq!(summary["tasks"][1]["failures"], 0);

    let zip_data = std::fs::read(temp_dir.path().join(ARCHIVE_FILE)).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 4);

    let mut contents = String::new();
    archive
        .by_name("effective_moduli_count.csv")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert!(contents.contains("\n1000,4,"));
    assert_eq!(
        outcome.archive_path,
        Some(format!("{}/{}", output_path, ARCHIVE_FILE))
    );
}

#[test]
fn test_default_checkpoints_reproduce_published_counts() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "q47-verify",
        "--task",
        "moduli",
        "--output-path",
        &output_path,
    ]);
    let storage = LocalStorage::new(output_path);
    let outcome = run_verification(&config, &storage, false).unwrap();
    assert_eq!(outcome.manifest.tasks.len(), 1);

    let moduli = read_csv(&temp_dir.path().join("effective_moduli_count.csv"));
    let counts: Vec<u64> = moduli.iter().map(|r| r[1].parse().unwrap()).collect();
    assert_eq!(counts, vec![1, 2, 4, 16, 29, 112, 204, 924, 1717]);
    assert!(!temp_dir.path().join("local_root_structure.csv").exists());
}

#[test]
fn test_paper_range_local_roots() {
    let primes = sieve_primes(6299);
    assert_eq!(primes.len(), 819);

    let mut splitting = 0;
    for &p in &primes {
        assert_eq!(local_root_count(p), theoretical_root_count(p), "p = {}", p);
        if classify(p) == PrimeClass::Splitting {
            splitting += 1;
        }
    }
    assert_eq!(splitting, 20);
    assert_eq!(local_root_count(6299), 46);
}

#[test]
fn test_primes_to_100_only_47_is_special() {
    let primes = sieve_primes(100);
    assert_eq!(primes.len(), 25);
    for p in primes {
        assert_eq!(local_root_count(p), 0);
        let expected = if p == 47 {
            PrimeClass::Ramified
        } else {
            PrimeClass::Inert
        };
        assert_eq!(classify(p), expected);
    }
}

#[test]
fn test_effective_count_matches_trial_division() {
    for bound in [100, 1000, 2500] {
        let brute = (1..=bound)
            .filter(|&q| is_effective_by_trial_division(q))
            .count() as u64;
        assert_eq!(count_effective_moduli(bound), brute, "bound = {}", bound);
    }
    assert_eq!(count_effective_moduli(100), 1);
}

#[test]
fn test_exponent_thresholds() {
    assert_eq!(global_exponent(45.0 / 46.0), 0.0);
    assert_eq!(restricted_exponent(45.0 / 23.0), 0.0);
    assert!((global_exponent(1.0) - 1.0 / 92.0).abs() < 1e-15);
    assert!((restricted_exponent(1.0) + 11.0 / 23.0).abs() < 1e-15);
    assert!(global_exponent(0.5) < 0.0);
}

#[test]
fn test_toml_config_driven_run() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("tables");
    std::env::set_var("Q47_INTEGRATION_OUT", out_dir.to_str().unwrap());

    let config_path = temp_dir.path().join("q47.toml");
    std::fs::write(
        &config_path,
        r#"
[run]
name = "small"
task = "exponents"

[exponents]
b_values = ["1/2", "45/46", "1"]

[output]
path = "${Q47_INTEGRATION_OUT}"
archive = true
"#,
    )
    .unwrap();

    let config = TomlConfig::from_file(&config_path).unwrap();
    std::env::remove_var("Q47_INTEGRATION_OUT");
    assert!(config.validate().is_ok());

    let storage = LocalStorage::new(out_dir.clone());
    let outcome = run_verification(&config, &storage, false).unwrap();
    assert!(outcome.manifest.all_passed());

    let rows = read_csv(&out_dir.join("cauchy_schwarz_comparison.csv"));
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][1], "+0.000000");
    assert!(out_dir.join(SUMMARY_FILE).exists());
    assert!(out_dir.join(ARCHIVE_FILE).exists());
    assert!(!out_dir.join("effective_moduli_count.csv").exists());
}
