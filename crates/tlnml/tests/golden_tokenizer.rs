use std::env;
use std::path::{Path, PathBuf};
use tlnml_test_support::{
    Fixture, FixtureStatus, config_by_name, diff_lines, load_fixtures, run_tokenizer,
    run_tokenizer_chunked,
};

const CHUNK_SIZES: [usize; 5] = [1, 2, 3, 7, 64];

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tokenizer.toml")
}

fn selected_fixtures() -> Vec<Fixture> {
    let filter = env::var("TLNML_TOKEN_FIXTURE").ok();
    load_fixtures(&fixture_path())
        .into_iter()
        .filter(|fixture| {
            filter
                .as_deref()
                .is_none_or(|filter| fixture.name.contains(filter))
        })
        .collect()
}

fn enforce_expected(fixture: &Fixture, actual: &[String], label: &str) {
    let mismatch = actual != fixture.tokens;
    match fixture.status {
        FixtureStatus::Active => {
            if mismatch {
                panic!(
                    "token mismatch in fixture '{}' [{label}]\n{}",
                    fixture.name,
                    diff_lines(&fixture.tokens, actual)
                );
            }
        }
        FixtureStatus::Xfail => {
            if !mismatch {
                panic!(
                    "fixture '{}' [{label}] matched expected tokens but is marked xfail; reason: {}",
                    fixture.name,
                    fixture.reason.as_deref().unwrap_or("<missing reason>")
                );
            }
        }
        FixtureStatus::Skip => {}
    }
}

#[test]
fn golden_tokenizer_whole_input() {
    let fixtures = selected_fixtures();
    assert!(!fixtures.is_empty(), "no fixtures matched filter");
    for fixture in &fixtures {
        if fixture.status == FixtureStatus::Skip {
            continue;
        }
        let actual = run_tokenizer(&fixture.input, config_by_name(&fixture.config));
        enforce_expected(fixture, &actual, "whole");
    }
}

#[test]
fn golden_tokenizer_chunked_bytes() {
    let fixtures = selected_fixtures();
    assert!(!fixtures.is_empty(), "no fixtures matched filter");
    for fixture in &fixtures {
        if fixture.status == FixtureStatus::Skip {
            continue;
        }
        let whole = run_tokenizer(&fixture.input, config_by_name(&fixture.config));
        for step in CHUNK_SIZES {
            let actual = run_tokenizer_chunked(
                fixture.input.as_bytes(),
                step,
                config_by_name(&fixture.config),
            );
            assert!(
                actual == whole,
                "chunked output mismatch in fixture '{}' (step={step})\n{}",
                fixture.name,
                diff_lines(&whole, &actual)
            );
            enforce_expected(fixture, &actual, &format!("chunked step={step}"));
        }
    }
}
