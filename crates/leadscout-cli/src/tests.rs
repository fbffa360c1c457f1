use super::*;

#[test]
fn no_flags_parses_to_defaults() {
    let cli = Cli::try_parse_from(["leadscout"]).expect("expected valid cli args");
    assert!(cli.queries.is_empty());
    assert!(cli.max_profiles.is_none());
    assert!(!cli.dry_run);

    let config = cli.apply_overrides(RunConfig::default());
    assert_eq!(config, RunConfig::default());
}

#[test]
fn repeated_query_flags_replace_queries() {
    let cli = Cli::try_parse_from([
        "leadscout",
        "--query",
        "site:instagram.com forex mentor",
        "-q",
        "site:instagram.com flipping coach",
    ])
    .expect("expected valid cli args");

    let config = cli.apply_overrides(RunConfig::default());
    assert_eq!(
        config.queries,
        vec![
            "site:instagram.com forex mentor",
            "site:instagram.com flipping coach"
        ]
    );
}

#[test]
fn numeric_overrides_apply() {
    let cli = Cli::try_parse_from([
        "leadscout",
        "--max-profiles",
        "10",
        "--min-followers",
        "500",
        "--active-within-days",
        "14",
        "--over-collection-factor",
        "3",
    ])
    .expect("expected valid cli args");

    let config = cli.apply_overrides(RunConfig::default());
    assert_eq!(config.max_profiles, 10);
    assert_eq!(config.min_followers, Some(500));
    assert_eq!(config.active_within_days, Some(14));
    assert_eq!(config.candidate_limit(), 30);
}

#[test]
fn disabling_flags_clear_thresholds() {
    let cli = Cli::try_parse_from([
        "leadscout",
        "--no-min-followers",
        "--no-activity-filter",
        "--allow-no-contact",
        "--no-browser",
    ])
    .expect("expected valid cli args");

    let config = cli.apply_overrides(RunConfig::default());
    assert_eq!(config.min_followers, None);
    assert_eq!(config.active_within_days, None);
    assert!(!config.require_link_or_email);
    assert!(!config.use_browser_for_profiles);
}

#[test]
fn use_browser_overrides_input_file() {
    let cli = Cli::try_parse_from(["leadscout", "--use-browser"]).expect("expected valid cli args");
    let from_file = RunConfig {
        use_browser_for_profiles: false,
        ..RunConfig::default()
    };
    assert!(cli.apply_overrides(from_file).use_browser_for_profiles);
}

#[test]
fn conflicting_browser_flags_are_rejected() {
    let result = Cli::try_parse_from(["leadscout", "--use-browser", "--no-browser"]);
    assert!(result.is_err());
}

#[test]
fn conflicting_follower_flags_are_rejected() {
    let result = Cli::try_parse_from([
        "leadscout",
        "--min-followers",
        "100",
        "--no-min-followers",
    ]);
    assert!(result.is_err());
}

#[test]
fn input_output_and_dry_run_parse() {
    let cli = Cli::try_parse_from([
        "leadscout",
        "-i",
        "input.yaml",
        "-o",
        "out/leads.json",
        "--dry-run",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("input.yaml")));
    assert_eq!(
        cli.output.as_deref(),
        Some(std::path::Path::new("out/leads.json"))
    );
    assert!(cli.dry_run);
}

#[test]
fn zero_max_profiles_fails_validation_after_override() {
    let cli = Cli::try_parse_from(["leadscout", "--max-profiles", "0"])
        .expect("expected valid cli args");
    let config = cli.apply_overrides(RunConfig::default());
    assert!(config.validate().is_err());
}

#[test]
fn overrides_repair_an_invalid_input_file() {
    let from_file = leadscout_core::parse_run_config("queries: []\nmaxProfiles: 0\n")
        .expect("input parses");
    assert!(from_file.validate().is_err());

    let cli = Cli::try_parse_from([
        "leadscout",
        "-q",
        "site:instagram.com forex mentor",
        "--max-profiles",
        "5",
    ])
    .expect("expected valid cli args");
    let config = cli.apply_overrides(from_file);
    assert!(config.validate().is_ok());
    assert_eq!(config.max_profiles, 5);
}
