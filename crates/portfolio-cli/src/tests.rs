use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["portfolio-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_summary_with_filter_flags() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "summary",
        "--region",
        "emea",
        "--min-readiness",
        "40",
        "--json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Summary { filters, json }) => {
            assert!(json);
            assert_eq!(filters.region.as_deref(), Some("emea"));
            assert_eq!(filters.min_readiness, Some(40.0));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_filter_query() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "health",
        "--filter-query",
        "?lifecycleStage=pilot&readinessMax=80",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Health { ref filters, json: false })
            if filters.filter_query.as_deref() == Some("?lifecycleStage=pilot&readinessMax=80")
    ));
}

#[test]
fn list_defaults_to_name_ascending() {
    let cli = Cli::try_parse_from(["portfolio-cli", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::List {
            sort: SortKey::Name,
            direction: SortDirection::Ascending,
            group_by: None,
            json: false,
            ..
        })
    ));
}

#[test]
fn parses_list_sort_and_group() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "list",
        "--sort",
        "readiness",
        "--direction",
        "desc",
        "--group-by",
        "stage",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::List {
            sort: SortKey::ReadinessScore,
            direction: SortDirection::Descending,
            group_by: Some(GroupKey::LifecycleStage),
            ..
        })
    ));
}

#[test]
fn rejects_unknown_sort_key() {
    assert!(Cli::try_parse_from(["portfolio-cli", "list", "--sort", "colour"]).is_err());
}

#[test]
fn parses_export_format_and_output() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "export",
        "--format",
        "xlsx",
        "--output",
        "out.xlsx",
        "--type",
        "payments",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Export {
            filters,
            format,
            output,
        }) => {
            assert_eq!(format, ExportFormat::Xlsx);
            assert_eq!(output, Some(PathBuf::from("out.xlsx")));
            assert_eq!(filters.product_type.as_deref(), Some("payments"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn export_defaults_to_csv() {
    let cli = Cli::try_parse_from(["portfolio-cli", "export"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            format: ExportFormat::Csv,
            output: None,
            ..
        })
    ));
}

#[test]
fn what_if_accepts_negative_adjustments() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "what-if",
        "prd-001",
        "--readiness-delta",
        "-10",
        "--revenue-change-pct",
        "25",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::WhatIf {
            product,
            readiness_delta,
            revenue_change_pct,
            json,
        }) => {
            assert_eq!(product, "prd-001");
            assert!((readiness_delta + 10.0).abs() < f64::EPSILON);
            assert!((revenue_change_pct - 25.0).abs() < f64::EPSILON);
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_actions_advance() {
    let cli =
        Cli::try_parse_from(["portfolio-cli", "actions", "advance", "act-001", "completed"])
            .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Actions {
            command: ActionCommands::Advance {
                ref id,
                status: ActionStatus::Completed
            }
        }) if id == "act-001"
    ));
}

#[test]
fn rejects_unknown_action_status() {
    assert!(
        Cli::try_parse_from(["portfolio-cli", "actions", "advance", "act-001", "reopened"])
            .is_err()
    );
}

#[test]
fn parses_actions_list_remote() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "actions",
        "list",
        "--product",
        "prd-003",
        "--remote",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Actions {
            command: ActionCommands::List {
                product: Some(ref p),
                remote: true
            }
        }) if p == "prd-003"
    ));
}

#[test]
fn parses_upload_without_wait() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "upload",
        "docs/plan.pdf",
        "--product",
        "prd-001",
        "--no-wait",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Upload { no_wait: true, .. })
    ));
}

#[test]
fn parses_ask_with_product() {
    let cli = Cli::try_parse_from([
        "portfolio-cli",
        "ask",
        "What blocks launch?",
        "--product",
        "prd-002",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ask { ref question, product: Some(ref p) })
            if question == "What blocks launch?" && p == "prd-002"
    ));
}

#[test]
fn global_catalog_flag_after_subcommand() {
    let cli =
        Cli::try_parse_from(["portfolio-cli", "summary", "--catalog", "snap.json"]).unwrap();
    assert_eq!(cli.catalog, Some(PathBuf::from("snap.json")));
}
