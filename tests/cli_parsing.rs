use clap::Parser;
use projectflow::cli::commands::board::BoardCommands;
use projectflow::cli::commands::rule::RuleCommands;
use projectflow::cli::{Cli, Commands};

#[test]
fn test_parse_rule_add() {
    let cli = Cli::try_parse_from([
        "projectflow",
        "rule",
        "add",
        "--project",
        "1",
        "--trigger",
        "move:Done",
        "--action",
        "status:closed",
        "--target",
        "issue,pr",
        "--context",
        "Backlog",
    ])
    .unwrap();

    match cli.command {
        Commands::Rule(args) => match args.command {
            RuleCommands::Add {
                project,
                trigger,
                action,
                target,
                context,
                disabled,
                sort_order,
            } => {
                assert_eq!(project, 1);
                assert_eq!(trigger, "move:Done");
                assert_eq!(action, "status:closed");
                assert_eq!(target, "issue,pr");
                assert_eq!(context, "Backlog");
                assert!(!disabled);
                assert_eq!(sort_order, 0);
            }
            _ => panic!("Wrong rule command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_rule_add_defaults() {
    let cli = Cli::try_parse_from([
        "projectflow", "rule", "add", "-p", "2", "-t", "approve", "-a", "label:ready", "--disabled",
    ])
    .unwrap();

    match cli.command {
        Commands::Rule(args) => match args.command {
            RuleCommands::Add {
                target,
                context,
                disabled,
                ..
            } => {
                assert!(target.is_empty());
                assert!(context.is_empty());
                assert!(disabled);
            }
            _ => panic!("Wrong rule command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_rule_toggle_commands() {
    for (verb, expected) in [("enable", 7), ("disable", 7), ("show", 7), ("delete", 7)] {
        let cli = Cli::try_parse_from(["projectflow", "rule", verb, "7"]).unwrap();
        let Commands::Rule(args) = cli.command else {
            panic!("Wrong top-level command");
        };
        let id = match args.command {
            RuleCommands::Enable { id }
            | RuleCommands::Disable { id }
            | RuleCommands::Show { id }
            | RuleCommands::Delete { id } => id,
            _ => panic!("Wrong rule command for {verb}"),
        };
        assert_eq!(id, expected);
    }
}

#[test]
fn test_rule_add_requires_trigger_and_action() {
    assert!(Cli::try_parse_from(["projectflow", "rule", "add", "-p", "1", "-t", "assign"]).is_err());
    assert!(Cli::try_parse_from(["projectflow", "rule", "add", "-p", "1", "-a", "assign"]).is_err());
}

#[test]
fn test_parse_board_place() {
    let cli = Cli::try_parse_from([
        "projectflow", "board", "place", "--issue", "42", "--project", "1", "--column", "Done",
    ])
    .unwrap();

    match cli.command {
        Commands::Board(args) => match args.command {
            BoardCommands::Place {
                issue,
                project,
                column,
            } => {
                assert_eq!(issue, 42);
                assert_eq!(project, 1);
                assert_eq!(column.as_deref(), Some("Done"));
            }
            _ => panic!("Wrong board command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_shared_label() {
    let cli = Cli::try_parse_from(["projectflow", "board", "add-label", "bug"]).unwrap();
    match cli.command {
        Commands::Board(args) => match args.command {
            BoardCommands::AddLabel { project, name } => {
                assert_eq!(project, None);
                assert_eq!(name, "bug");
            }
            _ => panic!("Wrong board command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_json_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["projectflow", "board", "columns", "-p", "1", "--json"]).unwrap();
    assert!(cli.json);
}

#[test]
fn test_init_defaults_to_current_dir() {
    let cli = Cli::try_parse_from(["projectflow", "init"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(!args.force);
            assert_eq!(args.path, std::path::PathBuf::from("."));
        }
        _ => panic!("Wrong top-level command"),
    }
}
