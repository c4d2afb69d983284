use nametagkit::cli::{Cli, CliError, Command, PreviewArgs};
use nametagkit_settings::ExporterKind;
use std::path::PathBuf;

#[test]
fn test_generate_with_all_options() {
    let cli = Cli::parse([
        "--log-json",
        "generate",
        "ALICE",
        "BOB",
        "--out",
        "dist",
        "--exporter",
        "OpenSCAD",
        "--merged",
        "--sources",
    ])
    .unwrap();

    assert!(cli.global.log_json);
    let Command::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.input.names, vec!["ALICE", "BOB"]);
    assert_eq!(args.out, Some(PathBuf::from("dist")));
    assert_eq!(args.exporter, Some(ExporterKind::OpenScad));
    assert!(args.merged && args.sources && !args.loose);
}

#[test]
fn test_generate_needs_names() {
    assert!(matches!(
        Cli::parse(["generate", "--loose"]),
        Err(CliError::MissingArgument(_))
    ));
}

#[test]
fn test_unknown_exporter_is_rejected() {
    let err = Cli::parse(["generate", "A", "--exporter", "blender"]).unwrap_err();
    assert!(matches!(err, CliError::InvalidValue { ref option, .. } if option == "--exporter"));
}

#[test]
fn test_preview_arguments() {
    let cli = Cli::parse(["preview", "ZED", "--yaw", "-30", "--pitch", "20.5"]).unwrap();
    let Command::Preview(args) = cli.command else {
        panic!("expected preview");
    };
    assert_eq!(args.name, "ZED");
    assert_eq!(args.yaw, Some(-30.0));
    assert_eq!(args.pitch, Some(20.5));
    assert!(!args.turntable);

    let cli = Cli::parse(["preview", "ZED", "--turntable"]).unwrap();
    assert!(matches!(cli.command, Command::Preview(PreviewArgs { turntable: true, .. })));

    assert!(matches!(
        Cli::parse(["preview", "ZED", "--yaw", "left"]),
        Err(CliError::InvalidValue { .. })
    ));
    assert_eq!(
        Cli::parse(["preview", "A", "B"]).unwrap_err(),
        CliError::UnexpectedArgument("B".into())
    );
}

#[test]
fn test_simple_commands() {
    assert_eq!(Cli::parse(["--help"]).unwrap().command, Command::Help);
    assert_eq!(Cli::parse(["version"]).unwrap().command, Command::Version);
    assert_eq!(
        Cli::parse(["check-openscad"]).unwrap().command,
        Command::CheckOpenScad
    );
    assert_eq!(Cli::parse(["fonts"]).unwrap().command, Command::Fonts);
    assert!(matches!(
        Cli::parse(["fonts", "--all"]),
        Err(CliError::UnknownOption { .. })
    ));
    assert_eq!(
        Cli::parse(["init-config", "cfg.toml", "--force"])
            .unwrap()
            .command,
        Command::InitConfig {
            path: Some(PathBuf::from("cfg.toml")),
            force: true
        }
    );
}

#[test]
fn test_bad_command_lines() {
    assert_eq!(
        Cli::parse(Vec::<String>::new()).unwrap_err(),
        CliError::MissingCommand
    );
    assert_eq!(
        Cli::parse(["print"]).unwrap_err(),
        CliError::UnknownCommand("print".into())
    );
    assert!(matches!(
        Cli::parse(["validate", "A", "--strict"]),
        Err(CliError::UnknownOption { .. })
    ));
}
