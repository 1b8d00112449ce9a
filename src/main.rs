use anyhow::Result;
use clap::Parser;
use ddos_recipe::commands;
use ddos_recipe::host::Layout;
use ddos_recipe::recipe::DDoSDetectorRecipe;
use ddos_recipe::runtime::RealRuntime;
use std::path::PathBuf;

/// ddos-recipe - package recipe for DDoSDetector
///
/// Stages the files an external build produced into a package folder and
/// publishes the libraries found there as the package's link interface.
///
/// Examples:
///   ddos-recipe inspect
///   ddos-recipe -b build -p package export-pkg
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Folder holding the build output (also via DDOS_RECIPE_BUILD_FOLDER)
    #[arg(
        long = "build-folder",
        short = 'b',
        env = "DDOS_RECIPE_BUILD_FOLDER",
        value_name = "PATH",
        default_value = ".",
        global = true
    )]
    pub build_folder: PathBuf,

    /// Folder the package is assembled in (also via DDOS_RECIPE_PACKAGE_FOLDER)
    #[arg(
        long = "package-folder",
        short = 'p',
        env = "DDOS_RECIPE_PACKAGE_FOLDER",
        value_name = "PATH",
        default_value = "package",
        global = true
    )]
    pub package_folder: PathBuf,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the package metadata
    Inspect(OutputArgs),

    /// Copy the build output into the package folder
    Package,

    /// List the link libraries found in the package folder
    Info(OutputArgs),

    /// Package, collect libraries, and write the package manifest
    ExportPkg,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Print JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let recipe = DDoSDetectorRecipe::new();
    let layout = Layout::new(cli.build_folder, cli.package_folder);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Inspect(args) => commands::inspect(&recipe, args.json, &mut stdout)?,
        Commands::Package => commands::package(runtime, &recipe, layout, &mut stdout)?,
        Commands::Info(args) => commands::info(runtime, &recipe, layout, args.json, &mut stdout)?,
        Commands::ExportPkg => commands::export_pkg(runtime, &recipe, layout, &mut stdout)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["ddos-recipe", "package"]).unwrap();
        assert!(matches!(cli.command, Commands::Package));
        assert_eq!(cli.build_folder, PathBuf::from("."));
        assert_eq!(cli.package_folder, PathBuf::from("package"));
    }

    #[test]
    fn test_cli_global_folders() {
        let cli = Cli::try_parse_from([
            "ddos-recipe",
            "--build-folder",
            "/tmp/build",
            "export-pkg",
            "-p",
            "/tmp/pkg",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::ExportPkg));
        assert_eq!(cli.build_folder, PathBuf::from("/tmp/build"));
        assert_eq!(cli.package_folder, PathBuf::from("/tmp/pkg"));
    }

    #[test]
    fn test_cli_info_json() {
        let cli = Cli::try_parse_from(["ddos-recipe", "info", "--json"]).unwrap();
        match cli.command {
            Commands::Info(args) => assert!(args.json),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["ddos-recipe"]).is_err());
    }
}
