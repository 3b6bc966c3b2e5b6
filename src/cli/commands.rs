//! Command implementations

use std::path::{Path, PathBuf};

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::registry::is_squat_exempt;
use crate::core::{CheckInput, CheckReport, Checker};
use crate::error::{DeclCheckError, IoResultExt, Result};
use crate::loader::{self, snapshot};
use crate::logging;
use crate::models::config::Settings;
use crate::models::module::{LoadedModule, SourceText};
use crate::output::{create_formatter, create_writer};
use crate::utils::{package_name, resolve_entry};

/// Exit status of a clean check
pub const EXIT_CLEAN: i32 = 0;
/// Exit status when diagnostics were reported
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// Exit status when the check could not be evaluated
pub const EXIT_FATAL: i32 = 2;

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Check a declaration against its JavaScript module
    Check(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Check(args)
    }

    /// Execute the command, returning whether it finished without findings
    pub fn execute(&self) -> Result<bool> {
        match self {
            Command::Check(args) => {
                self.validate()?;

                let settings = config::load_config(CliArgs::from(args))?;
                logging::init(settings.verbose, settings.quiet);
                tracing::debug!(?settings, "resolved settings");

                let declaration_path = args
                    .dts
                    .as_deref()
                    .ok_or_else(|| DeclCheckError::missing_input("declaration file"))?;
                let declaration = std::fs::read_to_string(declaration_path).with_path(declaration_path)?;

                let report = run_check(args, &settings, &declaration)?;

                let formatter = create_formatter(
                    settings.output_format,
                    settings.use_colors,
                    settings.verbose,
                    settings.quiet,
                );
                let output = formatter.format(&report, &declaration)?;
                create_writer(settings.output_file.as_ref()).write(&output)?;

                Ok(report.is_clean())
            }
            Command::Init => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(true);
                }

                config::create_default_config(&config_path)?;
                println!("Created default configuration file at: {}", config_path.display());
                Ok(true)
            }
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Check(args) => {
                for path in [&args.dts, &args.snapshot, &args.registry, &args.config]
                    .into_iter()
                    .flatten()
                {
                    if !path.is_file() {
                        return Err(DeclCheckError::InvalidPath { path: path.clone() });
                    }
                }
                Ok(())
            }
            Command::Init => Ok(()),
        }
    }

    /// Run the command and map the outcome to an exit status
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(true) => EXIT_CLEAN,
            Ok(false) => EXIT_DIAGNOSTICS,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                EXIT_FATAL
            }
        }
    }
}

/// Load the module, gather registry data and run one check
fn run_check(args: &Args, settings: &Settings, declaration: &str) -> Result<CheckReport> {
    let entry = args.js.as_deref().map(resolve_entry).transpose()?;
    let module = load_module(args, settings, entry.as_deref())?;

    let module_name = args
        .name
        .clone()
        .or_else(|| args.js.as_deref().and_then(package_dir).and_then(package_name))
        .or_else(|| args.dts.as_deref().and_then(name_from_declaration_path))
        .ok_or_else(|| DeclCheckError::missing_input("module name"))?;

    let mut input = CheckInput::new(&module_name, declaration, module);
    if let Some(mode) = settings.mode {
        input = input.with_mode(mode);
    }
    if let Some(registry_path) = &args.registry {
        let info = snapshot::load_registry_info(registry_path)?;
        let exempt = args.squat_exempt || is_squat_exempt(settings, &module_name);
        input = input.with_registry(info, exempt);
    }

    Checker::new(settings)?.check(&input)
}

fn load_module(args: &Args, settings: &Settings, entry: Option<&Path>) -> Result<LoadedModule> {
    match (&args.snapshot, entry) {
        (Some(snapshot_path), entry) => {
            let exports = snapshot::load_snapshot(snapshot_path)?;
            let source = match entry {
                Some(entry) => SourceText::Available(loader::read_source(entry)?),
                None => SourceText::Unavailable,
            };
            Ok(LoadedModule::new(exports, source))
        }
        (None, Some(entry)) => {
            let module_loader = loader::create_loader(settings);
            tracing::debug!(loader = module_loader.name(), path = %entry.display(), "loading module");
            module_loader.load(entry)
        }
        (None, None) => Err(DeclCheckError::missing_input("JavaScript module value")),
    }
}

/// Nearest directory at or above `js` that holds a package.json
fn package_dir(js: &Path) -> Option<&Path> {
    let start = if js.is_dir() { js } else { js.parent()? };
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
}

/// `types/foo/index.d.ts` names `foo`; `foo.d.ts` names `foo`
fn name_from_declaration_path(dts: &Path) -> Option<String> {
    let file_name = dts.file_name()?.to_str()?;
    let stem = file_name
        .strip_suffix(".d.ts")
        .or_else(|| file_name.strip_suffix(".ts"))
        .unwrap_or(file_name);
    if stem == "index" {
        dts.parent()?
            .file_name()?
            .to_str()
            .map(String::from)
    } else {
        Some(stem.to_string())
    }
}
