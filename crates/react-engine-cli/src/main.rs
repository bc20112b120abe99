//! react-engine CLI
//!
//! Renders a React component from the command line using the same settings
//! sources as a hosted renderer.
//!
//! ## Usage
//!
//! ```bash
//! react-engine check --config settings.toml
//! react-engine render Greeting --props '{"name":"Ana"}' --tag span --attr id=g1
//! react-engine render Menu --no-pre-render --document-root /var/www
//! ```

mod utils;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use react_engine::{React, RenderOptions};
use tracing_subscriber::EnvFilter;

use crate::utils::{load_props, parse_attribute, settings_builder};

#[derive(Parser)]
#[command(name = "react-engine")]
#[command(about = "Server-side React rendering for CMS templates", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file with a `[reactengine]` table
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Document root the source paths are relative to
	#[arg(long, global = true, value_name = "PATH")]
	document_root: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Render a component to an HTML fragment
	Render {
		/// Component name or expression (e.g. `App.Header`)
		#[arg(value_name = "COMPONENT")]
		component: String,

		/// Props as JSON text
		#[arg(long, value_name = "JSON")]
		props: Option<String>,

		/// File containing the props as JSON
		#[arg(long, value_name = "PATH")]
		props_file: Option<PathBuf>,

		/// Wrapper element
		#[arg(long, default_value = react_engine::DEFAULT_TAG)]
		tag: String,

		/// Only emit the wrapper; skip server-side markup
		#[arg(long)]
		no_pre_render: bool,

		/// Extra wrapper attribute (repeatable)
		/// Format: key=value
		#[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
		attributes: Vec<(String, String)>,
	},

	/// Validate the configured sources and start the engine
	Check,
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	let result = match cli.command {
		Commands::Render {
			component,
			props,
			props_file,
			tag,
			no_pre_render,
			attributes,
		} => run_render(
			cli.config.as_deref(),
			cli.document_root.as_deref(),
			RenderArgs {
				component,
				props,
				props_file,
				options: RenderOptions::new()
					.tag(tag)
					.pre_render(!no_pre_render)
					.with_attributes(attributes),
			},
		),
		Commands::Check => run_check(cli.config.as_deref(), cli.document_root.as_deref()),
	};

	if let Err(e) = result {
		eprintln!("{} {}", "Error:".red().bold(), e);
		process::exit(1);
	}
}

fn init_tracing(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(match verbosity {
			0 => "warn",
			1 => "info",
			2 => "debug",
			_ => "trace",
		})
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

struct RenderArgs {
	component: String,
	props: Option<String>,
	props_file: Option<PathBuf>,
	options: RenderOptions,
}

fn run_render(config: Option<&Path>, document_root: Option<&Path>, args: RenderArgs) -> Result<(), String> {
	let props = load_props(args.props.as_deref(), args.props_file.as_deref())?;
	let react = build_react(config, document_root)?;

	tracing::debug!(component = %args.component, tag = %args.options.tag, "rendering from command line");
	let html = react
		.render(&args.component, &props, &args.options)
		.map_err(|e| e.to_string())?;
	println!("{html}");
	Ok(())
}

fn run_check(config: Option<&Path>, document_root: Option<&Path>) -> Result<(), String> {
	let settings = settings_builder(config, document_root)?
		.build()
		.map_err(|e| e.to_string())?;

	let react_path = settings.react_source_path();
	let app_path = settings.app_source_path();
	println!("{} {}", "react_source:".bold(), react_path.display());
	if app_path.as_os_str().is_empty() {
		println!("{} {}", "app_source:".bold(), "(none)".dimmed());
	} else {
		println!("{} {}", "app_source:".bold(), app_path.display());
	}

	let react = React::from_settings(&settings).map_err(|e| e.to_string())?;
	println!(
		"{} loaded {} + {} bytes",
		"OK".green().bold(),
		react.sources().react().len(),
		react.sources().app().len()
	);
	Ok(())
}

fn build_react(config: Option<&Path>, document_root: Option<&Path>) -> Result<React, String> {
	let settings = settings_builder(config, document_root)?
		.build()
		.map_err(|e| e.to_string())?;
	React::from_settings(&settings).map_err(|e| e.to_string())
}
