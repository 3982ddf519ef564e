use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clickthru::{
    click_behavior_descriptors, ClickAction, ClickSettings, Clicked, Config, LinkRenderer,
    Resolver, Template, UrlOpener,
};
use eyre::{eyre, Result, WrapErr};
use log::debug;

#[derive(Parser, Debug)]
#[clap(name = "clickthru", about, version)]
struct Args {
    /// Increase output logging verbosity.
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Formatting configuration file (JSON, YAML or TOML). Defaults are used
    /// if the file does not exist.
    #[clap(short, long, global = true, default_value = "clickthru.yml")]
    config: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a link template against one or more clicked contexts.
    Render {
        /// The template, e.g. "http://example.com/{{COL1}}".
        template: String,

        /// Clicked context files or glob patterns.
        #[clap(required = true)]
        contexts: Vec<String>,

        /// Render display text instead of a URL.
        #[clap(long)]
        text: bool,
    },
    /// Work out what a click does, given click behaviour settings.
    Click {
        /// Click behaviour settings file.
        settings: PathBuf,

        /// Clicked context file.
        context: PathBuf,
    },
    /// Print the click behaviour setting descriptors as JSON.
    Describe,
}

/// "Opens" links by printing them.
struct PrintOpener;

impl UrlOpener for PrintOpener {
    fn open(&mut self, url: &str) -> Result<(), clickthru::Error> {
        writeln!(std::io::stdout(), "open {}", url)
            .map_err(|e| clickthru::Error::OpenUrl(url.to_string(), e.to_string()))
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = simple_logger::init_with_level(if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    }) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(&args) {
        log::error!("Failed: {:?}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::load_or_default(&args.config)
        .wrap_err_with(|| format!("failed to load configuration {}", args.config.display()))?;
    let renderer = LinkRenderer::new(&config);
    match &args.command {
        Command::Render {
            template,
            contexts,
            text,
        } => render(&renderer, template, contexts, *text),
        Command::Click { settings, context } => click(&renderer, settings, context),
        Command::Describe => {
            println!(
                "{}",
                serde_json::to_string_pretty(&click_behavior_descriptors())?
            );
            Ok(())
        }
    }
}

fn render(renderer: &LinkRenderer<'_>, template: &str, patterns: &[String], text: bool) -> Result<()> {
    let template = Template::parse(template);
    debug!(
        "Template placeholders: {}",
        template.placeholders().collect::<Vec<&str>>().join(", ")
    );
    let mut rendered = 0_u64;
    for pattern in patterns {
        for entry_result in glob::glob(pattern)? {
            let path = entry_result?;
            if !path.is_file() {
                continue;
            }
            let clicked = load_clicked(&path)?;
            let resolver = Resolver::new(&clicked);
            let output = if text {
                renderer.text(&template, &resolver)
            } else {
                renderer.url(&template, &resolver)
            };
            println!("{}", output);
            rendered += 1;
        }
    }
    if rendered == 0 {
        return Err(eyre!("no clicked context files matched {:?}", patterns));
    }
    debug!("Rendered {} clicked context(s)", rendered);
    Ok(())
}

fn click(renderer: &LinkRenderer<'_>, settings: &Path, context: &Path) -> Result<()> {
    let settings = clickthru::fs::load_from_file::<ClickSettings, _>(settings)
        .wrap_err_with(|| format!("failed to load click settings {}", settings.display()))?;
    let clicked = load_clicked(context)?;
    let action = settings.action_for(renderer, &clicked);
    if let ClickAction::Link {
        text: Some(text), ..
    } = &action
    {
        println!("text {}", text);
    }
    if !action.perform(&mut PrintOpener)? {
        println!("menu");
    }
    Ok(())
}

fn load_clicked(path: &Path) -> Result<Clicked> {
    Clicked::load_from_file(path)
        .wrap_err_with(|| format!("failed to load clicked context {}", path.display()))
}
