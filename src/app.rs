// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::io::IsTerminal;
use std::time::Duration;

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::{Backend, Config};
use crate::domain::{DiffScope, GenerationOptions};
use crate::error::{Error, Result};
use crate::services::{
    cache::ResponseCache,
    dispatcher::ProviderDispatcher,
    generator::CommitGenerator,
    git::{GitService, Repository},
    reducer::ContentReducer,
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            provider = %config.provider,
            model = config.model.as_deref().unwrap_or("default"),
            token_budget = config.token_budget,
            cache = config.cache.enabled,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        match self.cli.command {
            Some(Commands::Suggest { count }) => self.suggest(count).await,
            Some(ref cmd) => self.handle_command(cmd).await,
            None => self.generate_commit().await,
        }
    }

    fn options(&self) -> GenerationOptions {
        GenerationOptions::from_config(&self.config).verbose(self.cli.verbose)
    }

    fn generator(&self) -> CommitGenerator {
        let dispatcher = ProviderDispatcher::from_config(&self.config)
            .with_cancellation(self.cancel_token.clone());
        CommitGenerator::with_parts(
            ContentReducer::new(self.config.token_budget),
            dispatcher,
            ResponseCache::from_config(&self.config.cache),
        )
    }

    /// Discover the repository, optionally stage everything, and make sure
    /// there is something to commit.
    async fn prepare(&self) -> Result<GitService> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let git = GitService::discover()?;
        git.check_state()?;

        if self.cli.all {
            self.print_status("Staging all changes...");
            git.stage_all().await?;
        }

        self.print_status("Analyzing staged changes...");
        let stats = git.diff_summary(DiffScope::Staged).await?;
        if stats.is_empty() {
            return Err(Error::NoStagedChanges);
        }

        let insertions: usize = stats.iter().map(|s| s.insertions).sum();
        let deletions: usize = stats.iter().map(|s| s.deletions).sum();
        self.print_info(&format!(
            "{} files with changes detected (+{} -{})",
            stats.len(),
            insertions,
            deletions
        ));

        Ok(git)
    }

    async fn generate_commit(&self) -> Result<()> {
        let git = self.prepare().await?;
        let options = self.options();
        let mut generator = self.generator();

        let chain = generator.dispatcher().chain_names(options.provider);
        self.print_status(&format!("Generating with {}...", chain.join(" → ")));

        let spinner = Self::spinner("generating...");
        let generated = generator
            .generate_commit_message(&git, DiffScope::Staged, &options)
            .await;
        spinner.finish_and_clear();

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if self.cli.show_prompt {
            if let Some(ref prompt) = generated.prompt {
                eprintln!("{}", style("--- PROMPT ---").dim());
                eprintln!("{}", prompt);
                eprintln!("{}", style("--- END PROMPT ---").dim());
            }
        }

        if let Some(strategy) = generated.strategy {
            debug!(%strategy, "content reduced");
        }

        if generated.cached {
            self.print_info("Reusing a cached message for this change");
        } else if generated.used_local {
            self.print_warning("No backend produced a message; using the local heuristic");
        } else if let Some(ref provider) = generated.provider {
            debug!(provider = %provider, "message generated");
        }

        let message = generated.message.to_string();
        self.finish(&git, &message).await
    }

    async fn suggest(&self, count: usize) -> Result<()> {
        let git = self.prepare().await?;
        let options = self.options();
        let mut generator = self.generator();

        self.print_status(&format!("Generating {} suggestions...", count.max(1)));

        let spinner = Self::spinner("generating...");
        let subjects = generator
            .generate_multiple_suggestions(&git, DiffScope::Staged, &options, count)
            .await;
        spinner.finish_and_clear();

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let message = self.select_candidate(&subjects)?;
        self.finish(&git, &message).await
    }

    /// Copy, print or commit the chosen message
    async fn finish(&self, git: &GitService, message: &str) -> Result<()> {
        if self.cli.copy {
            Self::copy_to_clipboard(message)?;
            self.print_info("Copied to clipboard");
        }

        if self.cli.dry_run {
            println!("{}", message);
            return Ok(());
        }

        let is_interactive = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();

        if !self.cli.yes {
            if !is_interactive {
                eprintln!("{}", style("warning:").yellow().bold());
                eprintln!("  Not a terminal. Use --yes to auto-confirm in scripts/hooks.");
                println!("\n{}", message);
                return Ok(());
            }

            eprintln!("\n{}", style("Generated commit message:").bold());
            eprintln!("{}", style(message).green());
            eprintln!();

            let confirm = Confirm::new()
                .with_prompt("Create commit with this message?")
                .default(true)
                .interact()?;

            if !confirm {
                return Err(Error::Cancelled);
            }
        }

        git.commit(message).await?;

        eprintln!("{} Committed!", style("✓").green().bold());

        Ok(())
    }

    fn copy_to_clipboard(text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    async fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Suggest { .. } => Ok(()),
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                println!("Provider: {}", self.config.provider);
                println!(
                    "Model: {}",
                    self.config.model.as_deref().unwrap_or("(backend default)")
                );
                println!("Conventional: {}", self.config.conventional);
                println!("Body: {}", self.config.body);
                println!("Temperature: {}", self.config.temperature);
                println!("Max tokens: {}", self.config.max_tokens);
                println!("Token budget: {}", self.config.token_budget);
                println!("Timeout: {}s", self.config.timeout_secs);
                if let Some(ref url) = self.config.openai_base_url {
                    println!("OpenAI base URL: {}", url);
                }
                println!();
                println!("[cache]");
                println!("  enabled: {}", self.config.cache.enabled);
                println!("  max_entries: {}", self.config.cache.max_entries);
                println!("  ttl_secs: {}", self.config.cache.ttl_secs);
                Ok(())
            }
            Commands::Doctor => self.run_doctor(),
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "commitflow", &mut std::io::stdout());
                Ok(())
            }
            #[cfg(feature = "secure-storage")]
            Commands::SetKey { provider } => self.set_api_key(provider),
            #[cfg(feature = "secure-storage")]
            Commands::GetKey { provider } => self.get_api_key(provider),
        }
    }

    fn run_doctor(&self) -> Result<()> {
        eprintln!("{} Running diagnostics...\n", style("→").cyan());

        // Config summary
        eprintln!("{}", style("Configuration").bold().underlined());
        eprintln!("  Provider:    {}", self.config.provider);
        eprintln!(
            "  Model:       {}",
            self.config.model.as_deref().unwrap_or("(backend default)")
        );
        eprintln!("  Timeout:     {}s", self.config.timeout_secs);
        if let Some(ref path) = Config::config_path() {
            let status = if path.exists() { "found" } else { "not found" };
            eprintln!("  Config file: {} ({})", path.display(), status);
        }
        eprintln!();

        // Credentials
        eprintln!("{}", style("Credentials").bold().underlined());
        for backend in Backend::ALL {
            eprint!("  {:<7} ({}): ", backend.as_str(), backend.env_var());
            if self.config.credentials.is_configured(backend) {
                eprintln!("{}", style("configured").green());
            } else {
                eprintln!("{}", style("missing").dim());
            }
        }
        eprintln!();

        // Resolved chain
        eprintln!("{}", style("Provider Chain").bold().underlined());
        let dispatcher = ProviderDispatcher::from_config(&self.config);
        let chain = dispatcher.chain_names(self.config.provider);
        eprintln!("  {}", chain.join(" → "));
        if chain.len() == 1 {
            eprintln!(
                "  {}",
                style("Only the local heuristic is available; set an API key for better messages")
                    .yellow()
            );
        }
        eprintln!();

        // Git check
        eprintln!("{}", style("Git Repository").bold().underlined());
        match GitService::discover() {
            Ok(git) => {
                eprintln!("  Repository: {}", style("found").green());
                if git.check_state().is_err() {
                    eprintln!("  State:      {}", style("merge in progress").yellow());
                }
            }
            Err(_) => eprintln!("  Repository: {}", style("NOT FOUND").red().bold()),
        }

        eprintln!();
        eprintln!("{} Diagnostics complete.", style("✓").green().bold());

        Ok(())
    }

    // ─── Candidate Selection ───

    fn select_candidate(&self, candidates: &[String]) -> Result<String> {
        let first = candidates
            .first()
            .cloned()
            .ok_or_else(|| Error::provider("local", "no suggestions generated"))?;

        if self.cli.yes || candidates.len() == 1 {
            return Ok(first);
        }

        let is_interactive = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();

        if !is_interactive {
            for (i, msg) in candidates.iter().enumerate() {
                eprintln!("{}", style(format!("[{}] {}", i + 1, msg)).dim());
            }
            return Ok(first);
        }

        eprintln!();
        let items: Vec<String> = candidates
            .iter()
            .enumerate()
            .map(|(i, msg)| format!("[{}] {}", i + 1, msg))
            .collect();

        let selection = dialoguer::Select::new()
            .with_prompt("Pick a commit message")
            .items(&items)
            .default(0)
            .interact()
            .map_err(|e| Error::Dialog(e.to_string()))?;

        Ok(candidates[selection].clone())
    }

    // ─── Keychain ───

    #[cfg(feature = "secure-storage")]
    fn keyring_backend(provider: &str) -> Result<Backend> {
        Backend::parse(provider).ok_or_else(|| {
            Error::Config(format!(
                "Keyring storage is only for cloud providers (gemini, groq, openai), got '{}'",
                provider
            ))
        })
    }

    #[cfg(feature = "secure-storage")]
    fn set_api_key(&self, provider: &str) -> Result<()> {
        let backend = Self::keyring_backend(provider)?;

        eprintln!(
            "Enter API key for {} (input will be hidden):",
            style(backend).bold()
        );

        let key = dialoguer::Password::new()
            .with_prompt("API key")
            .interact()
            .map_err(|e| Error::Dialog(e.to_string()))?;

        if key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".into()));
        }

        let entry = keyring::Entry::new("commitflow", backend.as_str())
            .map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(key.trim())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        eprintln!("{} API key stored for {}", style("✓").green().bold(), backend);
        Ok(())
    }

    #[cfg(feature = "secure-storage")]
    fn get_api_key(&self, provider: &str) -> Result<()> {
        let backend = Self::keyring_backend(provider)?;

        let entry = keyring::Entry::new("commitflow", backend.as_str())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        match entry.get_password() {
            Ok(_) => {
                eprintln!(
                    "{} API key for {} is stored in keychain",
                    style("✓").green().bold(),
                    backend
                );
            }
            Err(keyring::Error::NoEntry) => {
                eprintln!(
                    "{} No API key found for {} in keychain",
                    style("✗").red().bold(),
                    backend
                );
                eprintln!(
                    "  Store one with: {}",
                    style(format!("commitflow set-key {}", backend)).yellow()
                );
            }
            Err(e) => {
                return Err(Error::Keyring(e.to_string()));
            }
        }

        Ok(())
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}
