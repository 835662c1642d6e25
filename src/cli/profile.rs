//! Profile and settings CLI commands

use clap::Subcommand;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{Language, ProfileUpdate, SettingsUpdate, CURRENCIES};
use crate::services::ProfileService;
use crate::storage::Storage;

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile
    Show,
    /// Change the display name or e-mail
    Set {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show language and currency
    Show,
    /// Change language or currency
    Set {
        /// Language (en, ar)
        #[arg(short, long)]
        language: Option<String>,
        /// Currency code (e.g. SAR, USD)
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// List supported currencies
    Currencies,
}

/// Handle a profile command
pub fn handle_profile_command(storage: &Storage, cmd: ProfileCommands) -> SpendwiseResult<()> {
    let service = ProfileService::new(storage);

    match cmd {
        ProfileCommands::Show => match service.profile()? {
            Some(profile) => {
                println!("Name:       {}", profile.name);
                println!("E-mail:     {}", profile.email);
                println!("Since:      {}", profile.created_at.format("%Y-%m-%d"));
                println!("Last login: {}", profile.last_login.format("%Y-%m-%d %H:%M UTC"));
            }
            None => println!("No profile yet. Run 'spendwise init --email <address>'."),
        },
        ProfileCommands::Set { name, email } => {
            let profile = service.update_profile(ProfileUpdate { name, email })?;
            println!("Updated profile: {} <{}>", profile.name, profile.email);
        }
    }

    Ok(())
}

/// Handle a settings command
pub fn handle_settings_command(storage: &Storage, cmd: SettingsCommands) -> SpendwiseResult<()> {
    let service = ProfileService::new(storage);

    match cmd {
        SettingsCommands::Show => {
            let settings = service.settings()?;
            let currency = settings.currency();
            println!("Language: {}", settings.language);
            println!("Currency: {} ({} {})", currency.code, currency.symbol, currency.label);
        }
        SettingsCommands::Set { language, currency } => {
            let language = language
                .as_deref()
                .map(|l| {
                    Language::parse(l).ok_or_else(|| {
                        SpendwiseError::Validation(format!(
                            "Unknown language: '{}'. Use en or ar",
                            l
                        ))
                    })
                })
                .transpose()?;

            let settings = service.save_settings(SettingsUpdate {
                language,
                currency_code: currency,
            })?;
            println!(
                "Settings saved: language {}, currency {}",
                settings.language, settings.currency_code
            );
        }
        SettingsCommands::Currencies => {
            for currency in CURRENCIES.iter() {
                println!("{}  {:<5} {}", currency.code, currency.symbol, currency.label);
            }
        }
    }

    Ok(())
}
