//! Profile service
//!
//! Profile document and language/currency preferences of the current user.

use chrono::Utc;
use tracing::debug;

use crate::audit::EntityType;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::profile::default_name;
use crate::models::{Currency, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings};
use crate::storage::{ChangeOperation, Collection, Storage};

/// Service for the profile and preferences documents
pub struct ProfileService<'a> {
    storage: &'a Storage,
}

impl<'a> ProfileService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create the profile on first use, otherwise record a login
    ///
    /// A missing display name is filled from the e-mail address.
    pub fn ensure_profile(&self, email: &str) -> SpendwiseResult<UserProfile> {
        let _guard = self.storage.ledger_guard()?;
        match self.storage.profile.profile()? {
            None => {
                let profile = UserProfile::new(email);
                self.storage.profile.put_profile(profile.clone())?;
                self.storage.log_create(
                    EntityType::Profile,
                    self.storage.user().as_str(),
                    Some(profile.name.clone()),
                    &profile,
                )?;
                self.storage.notify(
                    Collection::Profile,
                    ChangeOperation::Created,
                    vec![self.storage.user().to_string()],
                );
                debug!(user = %self.storage.user(), "Created profile");
                Ok(profile)
            }
            Some(existing) => {
                let mut profile = existing.clone();
                profile.last_login = Utc::now();
                if profile.name.trim().is_empty() {
                    let source = if profile.email.is_empty() {
                        email
                    } else {
                        profile.email.as_str()
                    };
                    profile.name = default_name(source);
                }
                if profile.email.is_empty() && !email.trim().is_empty() {
                    profile.email = email.trim().to_string();
                }
                self.storage.profile.put_profile(profile.clone())?;

                // Logins alone are not audited
                if profile.name != existing.name || profile.email != existing.email {
                    self.storage.log_update(
                        EntityType::Profile,
                        self.storage.user().as_str(),
                        Some(profile.name.clone()),
                        &existing,
                        &profile,
                    )?;
                }
                self.storage.notify(
                    Collection::Profile,
                    ChangeOperation::Updated,
                    vec![self.storage.user().to_string()],
                );
                Ok(profile)
            }
        }
    }

    /// The stored profile
    pub fn profile(&self) -> SpendwiseResult<Option<UserProfile>> {
        self.storage.profile.profile()
    }

    /// Merge changes into the profile
    pub fn update_profile(&self, update: ProfileUpdate) -> SpendwiseResult<UserProfile> {
        let _guard = self.storage.ledger_guard()?;
        let before = self.storage.profile.profile()?.ok_or_else(|| SpendwiseError::NotFound {
            entity_type: "Profile",
            identifier: self.storage.user().to_string(),
        })?;

        let mut profile = before.clone();
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(SpendwiseError::Validation("Name cannot be empty".into()));
            }
            profile.name = name.to_string();
        }
        if let Some(email) = update.email {
            let email = email.trim();
            if !email.contains('@') {
                return Err(SpendwiseError::Validation(format!(
                    "'{}' is not an e-mail address",
                    email
                )));
            }
            profile.email = email.to_string();
        }

        if profile == before {
            return Ok(profile);
        }
        profile.updated_at = Some(Utc::now());

        self.storage.profile.put_profile(profile.clone())?;
        self.storage.log_update(
            EntityType::Profile,
            self.storage.user().as_str(),
            Some(profile.name.clone()),
            &before,
            &profile,
        )?;
        self.storage.notify(
            Collection::Profile,
            ChangeOperation::Updated,
            vec![self.storage.user().to_string()],
        );

        Ok(profile)
    }

    /// Current preferences
    pub fn settings(&self) -> SpendwiseResult<UserSettings> {
        self.storage.profile.settings()
    }

    /// Merge changes into the preferences; fields left as `None` are kept
    pub fn save_settings(&self, update: SettingsUpdate) -> SpendwiseResult<UserSettings> {
        let _guard = self.storage.ledger_guard()?;
        let before = self.storage.profile.settings()?;
        let mut settings = before.clone();

        if let Some(language) = update.language {
            settings.language = language;
        }
        if let Some(code) = update.currency_code {
            let currency = Currency::by_code(&code).ok_or_else(|| {
                SpendwiseError::Validation(format!("Unsupported currency: {}", code.trim()))
            })?;
            settings.currency_code = currency.code.to_string();
        }

        if settings == before {
            return Ok(settings);
        }
        settings.updated_at = Some(Utc::now());

        self.storage.profile.put_settings(settings.clone())?;
        self.storage.log_update(
            EntityType::Settings,
            self.storage.user().as_str(),
            None,
            &before,
            &settings,
        )?;
        self.storage.notify(
            Collection::Settings,
            ChangeOperation::Updated,
            vec![self.storage.user().to_string()],
        );

        Ok(settings)
    }
}
