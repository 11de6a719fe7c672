//! Local identity stub: sign-in, profile edits, sign-out and deletion.
//!
//! No verification happens. Signing in only selects which saved collection
//! is active and seeds the session's allergen and avoid defaults.

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{ProfilePreferences, UserIdentity};
use crate::preferences::model::{sanitize_avoid_text, PreferenceModel};
use crate::recipes::store::{RecipeStore, Scope};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<ProfilePreferences>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!("'{email}' is not an e-mail address"))),
    }
}

fn clean_preferences(preferences: ProfilePreferences) -> ProfilePreferences {
    ProfilePreferences {
        allergens: preferences
            .allergens
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        avoid_ingredients: sanitize_avoid_text(&preferences.avoid_ingredients),
    }
}

/// The stored profile that currently owns `email`, if any.
///
/// The e-mail index wins. A profile found under the id derived from the
/// e-mail only counts while it still carries that e-mail.
async fn profile_for_email(
    store: &RecipeStore,
    email: &str,
    derived: Uuid,
) -> Result<Option<UserIdentity>, AppError> {
    if let Some(id) = store.profile_id_for_email(email).await? {
        if let Some(stored) = store.profile(id).await? {
            if stored.email == email {
                return Ok(Some(stored));
            }
        }
    }
    Ok(store
        .profile(derived)
        .await?
        .filter(|stored| stored.email == email))
}

/// Signs in and makes the identity's collection active.
///
/// A returning e-mail gets its stored profile back (same id, same defaults),
/// including after the profile's e-mail was edited.
pub async fn login(
    store: &RecipeStore,
    preferences: &Mutex<PreferenceModel>,
    request: LoginRequest,
) -> Result<UserIdentity, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    validate_email(&request.email)?;

    let fresh = UserIdentity::sign_in(&request.name, &request.email);
    let identity = match profile_for_email(store, &fresh.email, fresh.id).await? {
        Some(stored) => UserIdentity {
            name: fresh.name,
            ..stored
        },
        None => {
            // The derived id may still belong to a profile that moved to another e-mail.
            let derived_taken = store.profile(fresh.id).await?.is_some();
            if derived_taken {
                UserIdentity {
                    id: Uuid::new_v4(),
                    ..fresh
                }
            } else {
                fresh
            }
        }
    };

    store.put_profile(&identity).await?;
    store.put_profile_email(&identity.email, identity.id).await?;
    store.set_current_user(Some(&identity)).await?;
    preferences
        .lock()
        .await
        .seed_from_profile(&identity.preferences);

    info!("Signed in as {}", identity.id);
    Ok(identity)
}

/// Signs out. The guest collection becomes active; session preferences stay.
pub async fn logout(store: &RecipeStore) -> Result<(), AppError> {
    store.set_current_user(None).await?;
    info!("Signed out");
    Ok(())
}

pub async fn current_profile(store: &RecipeStore) -> Result<UserIdentity, AppError> {
    store.current_user().await?.ok_or(AppError::Unauthorized)
}

/// Edits the signed-in profile. The id never changes, so the saved
/// collection stays attached even when the e-mail is edited. The e-mail
/// index follows the edit so signing in with the new address finds it.
pub async fn update_profile(
    store: &RecipeStore,
    preferences: &Mutex<PreferenceModel>,
    update: ProfileUpdate,
) -> Result<UserIdentity, AppError> {
    let mut identity = current_profile(store).await?;
    let previous_email = identity.email.clone();

    if let Some(name) = update.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        identity.name = name.trim().to_string();
    }
    if let Some(email) = update.email {
        validate_email(&email)?;
        let email = email.trim().to_lowercase();
        if email != previous_email {
            let derived = UserIdentity::sign_in(&identity.name, &email).id;
            if let Some(owner) = profile_for_email(store, &email, derived).await? {
                if owner.id != identity.id {
                    return Err(AppError::Conflict(format!(
                        "'{email}' already belongs to another profile"
                    )));
                }
            }
        }
        identity.email = email;
    }
    let reseed = update.preferences.is_some();
    if let Some(defaults) = update.preferences {
        identity.preferences = clean_preferences(defaults);
    }

    store.put_profile(&identity).await?;
    if identity.email != previous_email {
        store.put_profile_email(&identity.email, identity.id).await?;
        store.delete_profile_email(&previous_email).await?;
    }
    store.set_current_user(Some(&identity)).await?;
    if reseed {
        preferences
            .lock()
            .await
            .seed_from_profile(&identity.preferences);
    }

    Ok(identity)
}

/// Deletes the signed-in profile together with its saved collection.
pub async fn delete_profile(store: &RecipeStore) -> Result<(), AppError> {
    let identity = current_profile(store).await?;

    store.remove_collection(Scope::User(identity.id)).await?;
    store.delete_profile(identity.id).await?;
    if store.profile_id_for_email(&identity.email).await? == Some(identity.id) {
        store.delete_profile_email(&identity.email).await?;
    }
    store.set_current_user(None).await?;

    info!("Deleted profile {} and its saved recipes", identity.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::recipe::sample_recipe;
    use crate::recipes::store::MemoryBlobStore;

    fn fixtures() -> (RecipeStore, Mutex<PreferenceModel>) {
        (
            RecipeStore::new(Arc::new(MemoryBlobStore::new(1 << 20))),
            Mutex::new(PreferenceModel::default()),
        )
    }

    fn ana() -> LoginRequest {
        LoginRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_switches_scope() {
        let (store, preferences) = fixtures();
        let identity = login(&store, &preferences, ana()).await.unwrap();
        assert_eq!(store.active_scope().await.unwrap(), Scope::User(identity.id));

        logout(&store).await.unwrap();
        assert_eq!(store.active_scope().await.unwrap(), Scope::Guest);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_email() {
        let (store, preferences) = fixtures();
        let request = LoginRequest {
            name: "Ana".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(matches!(
            login(&store, &preferences, request).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.active_scope().await.unwrap(), Scope::Guest);
    }

    #[tokio::test]
    async fn test_profile_defaults_seed_preferences_and_survive_relogin() {
        let (store, preferences) = fixtures();
        login(&store, &preferences, ana()).await.unwrap();
        update_profile(
            &store,
            &preferences,
            ProfileUpdate {
                preferences: Some(ProfilePreferences {
                    allergens: vec!["Gluten-free".to_string(), "  ".to_string()],
                    avoid_ingredients: "celery<script>".to_string(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        {
            let snapshot = preferences.lock().await.snapshot();
            assert_eq!(snapshot.allergens, vec!["Gluten-free"]);
            assert_eq!(snapshot.avoid_ingredients, "celeryscript");
        }

        logout(&store).await.unwrap();
        let fresh_session = Mutex::new(PreferenceModel::default());
        let again = login(&store, &fresh_session, ana()).await.unwrap();

        assert_eq!(again.preferences.allergens, vec!["Gluten-free"]);
        assert_eq!(fresh_session.lock().await.snapshot().allergens, vec!["Gluten-free"]);
    }

    #[tokio::test]
    async fn test_profile_requires_sign_in() {
        let (store, preferences) = fixtures();
        assert!(matches!(
            current_profile(&store).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            update_profile(&store, &preferences, ProfileUpdate::default()).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            delete_profile(&store).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_email_edit_keeps_collection() {
        let (store, preferences) = fixtures();
        let identity = login(&store, &preferences, ana()).await.unwrap();
        store
            .save_recipe(Scope::User(identity.id), sample_recipe("Sarmale"))
            .await
            .unwrap();

        let updated = update_profile(
            &store,
            &preferences,
            ProfileUpdate {
                email: Some("Ana.Pop@Example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.id, identity.id);
        assert_eq!(updated.email, "ana.pop@example.com");
        let scope = store.active_scope().await.unwrap();
        assert_eq!(store.collection(scope).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_relogin_with_edited_email_finds_collection() {
        let (store, preferences) = fixtures();
        let identity = login(&store, &preferences, ana()).await.unwrap();
        store
            .save_recipe(Scope::User(identity.id), sample_recipe("Sarmale"))
            .await
            .unwrap();
        update_profile(
            &store,
            &preferences,
            ProfileUpdate {
                email: Some("ana.pop@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        logout(&store).await.unwrap();

        let again = login(
            &store,
            &preferences,
            LoginRequest {
                name: "Ana".to_string(),
                email: "Ana.Pop@example.com".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(again.id, identity.id);
        assert_eq!(again.email, "ana.pop@example.com");
        let titles: Vec<String> = store
            .collection(store.active_scope().await.unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Sarmale"]);
    }

    #[tokio::test]
    async fn test_old_email_does_not_reach_moved_profile() {
        let (store, preferences) = fixtures();
        let identity = login(&store, &preferences, ana()).await.unwrap();
        store
            .save_recipe(Scope::User(identity.id), sample_recipe("Sarmale"))
            .await
            .unwrap();
        update_profile(
            &store,
            &preferences,
            ProfileUpdate {
                email: Some("ana.pop@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        logout(&store).await.unwrap();

        let newcomer = login(&store, &preferences, ana()).await.unwrap();

        assert_ne!(newcomer.id, identity.id);
        assert!(store
            .collection(Scope::User(newcomer.id))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store.profile(identity.id).await.unwrap().unwrap().email,
            "ana.pop@example.com"
        );
    }

    #[tokio::test]
    async fn test_email_edit_to_taken_address_conflicts() {
        let (store, preferences) = fixtures();
        login(
            &store,
            &preferences,
            LoginRequest {
                name: "Ion".to_string(),
                email: "ion@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        logout(&store).await.unwrap();
        login(&store, &preferences, ana()).await.unwrap();

        let result = update_profile(
            &store,
            &preferences,
            ProfileUpdate {
                email: Some("ion@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(current_profile(&store).await.unwrap().email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_delete_profile_removes_only_its_collection() {
        let (store, preferences) = fixtures();
        store
            .save_recipe(Scope::Guest, sample_recipe("Ciorbă"))
            .await
            .unwrap();
        let identity = login(&store, &preferences, ana()).await.unwrap();
        store
            .save_recipe(Scope::User(identity.id), sample_recipe("Sarmale"))
            .await
            .unwrap();

        delete_profile(&store).await.unwrap();

        assert_eq!(store.active_scope().await.unwrap(), Scope::Guest);
        assert!(store.profile(identity.id).await.unwrap().is_none());
        assert!(store
            .profile_id_for_email("ana@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .collection(Scope::User(identity.id))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.collection(Scope::Guest).await.unwrap().len(), 1);
    }
}
